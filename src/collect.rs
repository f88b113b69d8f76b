//! Source collection: turn an [`Invocation`] into [`ConversionJob`]s.
//!
//! Naming rules, applied to the file name only (never the directory part):
//!
//! * a file qualifies when the text after its **last** `.` equals `md`,
//!   compared case-insensitively, in both file and directory mode;
//! * the output base name is the text before its **first** `.`, so
//!   `report.v2.md` becomes `report.html`.

use crate::error::EntryError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// What the user asked to convert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    /// Files given with `-f`, in command-line order.
    pub sources: Vec<PathBuf>,
    /// Directory given with `-d`. Only the last occurrence counts.
    pub directory: Option<PathBuf>,
}

impl Invocation {
    pub fn new(sources: Vec<PathBuf>, directory: Option<PathBuf>) -> Self {
        Self { sources, directory }
    }

    /// True when there is nothing to convert; the CLI prints usage instead.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty() && self.directory.is_none()
    }
}

/// How a job entered the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobOrigin {
    /// Named explicitly with `-f`.
    File,
    /// Found while listing the `-d` directory.
    Directory,
}

/// One Markdown file to convert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub input: PathBuf,
    /// File name up to its first `.`.
    pub base_name: String,
    pub origin: JobOrigin,
}

impl ConversionJob {
    /// Build a job for `input`, or `None` if it is not a Markdown file.
    pub fn from_path(input: impl Into<PathBuf>, origin: JobOrigin) -> Option<Self> {
        let input = input.into();
        let name = input.file_name()?.to_str()?;
        let base_name = markdown_base_name(name)?.to_string();
        Some(Self {
            input,
            base_name,
            origin,
        })
    }

    /// The `<base_name>.html` file name.
    pub fn output_file_name(&self) -> String {
        format!("{}.html", self.base_name)
    }
}

/// Return the first-dot base name of `file_name` if it names a Markdown file.
///
/// ```rust
/// use gensite::collect::markdown_base_name;
///
/// assert_eq!(markdown_base_name("guide.md"), Some("guide"));
/// assert_eq!(markdown_base_name("report.v2.md"), Some("report"));
/// assert_eq!(markdown_base_name("README.MD"), Some("README"));
/// assert_eq!(markdown_base_name("notes.txt"), None);
/// ```
pub fn markdown_base_name(file_name: &str) -> Option<&str> {
    let (base, _) = file_name.split_once('.')?;
    let (_, ext) = file_name.rsplit_once('.')?;
    if base.is_empty() || !ext.eq_ignore_ascii_case("md") {
        return None;
    }
    Some(base)
}

/// Result of walking a source directory.
#[derive(Debug, Default)]
pub struct DirectoryListing {
    /// Markdown files, in file-name order.
    pub jobs: Vec<ConversionJob>,
    /// Entries that could not be listed or stat'ed.
    pub errors: Vec<EntryError>,
    /// Entries that are directories or not Markdown.
    pub ignored: usize,
}

/// Split file-mode paths into jobs and skipped paths, preserving order.
pub fn collect_files(paths: &[PathBuf]) -> (Vec<ConversionJob>, Vec<PathBuf>) {
    let mut jobs = Vec::with_capacity(paths.len());
    let mut skipped = Vec::new();
    for path in paths {
        match ConversionJob::from_path(path, JobOrigin::File) {
            Some(job) => jobs.push(job),
            None => {
                debug!("Skipping non-Markdown file: {}", path.display());
                skipped.push(path.clone());
            }
        }
    }
    (jobs, skipped)
}

/// List the immediate entries of `dir` and keep the Markdown files.
///
/// Never fails: listing and stat errors are recorded in
/// [`DirectoryListing::errors`] and the walk continues with the next entry.
pub fn collect_directory(dir: &Path) -> DirectoryListing {
    let mut listing = DirectoryListing::default();

    let read_dir = match fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) => {
            warn!("Cannot list {}: {}", dir.display(), e);
            listing.errors.push(EntryError::ListFailed {
                path: dir.to_path_buf(),
                detail: e.to_string(),
            });
            return listing;
        }
    };

    let mut names = Vec::new();
    for entry in read_dir {
        match entry {
            Ok(entry) => names.push(entry.file_name()),
            Err(e) => {
                warn!("Cannot read entry in {}: {}", dir.display(), e);
                listing.errors.push(EntryError::StatFailed {
                    path: dir.to_path_buf(),
                    detail: e.to_string(),
                });
            }
        }
    }
    names.sort();

    for name in names {
        let path = dir.join(&name);
        // fs::metadata follows symlinks, so a link to a Markdown file counts.
        let meta = match fs::metadata(&path) {
            Ok(m) => m,
            Err(e) => {
                warn!("Cannot stat {}: {}", path.display(), e);
                listing.errors.push(EntryError::StatFailed {
                    path,
                    detail: e.to_string(),
                });
                continue;
            }
        };

        if meta.is_dir() {
            listing.ignored += 1;
            continue;
        }

        match ConversionJob::from_path(path, JobOrigin::Directory) {
            Some(job) => listing.jobs.push(job),
            None => listing.ignored += 1,
        }
    }

    debug!(
        "Collected {} Markdown files from {} ({} ignored, {} errors)",
        listing.jobs.len(),
        dir.display(),
        listing.ignored,
        listing.errors.len()
    );
    listing
}
