//! Result types produced by a build.

use crate::collect::JobOrigin;
use crate::error::EntryError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The data a page template is rendered with.
///
/// Field names are the template slot names: `{{{content}}}`, `{{{style}}}`
/// and `{{title}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedPage {
    /// Page title: the first `<h1>`'s text, or the job's base name.
    pub title: String,
    /// Highlighted body HTML (trusted, inserted unescaped).
    pub content: String,
    /// Highlighting stylesheet (trusted, inserted unescaped).
    pub style: String,
}

/// One successfully written page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertedFile {
    pub input: PathBuf,
    pub output: PathBuf,
    pub origin: JobOrigin,
    /// Code elements carrying a `language-` class.
    pub code_blocks: usize,
    /// Of those, how many were actually highlighted.
    pub highlighted_blocks: usize,
}

/// Summary of a whole build.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildReport {
    /// Pages written, in processing order.
    pub converted: Vec<ConvertedFile>,
    /// File-mode paths that were not Markdown files.
    pub skipped: Vec<PathBuf>,
    /// Non-fatal directory listing failures.
    pub entry_errors: Vec<EntryError>,
    /// Files converted from the `-d` directory; `None` without one.
    pub directory_count: Option<usize>,
    pub duration_ms: u64,
}

impl BuildReport {
    /// Pages converted from `-f` paths.
    pub fn file_count(&self) -> usize {
        self.converted
            .iter()
            .filter(|c| c.origin == JobOrigin::File)
            .count()
    }
}
