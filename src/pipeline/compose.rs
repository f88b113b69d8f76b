//! Page composition: fill the Handlebars template and write the page.
//!
//! The template is an ordinary HTML file with three slots:
//!
//! ```text
//! {{title}}        escaped page title
//! {{{style}}}      highlighting stylesheet, inserted raw
//! {{{content}}}    highlighted body HTML, inserted raw
//! ```
//!
//! Strict mode is on, so a misspelt slot fails the render instead of
//! silently producing an empty page.

use crate::error::GensiteError;
use crate::output::RenderedPage;
use handlebars::Handlebars;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

const PAGE: &str = "page";

/// A parsed page template.
pub struct PageComposer {
    registry: Handlebars<'static>,
    path: PathBuf,
}

impl PageComposer {
    /// Read and parse the template at `path`.
    pub fn load(path: &Path) -> Result<Self, GensiteError> {
        let source = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => GensiteError::TemplateNotFound {
                path: path.to_path_buf(),
            },
            _ => GensiteError::TemplateReadFailed {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        Self::from_source(path, &source)
    }

    /// Parse template text; `path` is only used in error messages.
    pub fn from_source(path: impl Into<PathBuf>, source: &str) -> Result<Self, GensiteError> {
        let path = path.into();
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry
            .register_template_string(PAGE, source)
            .map_err(|e| GensiteError::TemplateInvalid {
                path: path.clone(),
                detail: e.to_string(),
            })?;
        debug!("Loaded template {}", path.display());
        Ok(Self { registry, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Render `page` into a complete HTML document.
    pub fn render(&self, page: &RenderedPage) -> Result<String, GensiteError> {
        self.registry
            .render(PAGE, page)
            .map_err(|e| GensiteError::TemplateRenderFailed {
                path: self.path.clone(),
                detail: e.to_string(),
            })
    }
}

/// Write `contents` to `path` atomically.
///
/// The data goes to a temp file in the same directory which is then renamed
/// over `path`, so a failed run never leaves a truncated page behind and an
/// existing page is replaced in one step.
pub fn write_page(path: &Path, contents: &str) -> Result<(), GensiteError> {
    let write_failed = |source| GensiteError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(write_failed)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".gensite-")
        .suffix(".html.tmp")
        .tempfile_in(dir)
        .map_err(write_failed)?;
    tmp.write_all(contents.as_bytes()).map_err(write_failed)?;
    tmp.persist(path).map_err(|e| write_failed(e.error))?;
    Ok(())
}
