//! Error types for the gensite library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`GensiteError`] — **Fatal**: the run cannot continue (unreadable
//!   source, missing template, a code block that fails to tokenize). Returned
//!   as `Err(GensiteError)` from [`crate::convert::build`] and the
//!   [`crate::convert::Generator`] methods.
//!
//! * [`EntryError`] — **Non-fatal**: a single directory entry could not be
//!   listed or stat'ed. Collected into [`crate::output::BuildReport`] while
//!   the remaining entries are still converted.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the gensite library.
///
/// Directory-entry failures use [`EntryError`] and are stored in
/// [`crate::output::BuildReport`] rather than propagated here.
#[derive(Debug, Error)]
pub enum GensiteError {
    // ── Source errors ─────────────────────────────────────────────────────
    /// A Markdown source file could not be read.
    #[error("Failed to read Markdown source '{path}': {source}")]
    SourceReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Highlighting errors ───────────────────────────────────────────────
    /// A fenced code block names a language no syntax definition matches.
    ///
    /// Only raised under [`crate::config::UnknownLanguage::Fail`]; the default
    /// policy passes such blocks through untouched.
    #[error("No syntax definition for code block language '{language}'")]
    UnknownLanguage { language: String },

    /// Tokenizing a code block failed.
    #[error("Highlighting a '{language}' code block failed: {detail}")]
    HighlightFailed { language: String, detail: String },

    /// The configured theme name is not one of the bundled themes.
    #[error("Unknown highlighting theme '{name}'\nAvailable themes: {available}")]
    UnknownTheme { name: String, available: String },

    /// CSS generation for the theme failed.
    #[error("Failed to generate stylesheet for theme '{theme}': {detail}")]
    StylesheetFailed { theme: String, detail: String },

    // ── Template errors ───────────────────────────────────────────────────
    /// The page template does not exist.
    #[error("Template file not found: '{path}'\nCreate it or point --template at an existing file.")]
    TemplateNotFound { path: PathBuf },

    /// The page template exists but could not be read.
    #[error("Failed to read template '{path}': {source}")]
    TemplateReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The page template is not valid Handlebars.
    #[error("Template '{path}' is malformed: {detail}")]
    TemplateInvalid { path: PathBuf, detail: String },

    /// Rendering the template failed (e.g. it references an unknown slot).
    #[error("Rendering template '{path}' failed: {detail}")]
    TemplateRenderFailed { path: PathBuf, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output HTML file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A non-fatal error for a single directory entry.
///
/// The directory walk reports it and moves on to the next entry.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum EntryError {
    /// The directory itself could not be listed.
    #[error("Cannot list directory '{path}': {detail}")]
    ListFailed { path: PathBuf, detail: String },

    /// A directory entry could not be read or stat'ed.
    #[error("Cannot stat '{path}': {detail}")]
    StatFailed { path: PathBuf, detail: String },
}

impl EntryError {
    /// The path the failure refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            EntryError::ListFailed { path, .. } | EntryError::StatFailed { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_not_found_display() {
        let e = GensiteError::TemplateNotFound {
            path: PathBuf::from("template.tmpl"),
        };
        let msg = e.to_string();
        assert!(msg.contains("template.tmpl"), "got: {msg}");
        assert!(msg.contains("--template"));
    }

    #[test]
    fn unknown_theme_lists_alternatives() {
        let e = GensiteError::UnknownTheme {
            name: "Monokai".into(),
            available: "InspiredGitHub, base16-ocean.dark".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("Monokai"));
        assert!(msg.contains("InspiredGitHub"));
    }

    #[test]
    fn highlight_failed_display() {
        let e = GensiteError::HighlightFailed {
            language: "rust".into(),
            detail: "bad scope".into(),
        };
        assert!(e.to_string().contains("'rust'"));
        assert!(e.to_string().contains("bad scope"));
    }

    #[test]
    fn source_read_failed_keeps_io_source() {
        use std::error::Error as _;
        let e = GensiteError::SourceReadFailed {
            path: PathBuf::from("missing.md"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(e.to_string().contains("missing.md"));
        assert!(e.source().is_some());
    }

    #[test]
    fn entry_error_path_and_display() {
        let e = EntryError::StatFailed {
            path: PathBuf::from("docs/broken.md"),
            detail: "dangling symlink".into(),
        };
        assert_eq!(e.path(), std::path::Path::new("docs/broken.md"));
        assert!(e.to_string().contains("dangling symlink"));
    }
}
