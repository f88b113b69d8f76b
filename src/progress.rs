//! Progress-callback trait for per-file build events.
//!
//! Inject an [`Arc<dyn BuildProgressCallback>`] via
//! [`crate::config::SiteConfigBuilder::progress_callback`] to receive events
//! as the build converts, skips, or fails to read each entry. The library
//! itself never prints; the `gensite` binary implements this trait to show
//! `Created file: …` lines and the directory summary.
//!
//! # Example
//!
//! ```rust
//! use gensite::{BuildProgressCallback, ConvertedFile, SiteConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct Counter(AtomicUsize);
//!
//! impl BuildProgressCallback for Counter {
//!     fn on_file_complete(&self, file: &ConvertedFile) {
//!         self.0.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("wrote {}", file.output.display());
//!     }
//! }
//!
//! let config = SiteConfig::builder()
//!     .progress_callback(Arc::new(Counter(AtomicUsize::new(0))))
//!     .build()
//!     .unwrap();
//! ```

use crate::error::EntryError;
use crate::output::ConvertedFile;
use std::path::Path;
use std::sync::Arc;

/// Called by the build as it processes each source file.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Builds are sequential; the `Send + Sync` bound only
/// lets a configured [`crate::config::SiteConfig`] cross threads.
pub trait BuildProgressCallback: Send + Sync {
    /// Called just before a Markdown file is read.
    fn on_file_start(&self, input: &Path) {
        let _ = input;
    }

    /// Called after the page for a file has been written.
    fn on_file_complete(&self, file: &ConvertedFile) {
        let _ = file;
    }

    /// Called for a file-mode path that is not a Markdown file.
    fn on_file_skipped(&self, input: &Path) {
        let _ = input;
    }

    /// Called when a directory entry cannot be listed or stat'ed.
    fn on_entry_error(&self, error: &EntryError) {
        let _ = error;
    }

    /// Called once after the directory walk.
    ///
    /// # Arguments
    /// * `dir`       — the source directory
    /// * `processed` — Markdown files converted from it
    fn on_directory_complete(&self, dir: &Path, processed: usize) {
        let _ = (dir, processed);
    }

    /// Called once after every job has been attempted.
    fn on_build_complete(&self, converted: usize) {
        let _ = converted;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl BuildProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::SiteConfig`].
pub type ProgressCallback = Arc<dyn BuildProgressCallback>;
