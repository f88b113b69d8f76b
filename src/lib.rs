//! # gensite
//!
//! Turn Markdown files into styled HTML pages with syntax-highlighted code
//! blocks, wrapped in a user-supplied HTML template.
//!
//! ## Pipeline Overview
//!
//! ```text
//! CLI args
//!  │
//!  ├─ 1. Collect    -f files and/or -d directory → ConversionJobs
//!  ├─ 2. Markdown   pulldown-cmark → HTML fragment
//!  ├─ 3. Highlight  scraper finds code[class*="language-"], syntect re-renders
//!  ├─ 4. Compose    Handlebars template + generated theme stylesheet
//!  └─ 5. Write      <basename>.html, atomically
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gensite::{build, Invocation, SiteConfig};
//! use std::path::PathBuf;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SiteConfig::builder()
//!         .template_path("template.tmpl")
//!         .theme("InspiredGitHub")
//!         .build()?;
//!     let invocation = Invocation::new(vec![PathBuf::from("README.md")], None);
//!     let report = build(&invocation, &config)?;
//!     for page in &report.converted {
//!         println!("{}", page.output.display());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Template
//!
//! The template is Handlebars. `{{{content}}}` and `{{{style}}}` insert the
//! page body and stylesheet unescaped; `{{title}}` inserts the escaped title.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `gensite` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod collect;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use collect::{ConversionJob, Invocation, JobOrigin};
pub use config::{OutputPlacement, SiteConfig, SiteConfigBuilder, UnknownLanguage};
pub use convert::{build, Generator};
pub use error::{EntryError, GensiteError};
pub use output::{BuildReport, ConvertedFile, RenderedPage};
pub use pipeline::highlight::available_themes;
pub use progress::{BuildProgressCallback, NoopProgressCallback, ProgressCallback};
