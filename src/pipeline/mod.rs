//! Pipeline stages for Markdown-to-HTML page generation.
//!
//! Each submodule implements exactly one transformation step.
//!
//! ## Data Flow
//!
//! ```text
//! markdown ──▶ highlight ──▶ compose
//! (bytes→HTML)  (code blocks)  (template + write)
//! ```
//!
//! 1. [`markdown`]  — pulldown-cmark with tables, footnotes, task lists,
//!    strikethrough and smart punctuation
//! 2. [`highlight`] — find `code[class*="language-"]` with scraper and
//!    re-render each block through syntect's class-based HTML generator
//! 3. [`compose`]   — fill the Handlebars page template and write the
//!    result atomically

pub mod compose;
pub mod highlight;
pub mod markdown;
