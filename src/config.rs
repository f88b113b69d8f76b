//! Configuration types for site generation.
//!
//! All generation behaviour is controlled through [`SiteConfig`], built via
//! its [`SiteConfigBuilder`]. The config is created once from the command
//! line (or by a library caller) and passed by reference into every stage;
//! nothing in the pipeline reads process-wide state.

use crate::error::GensiteError;
use crate::progress::BuildProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default template path, relative to the working directory.
pub const DEFAULT_TEMPLATE: &str = "template.tmpl";

/// Default highlighting theme. Must be one of syntect's bundled themes.
pub const DEFAULT_THEME: &str = "InspiredGitHub";

/// Configuration for a site build.
///
/// Built via [`SiteConfig::builder()`] or using [`SiteConfig::default()`].
///
/// # Example
/// ```rust
/// use gensite::{OutputPlacement, SiteConfig};
///
/// let config = SiteConfig::builder()
///     .theme("base16-ocean.dark")
///     .template_path("layout/page.tmpl")
///     .placement(OutputPlacement::BesideSource)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct SiteConfig {
    /// Highlighting theme used to generate the page stylesheet. Default: `InspiredGitHub`.
    ///
    /// Highlighted blocks carry only CSS classes, so this single setting
    /// decides every colour on the page.
    pub theme: String,

    /// Path of the Handlebars page template. Default: `template.tmpl`.
    pub template_path: PathBuf,

    /// Directory that receives output pages under [`OutputPlacement::OutDir`]. Default: `.`.
    pub out_dir: PathBuf,

    /// Where each `<basename>.html` is written. Default: [`OutputPlacement::OutDir`].
    pub placement: OutputPlacement,

    /// What to do with a code block whose language has no syntax definition.
    /// Default: [`UnknownLanguage::PassThrough`].
    pub unknown_language: UnknownLanguage,

    /// Turn straight quotes and `--`/`...` into typographic punctuation. Default: true.
    pub smart_punctuation: bool,

    /// Optional progress callback for per-file events.
    pub progress_callback: Option<Arc<dyn BuildProgressCallback>>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            template_path: PathBuf::from(DEFAULT_TEMPLATE),
            out_dir: PathBuf::from("."),
            placement: OutputPlacement::default(),
            unknown_language: UnknownLanguage::default(),
            smart_punctuation: true,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for SiteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiteConfig")
            .field("theme", &self.theme)
            .field("template_path", &self.template_path)
            .field("out_dir", &self.out_dir)
            .field("placement", &self.placement)
            .field("unknown_language", &self.unknown_language)
            .field("smart_punctuation", &self.smart_punctuation)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn BuildProgressCallback>"),
            )
            .finish()
    }
}

impl SiteConfig {
    /// Create a new builder for `SiteConfig`.
    pub fn builder() -> SiteConfigBuilder {
        SiteConfigBuilder {
            config: Self::default(),
        }
    }

    /// Directory an output page for `input` is written to.
    pub fn output_dir_for<'a>(&'a self, input: &'a Path) -> &'a Path {
        match self.placement {
            OutputPlacement::OutDir => &self.out_dir,
            OutputPlacement::BesideSource => input
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new(".")),
        }
    }
}

/// Builder for [`SiteConfig`].
#[derive(Debug)]
pub struct SiteConfigBuilder {
    config: SiteConfig,
}

impl SiteConfigBuilder {
    pub fn theme(mut self, name: impl Into<String>) -> Self {
        self.config.theme = name.into();
        self
    }

    pub fn template_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.template_path = path.into();
        self
    }

    pub fn out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.out_dir = dir.into();
        self
    }

    pub fn placement(mut self, placement: OutputPlacement) -> Self {
        self.config.placement = placement;
        self
    }

    pub fn unknown_language(mut self, policy: UnknownLanguage) -> Self {
        self.config.unknown_language = policy;
        self
    }

    pub fn smart_punctuation(mut self, v: bool) -> Self {
        self.config.smart_punctuation = v;
        self
    }

    pub fn progress_callback(mut self, cb: Arc<dyn BuildProgressCallback>) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    ///
    /// Whether the theme actually exists is checked when the
    /// [`crate::convert::Generator`] loads it.
    pub fn build(self) -> Result<SiteConfig, GensiteError> {
        let c = &self.config;
        if c.theme.trim().is_empty() {
            return Err(GensiteError::InvalidConfig(
                "Theme name must not be empty".into(),
            ));
        }
        if c.template_path.as_os_str().is_empty() {
            return Err(GensiteError::InvalidConfig(
                "Template path must not be empty".into(),
            ));
        }
        if c.placement == OutputPlacement::OutDir && c.out_dir.as_os_str().is_empty() {
            return Err(GensiteError::InvalidConfig(
                "Output directory must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Where generated pages land.
///
/// Directory-mode inputs are read from the source directory; this decides
/// whether the pages follow them there or collect in one output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputPlacement {
    /// Write every page into [`SiteConfig::out_dir`]. (default)
    #[default]
    OutDir,
    /// Write each page into the directory of its Markdown source.
    BesideSource,
}

/// Policy for fenced code blocks whose language has no syntax definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnknownLanguage {
    /// Leave the block exactly as the Markdown renderer produced it. (default)
    #[default]
    PassThrough,
    /// Fail the conversion with [`GensiteError::UnknownLanguage`].
    Fail,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = SiteConfig::default();
        assert_eq!(c.theme, DEFAULT_THEME);
        assert_eq!(c.template_path, PathBuf::from("template.tmpl"));
        assert_eq!(c.out_dir, PathBuf::from("."));
        assert_eq!(c.placement, OutputPlacement::OutDir);
        assert_eq!(c.unknown_language, UnknownLanguage::PassThrough);
        assert!(c.progress_callback.is_none());
    }

    #[test]
    fn builder_sets_fields() {
        let c = SiteConfig::builder()
            .theme("Solarized (dark)")
            .template_path("t/page.hbs")
            .out_dir("public")
            .unknown_language(UnknownLanguage::Fail)
            .smart_punctuation(false)
            .build()
            .expect("valid config");
        assert_eq!(c.theme, "Solarized (dark)");
        assert_eq!(c.template_path, PathBuf::from("t/page.hbs"));
        assert_eq!(c.out_dir, PathBuf::from("public"));
        assert_eq!(c.unknown_language, UnknownLanguage::Fail);
        assert!(!c.smart_punctuation);
    }

    #[test]
    fn empty_theme_rejected() {
        let err = SiteConfig::builder().theme("  ").build().unwrap_err();
        assert!(matches!(err, GensiteError::InvalidConfig(_)));
    }

    #[test]
    fn empty_template_rejected() {
        let err = SiteConfig::builder().template_path("").build().unwrap_err();
        assert!(matches!(err, GensiteError::InvalidConfig(_)));
    }

    #[test]
    fn output_dir_for_out_dir_placement() {
        let c = SiteConfig::builder().out_dir("site").build().unwrap();
        assert_eq!(c.output_dir_for(Path::new("docs/a.md")), Path::new("site"));
    }

    #[test]
    fn output_dir_for_beside_source() {
        let c = SiteConfig::builder()
            .placement(OutputPlacement::BesideSource)
            .build()
            .unwrap();
        assert_eq!(c.output_dir_for(Path::new("docs/a.md")), Path::new("docs"));
        // bare file name has an empty parent
        assert_eq!(c.output_dir_for(Path::new("a.md")), Path::new("."));
    }

    #[test]
    fn debug_hides_callback() {
        let c = SiteConfig::default();
        let s = format!("{c:?}");
        assert!(s.contains("InspiredGitHub"));
        assert!(s.contains("progress_callback"));
    }
}
