//! Build entry points.
//!
//! [`Generator`] holds everything that is loaded once per run: syntaxes and
//! theme, the generated stylesheet, and the parsed template. [`build`] drives
//! a whole [`Invocation`]: file-mode sources first, then the directory.
//!
//! Everything runs sequentially. The first fatal error stops the build;
//! pages written before it stay on disk, the failing page is never written.

use crate::collect::{self, ConversionJob, Invocation};
use crate::config::SiteConfig;
use crate::error::GensiteError;
use crate::output::{BuildReport, ConvertedFile, RenderedPage};
use crate::pipeline::compose::{self, PageComposer};
use crate::pipeline::highlight::Highlighter;
use crate::pipeline::markdown;
use std::fs;
use std::time::Instant;
use tracing::{debug, error, info};

/// Loaded per-run state shared by every conversion.
pub struct Generator {
    config: SiteConfig,
    highlighter: Highlighter,
    composer: PageComposer,
    stylesheet: String,
}

impl Generator {
    /// Load the theme, generate its stylesheet, and parse the template.
    ///
    /// Fails before anything is written if the theme is unknown or the
    /// template is missing or malformed.
    pub fn new(config: &SiteConfig) -> Result<Self, GensiteError> {
        let composer = PageComposer::load(&config.template_path)?;
        Self::with_composer(config, composer)
    }

    /// Like [`Generator::new`] but with an already parsed template.
    pub fn with_composer(config: &SiteConfig, composer: PageComposer) -> Result<Self, GensiteError> {
        let highlighter = Highlighter::new(&config.theme, config.unknown_language)?;
        let stylesheet = highlighter.stylesheet()?;
        debug!(
            "Generator ready: theme '{}', template {}",
            highlighter.theme_name(),
            composer.path().display()
        );
        Ok(Self {
            config: config.clone(),
            highlighter,
            composer,
            stylesheet,
        })
    }

    /// The stylesheet injected into every page.
    pub fn stylesheet(&self) -> &str {
        &self.stylesheet
    }

    /// Markdown → highlighted page data, without touching the filesystem.
    ///
    /// Returns the page plus `(code_blocks, highlighted_blocks)`.
    pub fn render_page(
        &self,
        source: &[u8],
        fallback_title: &str,
    ) -> Result<(RenderedPage, usize, usize), GensiteError> {
        let fragment = markdown::render_markdown(source, self.config.smart_punctuation);
        let highlighted = self.highlighter.highlight(&fragment)?;
        let page = RenderedPage {
            title: highlighted
                .title
                .unwrap_or_else(|| fallback_title.to_string()),
            content: highlighted.html,
            style: self.stylesheet.clone(),
        };
        Ok((page, highlighted.blocks, highlighted.highlighted))
    }

    /// Markdown → complete HTML document in memory.
    pub fn render_html(&self, source: &[u8], fallback_title: &str) -> Result<String, GensiteError> {
        let (page, _, _) = self.render_page(source, fallback_title)?;
        self.composer.render(&page)
    }

    /// Convert one job and write its page.
    pub fn convert_job(&self, job: &ConversionJob) -> Result<ConvertedFile, GensiteError> {
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_file_start(&job.input);
        }

        let source = fs::read(&job.input).map_err(|e| GensiteError::SourceReadFailed {
            path: job.input.clone(),
            source: e,
        })?;
        let (page, code_blocks, highlighted_blocks) = self.render_page(&source, &job.base_name)?;
        let html = self.composer.render(&page)?;

        let output = self
            .config
            .output_dir_for(&job.input)
            .join(job.output_file_name());
        compose::write_page(&output, &html)?;
        info!("Created {} from {}", output.display(), job.input.display());

        let converted = ConvertedFile {
            input: job.input.clone(),
            output,
            origin: job.origin,
            code_blocks,
            highlighted_blocks,
        };
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_file_complete(&converted);
        }
        Ok(converted)
    }

    fn run_job(&self, job: &ConversionJob) -> Result<ConvertedFile, GensiteError> {
        self.convert_job(job).map_err(|e| {
            error!("Converting {} failed: {}", job.input.display(), e);
            e
        })
    }
}

/// Run a whole build.
///
/// # Errors
/// Returns `Err(GensiteError)` for fatal errors only:
/// - unknown theme, missing or malformed template (before any page is written)
/// - unreadable Markdown source
/// - a code block that fails to highlight
/// - an output page that cannot be written
///
/// Directory listing and stat failures are not fatal; they end up in
/// [`BuildReport::entry_errors`].
pub fn build(invocation: &Invocation, config: &SiteConfig) -> Result<BuildReport, GensiteError> {
    let start = Instant::now();
    info!(
        "Starting build: {} file(s), directory: {:?}",
        invocation.sources.len(),
        invocation.directory
    );

    let generator = Generator::new(config)?;
    let mut report = BuildReport::default();

    // ── File mode ────────────────────────────────────────────────────────
    let (jobs, skipped) = collect::collect_files(&invocation.sources);
    if let Some(ref cb) = config.progress_callback {
        for path in &skipped {
            cb.on_file_skipped(path);
        }
    }
    report.skipped = skipped;
    for job in &jobs {
        report.converted.push(generator.run_job(job)?);
    }

    // ── Directory mode ───────────────────────────────────────────────────
    if let Some(ref dir) = invocation.directory {
        let listing = collect::collect_directory(dir);
        if let Some(ref cb) = config.progress_callback {
            for err in &listing.errors {
                cb.on_entry_error(err);
            }
        }
        report.entry_errors = listing.errors;

        let mut processed = 0;
        for job in &listing.jobs {
            report.converted.push(generator.run_job(job)?);
            processed += 1;
        }
        report.directory_count = Some(processed);
        if let Some(ref cb) = config.progress_callback {
            cb.on_directory_complete(dir, processed);
        }
    }

    report.duration_ms = start.elapsed().as_millis() as u64;
    info!(
        "Build complete: {} page(s) in {}ms",
        report.converted.len(),
        report.duration_ms
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_build_complete(report.converted.len());
    }
    Ok(report)
}
