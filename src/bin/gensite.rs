//! CLI binary for gensite.
//!
//! A thin shim over the library crate that maps CLI flags to an
//! `Invocation` plus a `SiteConfig` and prints results.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use gensite::{
    available_themes, build, BuildProgressCallback, ConvertedFile, EntryError, Invocation,
    JobOrigin, OutputPlacement, SiteConfig, UnknownLanguage,
};
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn magenta(s: &str) -> String {
    format!("\x1b[35m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── Console progress callback ────────────────────────────────────────────────

/// Prints one confirmation line per `-f` page and the directory summary.
struct ConsoleProgress;

/// Confirmation for a converted file; directory pages are only counted.
fn created_line(file: &ConvertedFile) -> Option<String> {
    (file.origin == JobOrigin::File)
        .then(|| format!("Created file: {}", magenta(&file.output.display().to_string())))
}

impl BuildProgressCallback for ConsoleProgress {
    fn on_file_complete(&self, file: &ConvertedFile) {
        if let Some(line) = created_line(file) {
            println!("{line}");
        }
    }

    fn on_entry_error(&self, error: &EntryError) {
        eprintln!("{} {}", red("✗"), error);
    }

    fn on_directory_complete(&self, _dir: &Path, processed: usize) {
        println!("Processed {} files", bold(&processed.to_string()));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert one file (writes guide.html to the current directory)
  gensite -f guide.md

  # Convert several files
  gensite -f intro.md -f usage.md

  # Convert every *.md in a directory, pages next to their sources
  gensite -d docs --beside-source

  # Different colours
  gensite -d docs --theme "Solarized (dark)"

TEMPLATE:
  Pages are rendered through a Handlebars template (default ./template.tmpl):

    <title>{{title}}</title>
    <style>{{{style}}}</style>
    <body>{{{content}}}</body>

NAMING:
  The output name is the input name up to its first dot:
  report.v2.md → report.html
"#;

/// Convert Markdown files to syntax-highlighted HTML pages.
#[derive(Parser, Debug)]
#[command(
    name = "gensite",
    version,
    about = "Convert Markdown files to syntax-highlighted HTML pages",
    override_usage = "gensite -f <file.md> [-f <file.md> ...]\n       gensite -d <directory>",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Markdown file to convert (repeatable).
    #[arg(short, long = "file", value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Directory whose *.md files are converted (last one wins).
    #[arg(short, long, value_name = "DIR")]
    directory: Vec<PathBuf>,

    /// Handlebars page template.
    #[arg(long, env = "GENSITE_TEMPLATE", default_value = gensite::config::DEFAULT_TEMPLATE)]
    template: PathBuf,

    /// Highlighting theme (see --list-themes).
    #[arg(long, env = "GENSITE_THEME", default_value = gensite::config::DEFAULT_THEME)]
    theme: String,

    /// Directory that receives the generated pages.
    #[arg(short, long, env = "GENSITE_OUT_DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Write each page next to its Markdown source instead of --out-dir.
    #[arg(long)]
    beside_source: bool,

    /// Fail on code blocks whose language has no syntax definition.
    #[arg(long)]
    strict_languages: bool,

    /// Keep straight quotes and dashes as typed.
    #[arg(long)]
    no_smart_punctuation: bool,

    /// Print the available highlighting themes and exit.
    #[arg(long)]
    list_themes: bool,

    /// Print the build report as JSON instead of per-file lines.
    #[arg(long)]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "GENSITE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "GENSITE_QUIET")]
    quiet: bool,

    /// Unrecognised arguments; accepted and ignored.
    #[arg(hide = true)]
    rest: Vec<String>,
}

/// Pull options `Cli` does not define out of `args`.
///
/// Returns the arguments to hand to clap and the unknown option tokens.
/// Values of known options are kept with their option, so `--bogus -f a.md`
/// still reads `a.md` as a file. Everything after `--` is passed through.
fn split_unrecognised<I, T>(args: I) -> (Vec<OsString>, Vec<String>)
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let cmd = Cli::command();
    let known_long = |name: &str| -> Option<bool> {
        match name {
            "help" | "version" => Some(false),
            _ => cmd
                .get_arguments()
                .find(|a| a.get_long() == Some(name))
                .map(|a| a.get_action().takes_values()),
        }
    };
    let known_short = |c: char| -> Option<bool> {
        match c {
            'h' | 'V' => Some(false),
            _ => cmd
                .get_arguments()
                .find(|a| a.get_short() == Some(c))
                .map(|a| a.get_action().takes_values()),
        }
    };

    let mut kept = Vec::new();
    let mut unknown = Vec::new();
    let mut args = args.into_iter().map(Into::<OsString>::into);
    if let Some(bin) = args.next() {
        kept.push(bin);
    }

    while let Some(arg) = args.next() {
        let Some(text) = arg.to_str().map(str::to_owned) else {
            kept.push(arg);
            continue;
        };
        if text == "--" {
            kept.push(arg);
            kept.extend(args.by_ref());
            break;
        }

        // Some(true): known, value in the next token.
        let known = if let Some(long) = text.strip_prefix("--") {
            match long.split_once('=') {
                Some((name, _)) => known_long(name).map(|_| false),
                None => known_long(long),
            }
        } else if let Some(shorts) = text.strip_prefix('-').filter(|s| !s.is_empty()) {
            let mut needs_value = Some(false);
            for (i, c) in shorts.char_indices() {
                match known_short(c) {
                    None => {
                        needs_value = None;
                        break;
                    }
                    Some(true) => {
                        needs_value = Some(i + c.len_utf8() == shorts.len());
                        break;
                    }
                    Some(false) => {}
                }
            }
            needs_value
        } else {
            kept.push(arg);
            continue;
        };

        match known {
            Some(needs_value) => {
                kept.push(arg);
                if needs_value {
                    kept.extend(args.next());
                }
            }
            None => unknown.push(text),
        }
    }
    (kept, unknown)
}

fn main() -> Result<()> {
    let (args, unknown) = split_unrecognised(std::env::args_os());
    let mut cli = Cli::parse_from(args);
    cli.rest.extend(unknown);

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    if !cli.rest.is_empty() {
        debug!("Ignoring unrecognised arguments: {:?}", cli.rest);
    }

    // ── List-only mode ───────────────────────────────────────────────────
    if cli.list_themes {
        for name in available_themes() {
            println!("{name}");
        }
        return Ok(());
    }

    // ── Nothing to do: usage, clean exit ─────────────────────────────────
    let invocation = Invocation::new(cli.files.clone(), cli.directory.last().cloned());
    if invocation.is_empty() {
        Cli::command()
            .print_help()
            .context("Failed to print usage")?;
        println!();
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let config = build_config(&cli)?;

    // ── Run ──────────────────────────────────────────────────────────────
    let report = build(&invocation, &config).context("Site generation failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialise report")?
        );
    }
    debug!(
        "{} page(s), {} skipped, {} entry error(s), {}ms",
        report.converted.len(),
        report.skipped.len(),
        report.entry_errors.len(),
        report.duration_ms
    );

    Ok(())
}

/// Map CLI args to `SiteConfig`.
fn build_config(cli: &Cli) -> Result<SiteConfig> {
    let mut builder = SiteConfig::builder()
        .template_path(&cli.template)
        .theme(&cli.theme)
        .out_dir(&cli.out_dir)
        .smart_punctuation(!cli.no_smart_punctuation);

    if cli.beside_source {
        builder = builder.placement(OutputPlacement::BesideSource);
    }
    if cli.strict_languages {
        builder = builder.unknown_language(UnknownLanguage::Fail);
    }
    if !cli.quiet && !cli.json {
        builder = builder.progress_callback(Arc::new(ConsoleProgress));
    }

    builder.build().context("Invalid configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn files_accumulate_in_order() {
        let cli = Cli::try_parse_from(["gensite", "-f", "b.md", "--file", "a.md"]).unwrap();
        assert_eq!(cli.files, vec![PathBuf::from("b.md"), PathBuf::from("a.md")]);
        assert!(cli.directory.is_empty());
    }

    #[test]
    fn later_directory_wins() {
        let cli = Cli::try_parse_from(["gensite", "-d", "first", "-d", "second"]).unwrap();
        assert_eq!(cli.directory.last(), Some(&PathBuf::from("second")));
    }

    #[test]
    fn stray_tokens_are_collected() {
        let cli = Cli::try_parse_from(["gensite", "-f", "a.md", "stray", "other"]).unwrap();
        assert_eq!(cli.files, vec![PathBuf::from("a.md")]);
        assert_eq!(cli.rest, vec!["stray".to_string(), "other".to_string()]);
    }

    #[test]
    fn unknown_flags_are_set_aside() {
        let (args, unknown) = split_unrecognised(["gensite", "--bogus", "-f", "a.md", "-x"]);
        assert_eq!(unknown, vec!["--bogus".to_string(), "-x".to_string()]);

        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.files, vec![PathBuf::from("a.md")]);
        assert!(!Invocation::new(cli.files, cli.directory.last().cloned()).is_empty());
    }

    #[test]
    fn option_values_stay_with_their_option() {
        let (args, unknown) = split_unrecognised([
            "gensite",
            "--weird=1",
            "-d",
            "docs",
            "--theme=base16-ocean.dark",
            "-vf",
            "b.md",
            "-fc.md",
            "stray",
        ]);
        assert_eq!(unknown, vec!["--weird=1".to_string()]);

        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.directory, vec![PathBuf::from("docs")]);
        assert_eq!(cli.theme, "base16-ocean.dark");
        assert!(cli.verbose);
        assert_eq!(cli.files, vec![PathBuf::from("b.md"), PathBuf::from("c.md")]);
        assert_eq!(cli.rest, vec!["stray".to_string()]);
    }

    #[test]
    fn help_survives_the_split() {
        let (args, unknown) = split_unrecognised(["gensite", "--nope", "--help"]);
        assert_eq!(unknown, vec!["--nope".to_string()]);
        let err = Cli::try_parse_from(args).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn created_line_only_for_file_mode() {
        let page = |origin| ConvertedFile {
            input: PathBuf::from("docs/a.md"),
            output: PathBuf::from("a.html"),
            origin,
            code_blocks: 0,
            highlighted_blocks: 0,
        };
        let line = created_line(&page(JobOrigin::File)).unwrap();
        assert!(line.starts_with("Created file: "));
        assert!(line.contains("a.html"));
        assert!(created_line(&page(JobOrigin::Directory)).is_none());
    }

    #[test]
    fn no_input_is_empty_invocation() {
        let cli = Cli::try_parse_from(["gensite"]).unwrap();
        assert!(Invocation::new(cli.files, cli.directory.last().cloned()).is_empty());
    }

    #[test]
    fn help_exits_cleanly() {
        let err = Cli::try_parse_from(["gensite", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        assert_eq!(err.exit_code(), 0);
    }

    #[test]
    fn flags_map_to_config() {
        let cli = Cli::try_parse_from([
            "gensite",
            "-d",
            "docs",
            "--beside-source",
            "--strict-languages",
            "--theme",
            "base16-ocean.dark",
            "--template",
            "layout.hbs",
        ])
        .unwrap();
        let config = build_config(&cli).unwrap();
        assert_eq!(config.placement, OutputPlacement::BesideSource);
        assert_eq!(config.unknown_language, UnknownLanguage::Fail);
        assert_eq!(config.theme, "base16-ocean.dark");
        assert_eq!(config.template_path, PathBuf::from("layout.hbs"));
    }
}
