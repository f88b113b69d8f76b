//! Code-block highlighting: rewrite `language-*` code elements in place.
//!
//! The fragment is parsed with scraper, every matching `code` element is
//! re-rendered by syntect's class-based HTML generator, and the resulting
//! nodes are grafted back into the document tree in place of the element's
//! old children. Highlighted markup carries `hl-`-prefixed classes only; all
//! colours come from the stylesheet produced by [`Highlighter::stylesheet`].

use crate::config::UnknownLanguage;
use crate::error::GensiteError;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;
use tracing::debug;

/// Class prefix for highlighted spans, shared by markup and stylesheet.
pub const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

const LANGUAGE_PREFIX: &str = "language-";

static CODE_BLOCKS: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"code[class*="language-"]"#).unwrap());

static FIRST_H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());

/// A highlighted fragment plus block counts for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighted {
    /// The rewritten fragment, without any parser-added wrapper.
    pub html: String,
    /// Code elements carrying a `language-` class.
    pub blocks: usize,
    /// Of those, how many were rewritten.
    pub highlighted: usize,
    /// Text of the first `<h1>`, if any.
    pub title: Option<String>,
}

/// Loaded syntaxes plus the selected theme.
pub struct Highlighter {
    syntaxes: SyntaxSet,
    theme_name: String,
    theme: Theme,
    unknown_language: UnknownLanguage,
}

impl Highlighter {
    /// Load the bundled syntaxes and look up `theme_name` among the bundled themes.
    pub fn new(theme_name: &str, unknown_language: UnknownLanguage) -> Result<Self, GensiteError> {
        let mut themes = ThemeSet::load_defaults();
        let theme = themes.themes.remove(theme_name).ok_or_else(|| {
            GensiteError::UnknownTheme {
                name: theme_name.to_string(),
                available: available_themes().join(", "),
            }
        })?;
        Ok(Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            theme_name: theme_name.to_string(),
            theme,
            unknown_language,
        })
    }

    pub fn theme_name(&self) -> &str {
        &self.theme_name
    }

    /// CSS for the selected theme, matching the classes emitted by [`Self::highlight`].
    pub fn stylesheet(&self) -> Result<String, GensiteError> {
        css_for_theme_with_class_style(&self.theme, CLASS_STYLE).map_err(|e| {
            GensiteError::StylesheetFailed {
                theme: self.theme_name.clone(),
                detail: e.to_string(),
            }
        })
    }

    /// Highlight one block of source code as `language`.
    ///
    /// Returns `Ok(None)` if no syntax matches the language.
    pub fn highlight_code(&self, language: &str, code: &str) -> Result<Option<String>, GensiteError> {
        let Some(syntax) = self.syntaxes.find_syntax_by_token(language) else {
            return Ok(None);
        };
        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntaxes, CLASS_STYLE);
        for line in LinesWithEndings::from(code) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .map_err(|e| GensiteError::HighlightFailed {
                    language: language.to_string(),
                    detail: e.to_string(),
                })?;
        }
        Ok(Some(generator.finalize()))
    }

    /// Rewrite every `language-*` code element in `fragment`.
    ///
    /// Fails fast: the first block that cannot be highlighted aborts the
    /// whole fragment, so callers never see partially rewritten output.
    pub fn highlight(&self, fragment: &str) -> Result<Highlighted, GensiteError> {
        let mut doc = Html::parse_fragment(fragment);

        let targets: Vec<_> = doc
            .select(&CODE_BLOCKS)
            .filter_map(|el| {
                let language = el
                    .value()
                    .classes()
                    .find_map(|c| c.strip_prefix(LANGUAGE_PREFIX))
                    .filter(|l| !l.is_empty())?
                    .to_string();
                Some((el.id(), language, el.text().collect::<String>()))
            })
            .collect();
        let title = doc
            .select(&FIRST_H1)
            .next()
            .map(|h| h.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty());

        let blocks = targets.len();
        let mut highlighted = 0;
        for (id, language, code) in targets {
            let Some(markup) = self.highlight_code(&language, &code)? else {
                match self.unknown_language {
                    UnknownLanguage::PassThrough => {
                        debug!("No syntax for '{}', leaving block as is", language);
                        continue;
                    }
                    UnknownLanguage::Fail => {
                        return Err(GensiteError::UnknownLanguage { language });
                    }
                }
            };

            // Drop the element's plain-text children ...
            let old: Vec<_> = doc
                .tree
                .get(id)
                .map(|node| node.children().map(|c| c.id()).collect())
                .unwrap_or_default();
            for child in old {
                if let Some(mut child) = doc.tree.get_mut(child) {
                    child.detach();
                }
            }

            // ... and graft in the highlighted nodes. parse_fragment wraps
            // its content in an <html> element, so copy that element's children.
            let rendered = Html::parse_fragment(&markup);
            let mut pending = vec![(rendered.root_element().id(), id)];
            while let Some((src_id, dest_id)) = pending.pop() {
                let Some(src) = rendered.tree.get(src_id) else {
                    continue;
                };
                for child in src.children() {
                    let Some(mut dest) = doc.tree.get_mut(dest_id) else {
                        break;
                    };
                    let copied = dest.append(child.value().clone()).id();
                    pending.push((child.id(), copied));
                }
            }
            highlighted += 1;
        }
        debug!("Highlighted {}/{} code blocks", highlighted, blocks);

        Ok(Highlighted {
            html: doc.root_element().inner_html(),
            blocks,
            highlighted,
            title,
        })
    }
}

/// Names of the bundled themes, sorted.
pub fn available_themes() -> Vec<String> {
    let mut names: Vec<String> = ThemeSet::load_defaults().themes.into_keys().collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn highlighter() -> Highlighter {
        Highlighter::new("InspiredGitHub", UnknownLanguage::PassThrough).expect("bundled theme")
    }

    /// Visible text of the first `code` element in `html`.
    fn code_text(html: &str) -> String {
        let doc = Html::parse_fragment(html);
        let sel = Selector::parse("code").unwrap();
        doc.select(&sel)
            .next()
            .map(|c| c.text().collect())
            .unwrap_or_default()
    }

    #[test]
    fn known_language_gets_classed_spans() {
        let input = "<pre><code class=\"language-rust\">fn main() {\n    let x = 1;\n}\n</code></pre>\n";
        let out = highlighter().highlight(input).unwrap();
        assert_eq!(out.blocks, 1);
        assert_eq!(out.highlighted, 1);
        assert!(out.html.contains("class=\"hl-"), "got: {}", out.html);
        assert!(!out.html.contains("style="), "no inline styles: {}", out.html);
    }

    #[test]
    fn visible_text_is_preserved_exactly() {
        let code = "if (a < b && c > d) {\n\treturn \"x\";\n}\n\n";
        let fragment = crate::pipeline::markdown::render_markdown(
            format!("```c\n{code}```\n").as_bytes(),
            true,
        );
        let out = highlighter().highlight(&fragment).unwrap();
        assert_eq!(out.highlighted, 1);
        assert_eq!(code_text(&out.html), code);
    }

    #[test]
    fn unknown_language_passes_through() {
        let input = "<pre><code class=\"language-nosuchlang\">a &lt; b\n</code></pre>";
        let out = highlighter().highlight(input).unwrap();
        assert_eq!(out.blocks, 1);
        assert_eq!(out.highlighted, 0);
        assert!(!out.html.contains("hl-"));
        assert!(out.html.contains("class=\"language-nosuchlang\""));
        assert_eq!(code_text(&out.html), "a < b\n");
    }

    #[test]
    fn unknown_language_fails_in_strict_mode() {
        let h = Highlighter::new("InspiredGitHub", UnknownLanguage::Fail).unwrap();
        let input = "<pre><code class=\"language-nosuchlang\">x\n</code></pre>";
        let err = h.highlight(input).unwrap_err();
        assert!(
            matches!(err, GensiteError::UnknownLanguage { ref language } if language == "nosuchlang"),
            "got: {err:?}"
        );
    }

    #[test]
    fn plain_code_is_untouched() {
        let input = "<h1>Title</h1>\n<p>Use <code>cargo</code> here.</p>\n<pre><code>plain\n</code></pre>\n";
        let out = highlighter().highlight(input).unwrap();
        assert_eq!(out.blocks, 0);
        assert!(out.html.contains("<h1>Title</h1>"));
        assert!(out.html.contains("<p>Use <code>cargo</code> here.</p>"));
        assert!(!out.html.contains("hl-"));
    }

    #[test]
    fn no_wrapper_elements_leak() {
        let out = highlighter()
            .highlight("<p>hello</p>\n<pre><code class=\"language-python\">print(1)\n</code></pre>\n")
            .unwrap();
        assert!(!out.html.contains("<html"), "got: {}", out.html);
        assert!(!out.html.contains("<body"), "got: {}", out.html);
        assert!(out.html.starts_with("<p>hello</p>"));
    }

    #[test]
    fn language_token_among_other_classes() {
        let input = "<pre><code class=\"block language-js\">let a = 1;\n</code></pre>";
        let out = highlighter().highlight(input).unwrap();
        assert_eq!(out.highlighted, 1);
        assert_eq!(code_text(&out.html), "let a = 1;\n");
    }

    #[test]
    fn every_block_is_rewritten() {
        let input = "<pre><code class=\"language-rust\">let a = 1;\n</code></pre>\n\
                     <p>between</p>\n\
                     <pre><code class=\"language-python\">a = 1\n</code></pre>\n";
        let out = highlighter().highlight(input).unwrap();
        assert_eq!(out.blocks, 2);
        assert_eq!(out.highlighted, 2);
        assert!(out.html.contains("<p>between</p>"));
    }

    #[test]
    fn title_from_first_h1() {
        let out = highlighter()
            .highlight("<h2>Sub</h2>\n<h1>Main <em>page</em></h1>\n<h1>Second</h1>\n")
            .unwrap();
        assert_eq!(out.title.as_deref(), Some("Main page"));
    }

    #[test]
    fn highlighting_is_deterministic() {
        let input = "<pre><code class=\"language-rust\">struct S;\n</code></pre>";
        let h = highlighter();
        assert_eq!(h.highlight(input).unwrap(), h.highlight(input).unwrap());
    }

    #[test]
    fn stylesheet_uses_class_prefix() {
        let css = highlighter().stylesheet().unwrap();
        assert!(css.contains(".hl-"), "got: {css}");
    }

    #[test]
    fn unknown_theme_rejected() {
        let err = Highlighter::new("NoSuchTheme", UnknownLanguage::PassThrough)
            .err()
            .expect("unknown theme must fail");
        match err {
            GensiteError::UnknownTheme { name, available } => {
                assert_eq!(name, "NoSuchTheme");
                assert!(available.contains("InspiredGitHub"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn available_themes_include_default() {
        let themes = available_themes();
        assert!(themes.iter().any(|t| t == crate::config::DEFAULT_THEME));
    }
}
