//! Markdown → HTML fragment via pulldown-cmark.
//!
//! Fenced code blocks with an info string render as
//! `<pre><code class="language-X">`, which is what the highlighter selects.

use pulldown_cmark::{html, Options, Parser};

/// Extensions on top of CommonMark.
fn options(smart_punctuation: bool) -> Options {
    let mut opts = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES;
    if smart_punctuation {
        opts |= Options::ENABLE_SMART_PUNCTUATION;
    }
    opts
}

/// Render raw Markdown bytes to an HTML fragment.
///
/// Total over any input: invalid UTF-8 is replaced with U+FFFD.
pub fn render_markdown(source: &[u8], smart_punctuation: bool) -> String {
    let text = String::from_utf8_lossy(source);
    let parser = Parser::new_ext(&text, options(smart_punctuation));
    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
