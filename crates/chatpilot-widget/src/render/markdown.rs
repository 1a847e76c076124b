//! Minimal markdown for assistant replies.
//!
//! Supports `**bold**`, `*emphasis*`, `` `code` `` and line breaks, applied
//! in that order with non-greedy matches. Input is HTML-escaped first, so
//! the only tags in the output are the ones produced here.

use std::sync::LazyLock;

use regex::Regex;

static BOLD: LazyLock<Regex> = LazyLock::new(|| compile(r"\*\*(.*?)\*\*"));
static EMPHASIS: LazyLock<Regex> = LazyLock::new(|| compile(r"\*(.*?)\*"));
static CODE: LazyLock<Regex> = LazyLock::new(|| compile(r"`(.*?)`"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid markdown pattern {pattern}: {e}"))
}

/// Escapes the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Converts the supported markdown subset to HTML.
pub fn to_html(text: &str) -> String {
    let html = escape_html(text);
    let html = BOLD.replace_all(&html, "<strong>$1</strong>");
    let html = EMPHASIS.replace_all(&html, "<em>$1</em>");
    let html = CODE.replace_all(&html, "<code>$1</code>");
    html.replace('\n', "<br>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_formatting() {
        assert_eq!(
            to_html("**Open** daily, *except* `Mon`"),
            "<strong>Open</strong> daily, <em>except</em> <code>Mon</code>"
        );
    }

    #[test]
    fn newlines_become_breaks() {
        assert_eq!(to_html("a\nb"), "a<br>b");
    }

    #[test]
    fn markup_is_escaped() {
        assert_eq!(
            to_html("<script>**x**</script>"),
            "&lt;script&gt;<strong>x</strong>&lt;/script&gt;"
        );
    }

    #[test]
    fn unmatched_markers_are_kept() {
        assert_eq!(to_html("2 * 3"), "2 * 3");
    }
}
