// ABOUTME: Preprocessing of raw document text before tag scanning.
// ABOUTME: Strips comments and script blocks and decides whether the text looks like HTML.

//! Text preprocessing.
//!
//! The tag scanner works on plain text, so anything that can contain tag-like
//! text without being markup has to go first: comment spans, then script
//! blocks. Inputs without an `<html` or `/html>` marker are rejected outright.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

static COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static SCRIPT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script.*?</script\s*>").unwrap());
static HTML_MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<html|/html>").unwrap());

/// Removes every `<!-- ... -->` span, joining the surrounding text.
pub fn strip_comments(text: &str) -> Cow<'_, str> {
    COMMENT_RE.replace_all(text, "")
}

/// Removes every `<script ...> ... </script>` block, joining the surrounding text.
pub fn strip_scripts(text: &str) -> Cow<'_, str> {
    SCRIPT_RE.replace_all(text, "")
}

/// Returns true if the text carries an `<html` or `/html>` marker.
pub fn looks_like_html(text: &str) -> bool {
    HTML_MARKER_RE.is_match(text)
}

/// Strips comments and, if `scripts` is set, script blocks.
pub fn strip(raw: &str, scripts: bool) -> String {
    let commentless = strip_comments(raw);
    if scripts {
        strip_scripts(&commentless).into_owned()
    } else {
        commentless.into_owned()
    }
}

/// Produces the cleaned text for a document, or `None` if it is not HTML.
///
/// Comments are always stripped before scripts.
pub fn clean(raw: &str, scripts: bool) -> Option<String> {
    let cleaned = strip(raw, scripts);
    if looks_like_html(&cleaned) {
        Some(cleaned)
    } else {
        tracing::debug!(len = raw.len(), "no html marker found, document treated as non-html");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_comments_multiline() {
        assert_eq!(strip_comments("a<!-- x\n<p>y</p> -->b<!--c-->d"), "abd");
    }

    #[test]
    fn test_strip_comments_non_greedy() {
        assert_eq!(
            strip_comments("<!--1-->keep<!--2-->"),
            "keep"
        );
    }

    #[test]
    fn test_strip_scripts_case_insensitive() {
        let text = "<p>a</p><SCRIPT type=\"x\">var s = '<p>b</p>';\n</Script ><p>c</p>";
        assert_eq!(strip_scripts(text), "<p>a</p><p>c</p>");
    }

    #[test]
    fn test_looks_like_html() {
        assert!(looks_like_html("<HTML lang=en>"));
        assert!(looks_like_html("fragment</html>"));
        assert!(!looks_like_html("<body><p>no marker</p></body>"));
    }

    #[test]
    fn test_clean_rejects_marker_inside_comment() {
        assert_eq!(clean("<!-- <html> --><p>x</p>", true), None);
    }

    #[test]
    fn test_clean_keeps_scripts_when_disabled() {
        let cleaned = clean("<html><script>1</script></html>", false).unwrap();
        assert_eq!(cleaned, "<html><script>1</script></html>");
    }

    #[test]
    fn test_clean_never_grows() {
        let raw = "<html><!-- c --><script>s</script><p>t</p></html>";
        let cleaned = clean(raw, true).unwrap();
        assert_eq!(cleaned, "<html><p>t</p></html>");
        assert!(cleaned.len() <= raw.len());
    }
}
