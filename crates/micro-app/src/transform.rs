//! Renaming a sub-application's `<head>` and `<body>`.
//!
//! Fragment parsing drops `head` and `body` start tags. Renaming them to
//! custom tags first keeps both as real elements the loader can find again.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::config::MicroAppConfig;

static HEAD: LazyLock<Regex> = LazyLock::new(|| element_pattern("head"));
static BODY: LazyLock<Regex> = LazyLock::new(|| element_pattern("body"));

/// Rewrites the first `<head>…</head>` and `<body>…</body>` of a document.
#[derive(Debug, Clone)]
pub struct HtmlTransformer {
    head_tag: String,
    body_tag: String,
}

impl HtmlTransformer {
    /// Build a transformer renaming to the configured container tags.
    #[must_use]
    pub fn new(config: &MicroAppConfig) -> Self {
        Self {
            head_tag: config.head_tag.clone(),
            body_tag: config.body_tag.clone(),
        }
    }

    /// Rename the first head element, then the first body element.
    ///
    /// Matching is case-insensitive and spans newlines; attributes and
    /// content are kept byte for byte. Input without a match is returned
    /// unchanged.
    ///
    /// ```
    /// use micro_app::{HtmlTransformer, MicroAppConfig};
    ///
    /// let t = HtmlTransformer::new(&MicroAppConfig::default());
    /// assert_eq!(
    ///     t.transform("<head><title>x</title></head><body id=a>hi</body>"),
    ///     "<micro-app-head><title>x</title></micro-app-head><micro-app-body id=a>hi</micro-app-body>"
    /// );
    /// ```
    #[must_use]
    pub fn transform(&self, html: &str) -> String {
        let html = rename(&HEAD, html, "head", &self.head_tag);
        rename(&BODY, &html, "body", &self.body_tag).into_owned()
    }

    /// Undo [`HtmlTransformer::transform`], renaming the containers back.
    #[must_use]
    pub fn restore(&self, html: &str) -> String {
        html.replacen(&format!("<{}", self.head_tag), "<head", 1)
            .replacen(&format!("</{}", self.head_tag), "</head", 1)
            .replacen(&format!("<{}", self.body_tag), "<body", 1)
            .replacen(&format!("</{}", self.body_tag), "</body", 1)
    }
}

/// `<tag ...>` up to the nearest `</tag>`.
///
/// The name must be followed by whitespace, `/` or `>`, so `<header>` is
/// not mistaken for `<head>`.
fn element_pattern(tag: &str) -> Regex {
    Regex::new(&format!(r"(?is)<{tag}(?:[\s/][^>]*)?>.*?</{tag}\s*>"))
        .expect("container pattern is a valid regex")
}

fn rename<'a>(pattern: &Regex, html: &'a str, from: &str, to: &str) -> Cow<'a, str> {
    pattern.replace(html, |caps: &Captures<'_>| {
        let whole = &caps[0];
        // The match is "<from", the rest of the start tag and content, then
        // "</from" followed by optional whitespace and ">".
        let close = whole.rfind("</").unwrap_or(whole.len());
        let inner = &whole[1 + from.len()..close];
        let tail = whole.get(close + 2 + from.len()..).unwrap_or(">");
        format!("<{to}{inner}</{to}{tail}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transformer() -> HtmlTransformer {
        HtmlTransformer::new(&MicroAppConfig::default())
    }

    #[test]
    fn renames_case_insensitively_across_lines() {
        let out = transformer().transform("<HTML><HEAD lang=en>\n<title>t</title>\n</HEAD><BODY>\nx</BODY></HTML>");
        assert_eq!(
            out,
            "<HTML><micro-app-head lang=en>\n<title>t</title>\n</micro-app-head><micro-app-body>\nx</micro-app-body></HTML>"
        );
    }

    #[test]
    fn header_is_not_a_head() {
        let html = "<header>nav</header><body>b</body>";
        assert_eq!(
            transformer().transform(html),
            "<header>nav</header><micro-app-body>b</micro-app-body>"
        );
    }

    #[test]
    fn only_first_occurrence_is_renamed() {
        let out = transformer().transform("<body>1</body><body>2</body>");
        assert_eq!(out, "<micro-app-body>1</micro-app-body><body>2</body>");
    }

    #[test]
    fn no_match_is_unchanged() {
        let html = "<div>plain</div>";
        assert_eq!(transformer().transform(html), html);
    }

    #[test]
    fn restore_reverses_the_rename() {
        let t = transformer();
        let html = "<html><head><title>x</title></head><body class=\"a\">hi</body></html>";
        let transformed = t.transform(html);
        assert!(!transformed.contains("<head>"));
        assert_eq!(t.restore(&transformed), html);
    }

    #[test]
    fn whitespace_inside_closing_tags_is_kept() {
        let t = transformer();
        let html = "<head>x</head ><body>y</body\n>";
        let transformed = t.transform(html);
        assert_eq!(
            transformed,
            "<micro-app-head>x</micro-app-head ><micro-app-body>y</micro-app-body\n>"
        );
        assert_eq!(t.restore(&transformed), html);
    }
}
