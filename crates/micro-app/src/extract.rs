//! Source extraction: pulling `<link>` and `<script>` out of a parsed tree.
//!
//! The tree is walked children-first. Every stylesheet link and every
//! script becomes a [`SourceRecord`]; the element itself is taken out of
//! the tree so the browser-equivalent never loads it a second time.

use micro_common::normalize_url;
use micro_common::warning::warn_once;
use micro_dom::{DomTree, NodeId};
use tracing::{debug, trace};

use crate::source::{SourceKind, SourceMap, SourceRecord};

/// What one extraction pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    /// Stylesheet records added.
    pub styles: usize,
    /// Script records added.
    pub scripts: usize,
    /// Elements removed without producing a record (empty references,
    /// non-stylesheet links, duplicates).
    pub skipped: usize,
}

/// Collect every stylesheet and script below `root` into `sources`.
///
/// External references are resolved against `base_url` with
/// [`normalize_url`]. Links are removed from the tree; scripts are
/// replaced by a comment marker so their position stays visible when the
/// tree is printed.
///
/// ```
/// use micro_app::{extract_sources, SourceMap};
/// use micro_html::parse_fragment;
///
/// let (mut tree, _) = parse_fragment(r#"<div><script src="/a.js"></script></div>"#);
/// let mut sources = SourceMap::new();
/// let root = tree.root();
/// let summary = extract_sources(&mut tree, root, "http://x/app/", &mut sources);
/// assert_eq!(summary.scripts, 1);
/// assert!(sources.contains_key("http://x/app/a.js"));
/// ```
pub fn extract_sources(
    tree: &mut DomTree,
    root: NodeId,
    base_url: &str,
    sources: &mut SourceMap,
) -> ExtractionSummary {
    let mut extractor = Extractor {
        base_url,
        sources,
        summary: ExtractionSummary::default(),
    };
    extractor.walk(tree, root);
    extractor.summary
}

struct Extractor<'a> {
    base_url: &'a str,
    sources: &'a mut SourceMap,
    summary: ExtractionSummary,
}

impl Extractor<'_> {
    /// Post-order walk: a parent's links and scripts are taken only after
    /// every subtree below it. Frames hold a snapshot of the children, since
    /// taking a child mutates the parent's child list.
    fn walk(&mut self, tree: &mut DomTree, root: NodeId) {
        let mut stack: Vec<(NodeId, Vec<NodeId>, usize)> =
            vec![(root, tree.children(root).to_vec(), 0)];
        while let Some((parent, children, next)) = stack.last_mut() {
            if let Some(&child) = children.get(*next) {
                *next += 1;
                let grandchildren = tree.children(child).to_vec();
                stack.push((child, grandchildren, 0));
                continue;
            }
            let parent = *parent;
            let children = std::mem::take(children);
            let _ = stack.pop();
            self.take_children(tree, parent, children);
        }
    }

    fn take_children(&mut self, tree: &mut DomTree, parent: NodeId, children: Vec<NodeId>) {
        for child in children {
            let Some(element) = tree.as_element(child) else {
                continue;
            };
            if element.is("link") {
                self.take_link(tree, parent, child);
            } else if element.is("script") {
                self.take_script(tree, parent, child);
            } else if element.is("style") {
                let _ = warn_once(
                    "micro-app",
                    "inline <style> elements are left in place and are not scoped",
                );
            }
        }
    }

    /// [§ 4.2.4 The link element](https://html.spec.whatwg.org/multipage/semantics.html#the-link-element)
    fn take_link(&mut self, tree: &mut DomTree, parent: NodeId, link: NodeId) {
        let Some(element) = tree.as_element(link) else {
            return;
        };
        let href = element
            .get_attribute("href")
            .map(str::trim)
            .filter(|h| !h.is_empty());
        let is_stylesheet = ["rel", "ref"]
            .into_iter()
            .filter_map(|attr| element.get_attribute(attr))
            .any(|value| {
                value
                    .split_ascii_whitespace()
                    .any(|token| token.eq_ignore_ascii_case("stylesheet"))
            });

        match href {
            Some(href) if is_stylesheet => {
                let url = normalize_url(href, self.base_url);
                self.add(SourceRecord::external(url, SourceKind::Style));
            }
            _ => {
                trace!(?link, "dropping link that is not a stylesheet reference");
                self.summary.skipped += 1;
            }
        }
        tree.remove_child(parent, link);
    }

    /// [§ 4.12.1 The script element](https://html.spec.whatwg.org/multipage/scripting.html#the-script-element)
    fn take_script(&mut self, tree: &mut DomTree, parent: NodeId, script: NodeId) {
        let Some(element) = tree.as_element(script) else {
            return;
        };
        let kind = SourceKind::for_script_type(element.get_attribute("type"));
        let src = element
            .get_attribute("src")
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| normalize_url(s, self.base_url));

        let marker = if let Some(url) = src {
            let marker = format!("{kind} {url} extracted by micro-app");
            self.add(SourceRecord::external(url, kind));
            marker
        } else {
            let code = tree.text_content(script);
            if code.is_empty() {
                debug!(?script, "dropping empty script");
                self.summary.skipped += 1;
                "empty script removed by micro-app".to_string()
            } else {
                let key = self.sources.inline_key();
                let marker = format!("inline {kind} {key} extracted by micro-app");
                self.add(SourceRecord::inline(key, kind, code));
                marker
            }
        };

        let comment = tree.create_comment(&marker);
        tree.replace_child(parent, comment, script);
    }

    fn add(&mut self, record: SourceRecord) {
        let kind = record.kind();
        let key = record.key().to_string();
        if self.sources.insert(record) {
            if kind.is_script() {
                self.summary.scripts += 1;
            } else {
                self.summary.styles += 1;
            }
        } else {
            debug!(%key, "duplicate source reference, keeping the first");
            self.summary.skipped += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use micro_html::parse_fragment;

    use super::*;

    const BASE: &str = "http://x/app/";

    fn extract(html: &str) -> (DomTree, SourceMap, ExtractionSummary) {
        let (mut tree, _) = parse_fragment(html);
        let mut sources = SourceMap::new();
        let root = tree.root();
        let summary = extract_sources(&mut tree, root, BASE, &mut sources);
        (tree, sources, summary)
    }

    #[test]
    fn accepts_rel_and_legacy_ref_stylesheets() {
        let (_, sources, summary) = extract(
            r#"<link rel="stylesheet" href="/a.css"><link ref="Stylesheet" href="b.css"><link rel="icon" href="/i.png">"#,
        );
        let keys: Vec<&str> = sources.iter().map(SourceRecord::key).collect();
        assert_eq!(keys, ["http://x/app/a.css", "http://x/app/b.css"]);
        assert_eq!(summary.styles, 2);
        assert_eq!(summary.skipped, 1);
    }

    #[test]
    fn link_without_href_is_skipped() {
        let (tree, sources, _) = extract(r#"<link rel="stylesheet" href="  ">"#);
        assert!(sources.is_empty());
        assert!(tree.elements_by_tag_name(tree.root(), "link").is_empty());
    }

    #[test]
    fn scripts_are_replaced_by_markers() {
        let (tree, sources, _) =
            extract(r#"<div><script>let a = 1;</script><script type="module" src="https://cdn/m.js"></script></div>"#);
        assert!(tree.elements_by_tag_name(tree.root(), "script").is_empty());
        let div = tree.first_element_by_tag_name(tree.root(), "div").unwrap();
        assert_eq!(tree.children(div).len(), 2);

        let records: Vec<&SourceRecord> = sources.scripts().collect();
        assert!(!records[0].is_external());
        assert_eq!(records[0].code(), Some("let a = 1;"));
        assert_eq!(records[1].key(), "https://cdn/m.js");
        assert_eq!(records[1].kind(), SourceKind::Module);
        assert!(!records[1].is_resolved());
    }

    #[test]
    fn empty_inline_script_is_skipped() {
        let (_, sources, summary) = extract("<script></script>");
        assert!(sources.is_empty());
        assert_eq!(summary.skipped, 1);
    }

    #[test]
    fn nested_sources_come_before_later_siblings() {
        let (_, sources, _) =
            extract(r#"<div><script src="inner.js"></script></div><script src="outer.js"></script>"#);
        let keys: Vec<&str> = sources.iter().map(SourceRecord::key).collect();
        assert_eq!(keys, ["http://x/app/inner.js", "http://x/app/outer.js"]);
    }

    #[test]
    fn duplicate_external_script_keeps_first() {
        let (_, sources, summary) =
            extract(r#"<script src="a.js"></script><script type="module" src="/a.js"></script>"#);
        assert_eq!(sources.len(), 1);
        assert_eq!(
            sources.get("http://x/app/a.js").map(SourceRecord::kind),
            Some(SourceKind::Script)
        );
        assert_eq!(summary.skipped, 1);
    }

    #[test]
    fn deeply_nested_scripts_are_extracted() {
        const DEPTH: usize = 100_000;
        let html = format!(
            "{}<script src=\"deep.js\"></script>{}<script src=\"top.js\"></script>",
            "<div>".repeat(DEPTH),
            "</div>".repeat(DEPTH)
        );
        let (tree, sources, summary) = extract(&html);
        let keys: Vec<&str> = sources.iter().map(SourceRecord::key).collect();
        assert_eq!(keys, ["http://x/app/deep.js", "http://x/app/top.js"]);
        assert_eq!(summary.scripts, 2);
        assert!(tree.elements_by_tag_name(tree.root(), "script").is_empty());
    }
}
