//! Source records: the stylesheets and scripts an application depends on.

use std::collections::HashMap;

use serde::Serialize;
use strum_macros::Display;
use uuid::Uuid;

/// What a [`SourceRecord`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// A stylesheet from `<link rel="stylesheet">`.
    Style,
    /// A classic script.
    Script,
    /// A `type="module"` script.
    Module,
}

impl SourceKind {
    /// Classify a `<script>` by its `type` attribute.
    ///
    /// [§ 4.12.1 The script element](https://html.spec.whatwg.org/multipage/scripting.html#attr-script-type)
    ///
    /// Only an exact (ASCII case-insensitive) `module` makes a module script.
    #[must_use]
    pub fn for_script_type(type_attr: Option<&str>) -> Self {
        match type_attr {
            Some(t) if t.trim().eq_ignore_ascii_case("module") => Self::Module,
            _ => Self::Script,
        }
    }

    /// Whether this is a classic or module script.
    #[must_use]
    pub const fn is_script(self) -> bool {
        matches!(self, Self::Script | Self::Module)
    }
}

/// One resource of an application, keyed by absolute URL (external) or a
/// generated token (inline).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRecord {
    key: String,
    kind: SourceKind,
    is_external: bool,
    code: Option<String>,
}

impl SourceRecord {
    /// A resource that still has to be fetched from `url`.
    #[must_use]
    pub fn external(url: String, kind: SourceKind) -> Self {
        Self {
            key: url,
            kind,
            is_external: true,
            code: None,
        }
    }

    /// A resource whose text was embedded in the document.
    #[must_use]
    pub fn inline(key: String, kind: SourceKind, code: String) -> Self {
        Self {
            key,
            kind,
            is_external: false,
            code: Some(code),
        }
    }

    /// Absolute URL or inline token.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Kind of resource.
    #[must_use]
    pub const fn kind(&self) -> SourceKind {
        self.kind
    }

    /// Whether the resource is fetched from its key.
    #[must_use]
    pub const fn is_external(&self) -> bool {
        self.is_external
    }

    /// The resource text, once known.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Whether the text is known.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.code.is_some()
    }

    /// Store fetched text. Text is set at most once; returns `false` and
    /// keeps the existing text if the record was already resolved.
    pub fn resolve(&mut self, code: String) -> bool {
        if self.code.is_some() {
            return false;
        }
        self.code = Some(code);
        true
    }
}

/// Ordered collection of [`SourceRecord`]s with unique keys.
///
/// Iteration follows insertion order, which is document order for the
/// records the extractor creates.
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    records: Vec<SourceRecord>,
    index: HashMap<String, usize>,
}

impl SourceMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record. A record whose key is already present is dropped
    /// and `false` is returned; the first record keeps its position.
    pub fn insert(&mut self, record: SourceRecord) -> bool {
        if self.index.contains_key(&record.key) {
            return false;
        }
        let _ = self.index.insert(record.key.clone(), self.records.len());
        self.records.push(record);
        true
    }

    /// Look up a record by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&SourceRecord> {
        self.index.get(key).map(|&i| &self.records[i])
    }

    /// Look up a record by key for resolution.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut SourceRecord> {
        self.index.get(key).map(|&i| &mut self.records[i])
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// All records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &SourceRecord> {
        self.records.iter()
    }

    /// Stylesheet records in insertion order.
    pub fn styles(&self) -> impl Iterator<Item = &SourceRecord> {
        self.records.iter().filter(|r| r.kind == SourceKind::Style)
    }

    /// Classic and module script records in insertion order.
    pub fn scripts(&self) -> impl Iterator<Item = &SourceRecord> {
        self.records.iter().filter(|r| r.kind.is_script())
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop every record.
    pub fn clear(&mut self) {
        self.records.clear();
        self.index.clear();
    }

    /// A fresh key for an inline resource, distinct from every key present.
    ///
    /// Keys are random v4 UUIDs, so they can never be mistaken for URLs.
    #[must_use]
    pub fn inline_key(&self) -> String {
        loop {
            let key = format!("inline-{}", Uuid::new_v4().simple());
            if !self.contains_key(&key) {
                return key;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_key_keeps_first_record() {
        let mut map = SourceMap::new();
        assert!(map.insert(SourceRecord::external(
            "http://x/a.js".to_string(),
            SourceKind::Script
        )));
        assert!(map.insert(SourceRecord::external(
            "http://x/b.css".to_string(),
            SourceKind::Style
        )));
        assert!(!map.insert(SourceRecord::external(
            "http://x/a.js".to_string(),
            SourceKind::Module
        )));

        let keys: Vec<&str> = map.iter().map(SourceRecord::key).collect();
        assert_eq!(keys, ["http://x/a.js", "http://x/b.css"]);
        assert_eq!(
            map.get("http://x/a.js").map(SourceRecord::kind),
            Some(SourceKind::Script)
        );
    }

    #[test]
    fn code_is_set_once() {
        let mut record = SourceRecord::external("http://x/a.css".to_string(), SourceKind::Style);
        assert!(!record.is_resolved());
        assert!(record.resolve("a{}".to_string()));
        assert!(!record.resolve("b{}".to_string()));
        assert_eq!(record.code(), Some("a{}"));
    }

    #[test]
    fn groups_preserve_order() {
        let mut map = SourceMap::new();
        let inline = map.inline_key();
        let _ = map.insert(SourceRecord::inline(inline.clone(), SourceKind::Script, "1".into()));
        let _ = map.insert(SourceRecord::external("http://x/s.css".into(), SourceKind::Style));
        let _ = map.insert(SourceRecord::external("http://x/m.js".into(), SourceKind::Module));

        let scripts: Vec<&str> = map.scripts().map(SourceRecord::key).collect();
        assert_eq!(scripts, [inline.as_str(), "http://x/m.js"]);
        assert_eq!(map.styles().count(), 1);
    }

    #[test]
    fn script_type_classification() {
        assert_eq!(SourceKind::for_script_type(Some("module")), SourceKind::Module);
        assert_eq!(SourceKind::for_script_type(Some(" Module ")), SourceKind::Module);
        assert_eq!(SourceKind::for_script_type(Some("text/javascript")), SourceKind::Script);
        assert_eq!(SourceKind::for_script_type(None), SourceKind::Script);
    }

    #[test]
    fn inline_keys_are_not_urls() {
        let map = SourceMap::new();
        let key = map.inline_key();
        assert!(!micro_common::is_absolute_http(&key));
        assert_ne!(key, map.inline_key());
    }
}
