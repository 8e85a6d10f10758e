//! Object URLs for inline module scripts.
//!
//! [§ 4.1 blob URLs](https://w3c.github.io/FileAPI/#url-model)
//!
//! A module script needs a `src`; inline module text is published under a
//! generated `blob:` URL and revoked when its application unmounts.

use std::collections::HashMap;

use uuid::Uuid;

/// Scheme and origin prefix of every URL this store creates.
pub const OBJECT_URL_PREFIX: &str = "blob:micro-app/";

/// Table of live object URLs and their contents.
#[derive(Debug, Clone, Default)]
pub struct ObjectUrls {
    entries: HashMap<String, String>,
}

impl ObjectUrls {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// [createObjectURL](https://w3c.github.io/FileAPI/#dfn-createObjectURL)
    pub fn create(&mut self, contents: &str) -> String {
        let url = format!("{OBJECT_URL_PREFIX}{}", Uuid::new_v4());
        let _ = self.entries.insert(url.clone(), contents.to_string());
        url
    }

    /// Contents behind a live URL.
    #[must_use]
    pub fn resolve(&self, url: &str) -> Option<&str> {
        self.entries.get(url).map(String::as_str)
    }

    /// [revokeObjectURL](https://w3c.github.io/FileAPI/#dfn-revokeObjectURL)
    ///
    /// Returns whether the URL was live.
    pub fn revoke(&mut self, url: &str) -> bool {
        self.entries.remove(url).is_some()
    }

    /// Number of live URLs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no URL is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_resolve_revoke() {
        let mut urls = ObjectUrls::new();
        let url = urls.create("export {}");
        assert!(url.starts_with(OBJECT_URL_PREFIX));
        assert_eq!(urls.resolve(&url), Some("export {}"));
        assert!(urls.revoke(&url));
        assert!(!urls.revoke(&url));
        assert!(urls.is_empty());
    }
}
