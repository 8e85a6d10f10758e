//! Loader configuration.

use std::fs;
use std::path::Path;
use std::time::Duration;

use micro_common::net::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
use micro_common::{FetchError, HttpFetcher};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Settings shared by every application a [`crate::Host`] loads.
///
/// Every field has a default, so a JSON file only needs the keys it changes:
///
/// ```
/// use micro_app::MicroAppConfig;
///
/// let config = MicroAppConfig::from_json(r#"{ "fetch_timeout_secs": 5 }"#).unwrap();
/// assert_eq!(config.head_tag, "micro-app-head");
/// assert_eq!(config.fetch_timeout_secs, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MicroAppConfig {
    /// Tag the sub-application's `<head>` is renamed to.
    pub head_tag: String,
    /// Tag the sub-application's `<body>` is renamed to.
    pub body_tag: String,
    /// User-Agent sent with every fetch.
    pub user_agent: String,
    /// Per-request timeout in seconds.
    pub fetch_timeout_secs: u64,
}

impl Default for MicroAppConfig {
    fn default() -> Self {
        Self {
            head_tag: "micro-app-head".to_string(),
            body_tag: "micro-app-body".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            fetch_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl MicroAppConfig {
    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::InvalidTag`] for an unusable container tag name.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// errors of [`MicroAppConfig::from_json`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Check that both container tags are usable element names.
    ///
    /// A valid tag is lowercase ASCII letters, digits and `-`, starts with a
    /// letter and contains a `-`, as a
    /// [custom element name](https://html.spec.whatwg.org/multipage/custom-elements.html#valid-custom-element-name)
    /// does. Standard elements such as `div` never contain one, so the
    /// containers cannot collide with markup the application ships itself.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTag`] naming the first bad tag.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for tag in [&self.head_tag, &self.body_tag] {
            let well_formed = tag.chars().next().is_some_and(|c| c.is_ascii_lowercase())
                && tag
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
                && tag.contains('-');
            if !well_formed {
                return Err(ConfigError::InvalidTag(tag.clone()));
            }
        }
        if self.head_tag == self.body_tag {
            return Err(ConfigError::InvalidTag(self.body_tag.clone()));
        }
        Ok(())
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Build the HTTP fetcher these settings describe.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the HTTP client cannot be created.
    pub fn http_fetcher(&self) -> Result<HttpFetcher, FetchError> {
        HttpFetcher::new(&self.user_agent, self.fetch_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(MicroAppConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_standard_or_malformed_tags() {
        for bad in [
            r#"{ "head_tag": "head" }"#,
            r#"{ "head_tag": "div" }"#,
            r#"{ "body_tag": "-body" }"#,
            r#"{ "body_tag": "My Body" }"#,
            r#"{ "head_tag": "" }"#,
            r#"{ "head_tag": "x-app", "body_tag": "x-app" }"#,
        ] {
            assert!(
                matches!(MicroAppConfig::from_json(bad), Err(ConfigError::InvalidTag(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            MicroAppConfig::from_json("{ head_tag: }"),
            Err(ConfigError::Parse(_))
        ));
    }
}
