//! Error types for the micro application loader.

use micro_common::FetchError;
use micro_dom::NodeId;
use thiserror::Error;

use crate::executor::ExecutionError;
use crate::gate::LoadSignal;

/// Failures of the load pipeline and of the registry.
///
/// Load failures are never returned to whoever started the load; they are
/// logged and recorded on the application (see [`crate::App::failure`]).
#[derive(Debug, Clone, Error)]
pub enum MicroAppError {
    /// The application's HTML document could not be fetched.
    #[error("failed to fetch HTML of {app} from {url}: {source}")]
    HtmlFetchFailed {
        /// Application name.
        app: String,
        /// URL of the HTML document.
        url: String,
        /// Underlying fetch error.
        #[source]
        source: FetchError,
    },

    /// A member of a resource group could not be fetched; the whole group
    /// was abandoned.
    #[error("{group} group of {app} failed on {url}: {source}")]
    ResourceFetchFailed {
        /// Application name.
        app: String,
        /// Which group failed.
        group: LoadSignal,
        /// URL of the failing resource.
        url: String,
        /// Underlying fetch error.
        #[source]
        source: FetchError,
    },

    /// A live application already uses this name.
    #[error("an application named {0} is already registered")]
    DuplicateName(String),

    /// A live application already renders into this container.
    #[error("container {container:?} is already used by application {owner}")]
    ContainerInUse {
        /// The contested container.
        container: NodeId,
        /// Name of the application that owns it.
        owner: String,
    },

    /// The application's container is not part of the host document, so
    /// there is nowhere to render it.
    #[error("container {container:?} of {app} is not in the host document")]
    ContainerMissing {
        /// Application name.
        app: String,
        /// The missing container.
        container: NodeId,
    },

    /// A script threw or failed to parse while mounting.
    #[error("script {key} of {app} failed: {source}")]
    Execution {
        /// Application name.
        app: String,
        /// Source record key of the script.
        key: String,
        /// Underlying execution error.
        #[source]
        source: ExecutionError,
    },
}

/// Errors reading or validating a [`crate::MicroAppConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path of the file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration is not valid JSON for this schema.
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A container tag name cannot be used.
    #[error("invalid container tag name {0:?}")]
    InvalidTag(String),
}
