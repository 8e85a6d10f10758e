//! Loading remote HTML micro applications into a host document.
//!
//! A micro application is an HTML page served from its own base URL. The
//! [`Host`] fetches it, renames its `<head>`/`<body>` to custom containers,
//! parses it, and pulls every stylesheet and script out into
//! [`SourceRecord`]s. Stylesheets are fetched and injected as `<style>`
//! elements; script text is fetched and held. Once the document is parsed
//! and both groups are complete, the prepared tree is copied into the
//! application's container and its scripts run in document order.
//!
//! # Example
//!
//! ```no_run
//! use micro_app::{Host, MicroAppConfig};
//! use micro_dom::{AttributesMap, DomTree, NodeId};
//! use micro_js::JsRuntime;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = MicroAppConfig::default();
//! let mut document = DomTree::new();
//! let container = document.create_element("micro-app", AttributesMap::new());
//! document.append_child(NodeId::ROOT, container);
//!
//! let host = Host::new(document, config.http_fetcher()?, JsRuntime::new(), config)?;
//! let app = host.launch("shop", "http://localhost:3000/", container).await?;
//! println!("{}", app.borrow().status());
//! # Ok(())
//! # }
//! ```
//!
//! # Lifecycle
//!
//! `created → loading → mounted → unmounted`, with `failed` reached from
//! `loading` when a fetch fails. See [`AppStatus`].

pub mod app;
pub mod config;
pub mod error;
pub mod executor;
pub mod extract;
pub mod gate;
pub mod host;
mod loader;
mod mount;
pub mod object_url;
pub mod registry;
pub mod source;
pub mod transform;

pub use app::{App, AppHandle, AppStatus};
pub use config::MicroAppConfig;
pub use error::{ConfigError, MicroAppError};
pub use executor::{CodeExecutor, ExecutionError, Scope};
pub use extract::{ExtractionSummary, extract_sources};
pub use gate::{GateOutcome, LoadSignal, MountGate};
pub use host::{CONTAINER_TAG, Host};
pub use object_url::ObjectUrls;
pub use registry::AppRegistry;
pub use source::{SourceKind, SourceMap, SourceRecord};
pub use transform::HtmlTransformer;
