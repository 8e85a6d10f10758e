//! Application instances and their lifecycle state.

use std::cell::RefCell;
use std::rc::Rc;

use micro_dom::{DomTree, NodeId};
use serde::Serialize;
use strum_macros::Display;
use tracing::{debug, error, info};

use crate::error::MicroAppError;
use crate::gate::{GateOutcome, LoadSignal, MountGate};
use crate::source::SourceMap;

/// Shared handle to an application.
///
/// The loader runs on one thread; every borrow is released before an
/// `.await`, so concurrent fetch completions never observe a borrow.
pub type AppHandle = Rc<RefCell<App>>;

/// Lifecycle position of an [`App`].
///
/// ```text
/// created -> loading -> mounted -> unmounted
///               |                     ^
///               +-> failed            |
///               +---------------------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AppStatus {
    /// Registered, no load started.
    Created,
    /// Fetching and preparing resources.
    Loading,
    /// Rendered into its container.
    Mounted,
    /// Torn down; late load results are discarded.
    Unmounted,
    /// A fetch failed; the application will not mount.
    Failed,
}

impl AppStatus {
    /// Whether no further load signal can change this application.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Unmounted | Self::Failed)
    }
}

/// One remote micro application.
#[derive(Debug)]
pub struct App {
    name: String,
    url: String,
    container: NodeId,
    pub(crate) status: AppStatus,
    pub(crate) gate: MountGate,
    pub(crate) source: SourceMap,
    /// Parsed and extracted document, in its own arena, rooted at a
    /// `DocumentFragment`.
    pub(crate) prepared: Option<DomTree>,
    /// Object URLs created for this application's inline modules.
    pub(crate) object_urls: Vec<String>,
    pub(crate) failure: Option<MicroAppError>,
    pub(crate) script_errors: Vec<MicroAppError>,
    pub(crate) mount_count: usize,
}

impl App {
    /// A new application rendering into `container` of the host document.
    #[must_use]
    pub fn new(name: &str, url: &str, container: NodeId) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            container,
            status: AppStatus::Created,
            gate: MountGate::new(),
            source: SourceMap::new(),
            prepared: None,
            object_urls: Vec::new(),
            failure: None,
            script_errors: Vec::new(),
            mount_count: 0,
        }
    }

    /// Wrap in a shared handle.
    #[must_use]
    pub fn into_handle(self) -> AppHandle {
        Rc::new(RefCell::new(self))
    }

    /// Unique application name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base URL; the HTML document is fetched from here and relative
    /// resources resolve against it.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Host element the application renders into.
    #[must_use]
    pub const fn container(&self) -> NodeId {
        self.container
    }

    /// Current lifecycle status.
    #[must_use]
    pub const fn status(&self) -> AppStatus {
        self.status
    }

    /// Number of distinct load signals received.
    #[must_use]
    pub fn load_count(&self) -> usize {
        self.gate.load_count()
    }

    /// Load signals still outstanding.
    #[must_use]
    pub fn missing_signals(&self) -> Vec<LoadSignal> {
        self.gate.missing()
    }

    /// The application's source records.
    #[must_use]
    pub const fn source(&self) -> &SourceMap {
        &self.source
    }

    /// The extracted document waiting to be (re)rendered.
    #[must_use]
    pub const fn prepared_dom(&self) -> Option<&DomTree> {
        self.prepared.as_ref()
    }

    /// Object URLs currently owned by this application.
    #[must_use]
    pub fn object_urls(&self) -> &[String] {
        &self.object_urls
    }

    /// Why the application failed, if it did.
    #[must_use]
    pub const fn failure(&self) -> Option<&MicroAppError> {
        self.failure.as_ref()
    }

    /// Scripts that threw during the most recent render.
    #[must_use]
    pub fn script_errors(&self) -> &[MicroAppError] {
        &self.script_errors
    }

    /// How many times the application has been rendered.
    #[must_use]
    pub const fn mount_count(&self) -> usize {
        self.mount_count
    }

    /// Move from `created` to `loading`. Returns `false` (and changes
    /// nothing) from any other status.
    pub fn begin_loading(&mut self) -> bool {
        if self.status != AppStatus::Created {
            return false;
        }
        self.status = AppStatus::Loading;
        self.gate.reset();
        true
    }

    /// Record a load signal. Returns `true` exactly once, when the gate
    /// completes and the application should mount now.
    ///
    /// Signals reaching a terminal application are discarded uncounted.
    pub fn on_load(&mut self, signal: LoadSignal) -> bool {
        if self.status.is_terminal() {
            debug!(app = %self.name, %signal, status = %self.status, "discarding late load signal");
            return false;
        }
        match self.gate.signal(signal) {
            GateOutcome::Ready => {
                info!(app = %self.name, "all resources ready");
                true
            }
            GateOutcome::Waiting => {
                debug!(app = %self.name, %signal, count = self.gate.load_count(), "load signal");
                false
            }
            GateOutcome::Ignored => {
                debug!(app = %self.name, %signal, "duplicate load signal ignored");
                false
            }
        }
    }

    /// Put the application in `failed`. A terminal application stays as it is.
    pub fn fail(&mut self, failure: MicroAppError) {
        if self.status.is_terminal() {
            debug!(app = %self.name, error = %failure, "ignoring failure of finished application");
            return;
        }
        error!(app = %self.name, error = %failure, "micro app failed to load");
        self.status = AppStatus::Failed;
        self.failure = Some(failure);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display_is_lowercase() {
        assert_eq!(AppStatus::Created.to_string(), "created");
        assert_eq!(AppStatus::Unmounted.to_string(), "unmounted");
    }

    #[test]
    fn mounts_exactly_once() {
        let mut app = App::new("a", "http://x/", NodeId(1));
        assert!(app.begin_loading());
        assert!(!app.on_load(LoadSignal::Parsed));
        assert!(!app.on_load(LoadSignal::Scripts));
        assert!(app.on_load(LoadSignal::Stylesheets));
        assert!(!app.on_load(LoadSignal::Stylesheets));
    }

    #[test]
    fn terminal_status_discards_signals() {
        let mut app = App::new("a", "http://x/", NodeId(1));
        assert!(app.begin_loading());
        app.status = AppStatus::Unmounted;
        assert!(!app.on_load(LoadSignal::Parsed));
        assert_eq!(app.load_count(), 0);
    }

    #[test]
    fn begin_loading_only_from_created() {
        let mut app = App::new("a", "http://x/", NodeId(1));
        assert!(app.begin_loading());
        assert!(!app.begin_loading());
        assert_eq!(app.status(), AppStatus::Loading);
    }
}
