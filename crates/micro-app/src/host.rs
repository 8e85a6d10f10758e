//! The host: one document, one script engine, many micro applications.

use std::cell::{Ref, RefCell, RefMut};

use futures::future::join_all;
use micro_common::Fetcher;
use micro_dom::{DomTree, NodeId};
use tracing::{info, warn};

use crate::app::{App, AppHandle};
use crate::config::MicroAppConfig;
use crate::error::{ConfigError, MicroAppError};
use crate::executor::CodeExecutor;
use crate::loader;
use crate::mount;
use crate::object_url::ObjectUrls;
use crate::registry::AppRegistry;
use crate::transform::HtmlTransformer;

/// Tag of the declarative container element.
pub const CONTAINER_TAG: &str = "micro-app";

/// Owns the host document and everything applications share.
///
/// All methods take `&self`; interior state lives in `RefCell`s that are
/// never borrowed across an `.await`, so several loads can be driven
/// concurrently on one thread.
pub struct Host {
    pub(crate) document: RefCell<DomTree>,
    pub(crate) fetcher: Box<dyn Fetcher>,
    pub(crate) executor: RefCell<Box<dyn CodeExecutor>>,
    pub(crate) object_urls: RefCell<ObjectUrls>,
    pub(crate) transformer: HtmlTransformer,
    pub(crate) config: MicroAppConfig,
    registry: RefCell<AppRegistry>,
}

impl Host {
    /// Create a host around `document`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTag`] if `config` does not pass
    /// [`MicroAppConfig::validate`].
    pub fn new(
        document: DomTree,
        fetcher: impl Fetcher + 'static,
        executor: impl CodeExecutor + 'static,
        config: MicroAppConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            document: RefCell::new(document),
            fetcher: Box::new(fetcher),
            executor: RefCell::new(Box::new(executor)),
            object_urls: RefCell::new(ObjectUrls::new()),
            transformer: HtmlTransformer::new(&config),
            config,
            registry: RefCell::new(AppRegistry::new()),
        })
    }

    /// The host document.
    ///
    /// # Panics
    ///
    /// If called while a mount is writing to the document.
    #[must_use]
    pub fn document(&self) -> Ref<'_, DomTree> {
        self.document.borrow()
    }

    /// Mutable access to the host document, e.g. to add containers.
    ///
    /// # Panics
    ///
    /// If the document is already borrowed.
    #[must_use]
    pub fn document_mut(&self) -> RefMut<'_, DomTree> {
        self.document.borrow_mut()
    }

    /// Loader settings.
    #[must_use]
    pub const fn config(&self) -> &MicroAppConfig {
        &self.config
    }

    /// Object URLs currently live.
    #[must_use]
    pub fn object_urls(&self) -> Ref<'_, ObjectUrls> {
        self.object_urls.borrow()
    }

    /// Register a new application in `created` status.
    ///
    /// # Errors
    ///
    /// [`MicroAppError::DuplicateName`] or [`MicroAppError::ContainerInUse`].
    pub fn create_app(
        &self,
        name: &str,
        url: &str,
        container: NodeId,
    ) -> Result<AppHandle, MicroAppError> {
        let app = App::new(name, url, container).into_handle();
        self.registry.borrow_mut().insert(AppHandle::clone(&app))?;
        info!(app = name, url, ?container, "micro app created");
        Ok(app)
    }

    /// Load and, once everything arrived, mount `app`.
    ///
    /// Completes when the application is mounted, has failed, or was
    /// unmounted part-way. Load failures are logged and recorded on the
    /// application rather than returned.
    pub async fn load(&self, app: &AppHandle) {
        loader::load(self, app).await;
    }

    /// Load several applications concurrently.
    pub async fn load_all(&self, apps: &[AppHandle]) {
        let _ = join_all(apps.iter().map(|app| self.load(app))).await;
    }

    /// [`Host::create_app`] followed by [`Host::load`].
    ///
    /// # Errors
    ///
    /// Only the registry errors of [`Host::create_app`].
    pub async fn launch(
        &self,
        name: &str,
        url: &str,
        container: NodeId,
    ) -> Result<AppHandle, MicroAppError> {
        let app = self.create_app(name, url, container)?;
        self.load(&app).await;
        Ok(app)
    }

    /// Look up a registered application.
    #[must_use]
    pub fn app(&self, name: &str) -> Option<AppHandle> {
        self.registry.borrow().get(name)
    }

    /// Names of the registered applications.
    #[must_use]
    pub fn app_names(&self) -> Vec<String> {
        self.registry.borrow().names()
    }

    /// Unregister and tear down the application called `name`.
    ///
    /// Safe at any point of a load: work still in flight completes into a
    /// no-op. Returns the handle, or `None` if no such application exists.
    pub fn unmount(&self, name: &str) -> Option<AppHandle> {
        let app = self.registry.borrow_mut().remove(name)?;
        mount::unmount(self, &mut app.borrow_mut());
        Some(app)
    }

    /// Re-render a mounted application from its cached sources without
    /// fetching anything. Returns `false` unless the application was mounted
    /// and is still mounted afterwards.
    #[must_use]
    pub fn remount(&self, app: &AppHandle) -> bool {
        mount::remount(self, &mut app.borrow_mut())
    }

    /// Create an application for every `<micro-app name=… url=…>` element
    /// in the document that does not have one yet.
    ///
    /// Elements missing either attribute, or clashing with a registered
    /// name, are skipped with a warning.
    #[must_use]
    pub fn connect_elements(&self) -> Vec<AppHandle> {
        let candidates: Vec<(NodeId, Option<String>, Option<String>)> = {
            let document = self.document.borrow();
            document
                .elements_by_tag_name(document.root(), CONTAINER_TAG)
                .into_iter()
                .filter_map(|id| {
                    let element = document.as_element(id)?;
                    Some((
                        id,
                        element.get_attribute("name").map(str::to_string),
                        element.get_attribute("url").map(str::to_string),
                    ))
                })
                .collect()
        };

        let mut created = Vec::new();
        for (container, name, url) in candidates {
            let (Some(name), Some(url)) = (name, url) else {
                warn!(?container, "<{CONTAINER_TAG}> needs both name and url attributes");
                continue;
            };
            if self
                .app(&name)
                .is_some_and(|app| app.borrow().container() == container)
            {
                continue;
            }
            match self.create_app(&name, &url, container) {
                Ok(app) => created.push(app),
                Err(err) => warn!(%name, error = %err, "skipping <{CONTAINER_TAG}>"),
            }
        }
        created
    }
}
