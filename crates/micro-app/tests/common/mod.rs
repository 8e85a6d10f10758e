//! Test doubles shared by the micro-app integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;
use micro_app::{CodeExecutor, ExecutionError, Host, MicroAppConfig, Scope};
use micro_common::{FetchError, Fetcher};
use micro_dom::{AttributesMap, DomTree, NodeId};
use tokio::sync::Notify;

pub const BASE: &str = "http://x/app/";

/// In-memory fetcher. Clones share state, so a test keeps one clone to
/// inspect after handing another to the host.
#[derive(Clone, Default)]
pub struct StubFetcher {
    responses: Rc<RefCell<HashMap<String, Result<String, FetchError>>>>,
    calls: Rc<RefCell<Vec<String>>>,
    gates: Rc<RefCell<HashMap<String, Rc<Notify>>>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`.
    pub fn with(self, url: &str, body: &str) -> Self {
        let _ = self
            .responses
            .borrow_mut()
            .insert(url.to_string(), Ok(body.to_string()));
        self
    }

    /// Answer `url` with an HTTP error status.
    pub fn failing(self, url: &str, status: u16) -> Self {
        let _ = self.responses.borrow_mut().insert(
            url.to_string(),
            Err(FetchError::Status {
                url: url.to_string(),
                status,
            }),
        );
        self
    }

    /// Hold the response for `url` until the returned `Notify` is notified.
    pub fn gate(&self, url: &str) -> Rc<Notify> {
        let notify = Rc::new(Notify::new());
        let _ = self
            .gates
            .borrow_mut()
            .insert(url.to_string(), Rc::clone(&notify));
        notify
    }

    /// Every URL requested, in request order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self, url: &str) -> usize {
        self.calls.borrow().iter().filter(|c| *c == url).count()
    }

    pub fn was_requested(&self, url: &str) -> bool {
        self.call_count(url) > 0
    }
}

#[async_trait(?Send)]
impl Fetcher for StubFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        self.calls.borrow_mut().push(url.to_string());
        let gate = self.gates.borrow().get(url).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.responses
            .borrow()
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::Unavailable(url.to_string())))
    }
}

/// One call the executor received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Executed {
    Classic {
        code: String,
        source_url: Option<String>,
    },
    Module {
        src: String,
        code: String,
    },
}

impl Executed {
    pub fn code(&self) -> &str {
        match self {
            Self::Classic { code, .. } | Self::Module { code, .. } => code,
        }
    }
}

/// Executor that records what it was asked to run. Code containing
/// `throw` fails.
#[derive(Clone, Default)]
pub struct RecordingExecutor {
    log: Rc<RefCell<Vec<Executed>>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> Vec<Executed> {
        self.log.borrow().clone()
    }

    pub fn codes(&self) -> Vec<String> {
        self.log.borrow().iter().map(|e| e.code().to_string()).collect()
    }
}

impl CodeExecutor for RecordingExecutor {
    fn execute(
        &mut self,
        code: &str,
        scope: Scope,
        source_url: Option<&str>,
    ) -> Result<(), ExecutionError> {
        assert_eq!(scope, Scope::Global);
        self.log.borrow_mut().push(Executed::Classic {
            code: code.to_string(),
            source_url: source_url.map(str::to_string),
        });
        if code.contains("throw") {
            return Err(ExecutionError(format!("threw: {code}")));
        }
        Ok(())
    }

    fn run_module(&mut self, src: &str, code: &str) -> Result<(), ExecutionError> {
        self.log.borrow_mut().push(Executed::Module {
            src: src.to_string(),
            code: code.to_string(),
        });
        Ok(())
    }
}

/// Host document `<body><micro-app></micro-app></body>`; returns the host
/// and the container.
pub fn host_with(fetcher: &StubFetcher, executor: &RecordingExecutor) -> (Host, NodeId) {
    let mut document = DomTree::new();
    let body = document.create_element("body", AttributesMap::new());
    document.append_child(NodeId::ROOT, body);
    let container = document.create_element("micro-app", AttributesMap::new());
    document.append_child(body, container);
    let host = Host::new(
        document,
        fetcher.clone(),
        executor.clone(),
        MicroAppConfig::default(),
    )
    .expect("default config is valid");
    (host, container)
}

/// Add another empty container to the host document.
pub fn add_container(host: &Host) -> NodeId {
    let mut document = host.document_mut();
    let container = document.create_element("micro-app", AttributesMap::new());
    let parent = document
        .first_element_by_tag_name(NodeId::ROOT, "body")
        .unwrap_or(NodeId::ROOT);
    document.append_child(parent, container);
    container
}
