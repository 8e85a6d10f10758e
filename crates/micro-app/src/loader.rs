//! The load pipeline: fetch, transform, parse, extract, fetch resources.
//!
//! Work for one application is a single future driven on the caller's
//! executor. The stylesheet and script groups run concurrently; within a
//! group every fetch runs concurrently and the group completes only when
//! all of them succeed.

use futures::future::try_join_all;
use micro_common::FetchError;
use micro_dom::AttributesMap;
use micro_html::parse_fragment;
use tracing::{debug, info, warn};

use crate::app::{App, AppHandle};
use crate::error::MicroAppError;
use crate::extract::extract_sources;
use crate::gate::LoadSignal;
use crate::host::Host;
use crate::mount;

/// Drive `app` from `created` to `mounted` (or `failed`).
///
/// # Algorithm
///
/// STEP 1: Fetch the HTML document from the application's URL.
///
/// STEP 2: Rename `<head>`/`<body>`, parse the result as a fragment and
/// extract its sources. Signal [`LoadSignal::Parsed`].
///
/// STEP 3: Fetch the stylesheet and script groups concurrently. Each group
/// signals once all of its members are known.
///
/// The application mounts from whichever signal completes the gate. A
/// failed fetch marks it failed; an unmount at any point makes every later
/// step a no-op.
pub(crate) async fn load(host: &Host, app: &AppHandle) {
    let (name, url) = {
        let mut app = app.borrow_mut();
        if !app.begin_loading() {
            debug!(app = %app.name(), status = %app.status(), "load requested twice, ignoring");
            return;
        }
        (app.name().to_string(), app.url().to_string())
    };
    info!(app = %name, %url, "loading micro app");

    // STEP 1
    let html = match host.fetcher.fetch_text(&url).await {
        Ok(html) => html,
        Err(source) => {
            app.borrow_mut()
                .fail(MicroAppError::HtmlFetchFailed { app: name, url, source });
            return;
        }
    };

    // STEP 2
    {
        let mut guard = app.borrow_mut();
        let app = &mut *guard;
        if app.status().is_terminal() {
            debug!(app = %name, "unmounted while fetching html, discarding");
            return;
        }
        let transformed = host.transformer.transform(&html);
        let (mut tree, issues) = parse_fragment(&transformed);
        for issue in &issues {
            debug!(app = %name, "parse issue: {}", issue.message);
        }
        let root = tree.root();
        let summary = extract_sources(&mut tree, root, &url, &mut app.source);
        debug!(
            app = %name,
            styles = summary.styles,
            scripts = summary.scripts,
            skipped = summary.skipped,
            "sources extracted"
        );
        app.prepared = Some(tree);
    }
    signal(host, app, LoadSignal::Parsed);

    // STEP 3
    let ((), ()) = futures::join!(load_stylesheets(host, app), load_scripts(host, app));
}

/// Deliver a signal and mount if it completed the gate.
fn signal(host: &Host, app: &AppHandle, signal: LoadSignal) {
    let mut app = app.borrow_mut();
    if app.on_load(signal) {
        mount::mount(host, &mut app);
    }
}

/// `(key, known text)` for every record of a group, in order.
type Pending = Vec<(String, Option<String>)>;

/// Fetch every member of a group whose text is not yet known.
///
/// Resolves to the texts in `pending` order, or the first failure.
async fn fetch_group(host: &Host, pending: &Pending) -> Result<Vec<String>, (String, FetchError)> {
    let fetches = pending.iter().map(|(url, known)| async move {
        match known {
            Some(text) => Ok(text.clone()),
            None => host
                .fetcher
                .fetch_text(url)
                .await
                .map_err(|e| (url.clone(), e)),
        }
    });
    try_join_all(fetches).await
}

fn group_failed(app: &AppHandle, group: LoadSignal, url: String, source: FetchError) {
    let mut app = app.borrow_mut();
    let failure = MicroAppError::ResourceFetchFailed {
        app: app.name().to_string(),
        group,
        url,
        source,
    };
    app.fail(failure);
}

async fn load_stylesheets(host: &Host, app: &AppHandle) {
    let pending: Pending = app
        .borrow()
        .source()
        .styles()
        .map(|r| (r.key().to_string(), r.code().map(str::to_string)))
        .collect();

    if !pending.is_empty() {
        match fetch_group(host, &pending).await {
            Ok(texts) => {
                let keys = pending.into_iter().map(|(key, _)| key);
                inject_stylesheets(&mut app.borrow_mut(), &host.config.head_tag, keys.zip(texts));
            }
            Err((url, source)) => {
                group_failed(app, LoadSignal::Stylesheets, url, source);
                return;
            }
        }
    }
    signal(host, app, LoadSignal::Stylesheets);
}

/// Cache stylesheet texts and append each, in order, as a `<style>` of the
/// head container (or of the fragment root when there is no head).
fn inject_stylesheets(app: &mut App, head_tag: &str, sheets: impl Iterator<Item = (String, String)>) {
    if app.status().is_terminal() {
        return;
    }
    let Some(tree) = app.prepared.as_mut() else {
        warn!(app = %app.name(), "stylesheets arrived without a prepared document");
        return;
    };
    let root = tree.root();
    let head = tree.first_element_by_tag_name(root, head_tag).unwrap_or(root);
    for (key, css) in sheets {
        let style = tree.create_element("style", AttributesMap::new());
        let text = tree.create_text(&css);
        tree.append_child(style, text);
        tree.append_child(head, style);
        if let Some(record) = app.source.get_mut(&key) {
            let _ = record.resolve(css);
        }
    }
}

async fn load_scripts(host: &Host, app: &AppHandle) {
    let pending: Pending = app
        .borrow()
        .source()
        .scripts()
        .map(|r| (r.key().to_string(), r.code().map(str::to_string)))
        .collect();

    if !pending.is_empty() {
        match fetch_group(host, &pending).await {
            Ok(texts) => {
                let mut app = app.borrow_mut();
                if !app.status().is_terminal() {
                    for ((key, _), text) in pending.into_iter().zip(texts) {
                        if let Some(record) = app.source.get_mut(&key) {
                            let _ = record.resolve(text);
                        }
                    }
                }
            }
            Err((url, source)) => {
                group_failed(app, LoadSignal::Scripts, url, source);
                return;
            }
        }
    }
    signal(host, app, LoadSignal::Scripts);
}
