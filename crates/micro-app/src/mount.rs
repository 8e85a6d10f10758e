//! Rendering a prepared application into the host document, and tearing
//! it down again.

use micro_dom::AttributesMap;
use tracing::{error, info, warn};

use crate::app::{App, AppStatus};
use crate::error::MicroAppError;
use crate::executor::Scope;
use crate::host::Host;
use crate::source::{SourceKind, SourceRecord};

/// Render `app` into its container and run its scripts.
///
/// # Algorithm
///
/// STEP 1: Deep-copy the prepared tree into the host arena. The copy of the
/// fragment root is itself a detached `DocumentFragment`.
///
/// STEP 2: Append the fragment to the container, which moves its children
/// there in order.
///
/// STEP 3: Run every script record in order. A module is attached as a
/// `<script type="module">` under the body container, its `src` the record
/// key or, for inline text, a fresh object URL. Classic code runs in its own
/// function scope with `this`/`window` bound to the global object.
///
/// STEP 4: Mark the application mounted.
///
/// A script that throws is logged and recorded; later scripts still run.
/// A container missing from the host document fails the application.
pub(crate) fn mount(host: &Host, app: &mut App) {
    let container = app.container();
    let Some(prepared) = app.prepared.as_ref() else {
        warn!(app = %app.name(), "nothing prepared to mount");
        return;
    };
    let mut document = host.document.borrow_mut();
    if document.get(container).is_none() {
        let failure = MicroAppError::ContainerMissing {
            app: app.name().to_string(),
            container,
        };
        app.fail(failure);
        return;
    }

    // STEP 1
    let fragment = document.import_node(prepared, prepared.root());
    // STEP 2
    document.append_child(container, fragment);
    let body = document
        .first_element_by_tag_name(container, &host.config.body_tag)
        .unwrap_or(container);

    // STEP 3
    let scripts: Vec<SourceRecord> = app.source.scripts().cloned().collect();
    app.script_errors.clear();
    let mut executor = host.executor.borrow_mut();
    for record in scripts {
        let key = record.key();
        let Some(code) = record.code() else {
            warn!(app = %app.name(), %key, "script text missing at mount, skipping");
            continue;
        };
        let result = if record.kind() == SourceKind::Module {
            let src = if record.is_external() {
                key.to_string()
            } else {
                let url = host.object_urls.borrow_mut().create(code);
                app.object_urls.push(url.clone());
                url
            };
            let mut attrs = AttributesMap::new();
            let _ = attrs.insert("type".to_string(), "module".to_string());
            let _ = attrs.insert("src".to_string(), src.clone());
            let element = document.create_element("script", attrs);
            document.append_child(body, element);
            executor.run_module(&src, code)
        } else {
            executor.execute(code, Scope::Global, record.is_external().then_some(key))
        };
        if let Err(source) = result {
            error!(app = %app.name(), %key, error = %source, "script failed");
            app.script_errors.push(MicroAppError::Execution {
                app: app.name().to_string(),
                key: key.to_string(),
                source,
            });
        }
    }

    // STEP 4
    app.status = AppStatus::Mounted;
    app.mount_count += 1;
    info!(app = %app.name(), mounts = app.mount_count, "micro app mounted");
}

/// Remove a mounted render from the container and revoke its object URLs.
pub(crate) fn clear_render(host: &Host, app: &mut App) {
    if app.status == AppStatus::Mounted {
        host.document.borrow_mut().remove_all_children(app.container());
    }
    let mut urls = host.object_urls.borrow_mut();
    for url in app.object_urls.drain(..) {
        let _ = urls.revoke(&url);
    }
}

/// Tear `app` down: clear its render, drop its sources and prepared tree,
/// and mark it unmounted so in-flight load work is discarded.
pub(crate) fn unmount(host: &Host, app: &mut App) {
    if app.status == AppStatus::Unmounted {
        return;
    }
    clear_render(host, app);
    app.source.clear();
    app.prepared = None;
    app.status = AppStatus::Unmounted;
    info!(app = %app.name(), "micro app unmounted");
}

/// Render a mounted application again from its cached sources.
pub(crate) fn remount(host: &Host, app: &mut App) -> bool {
    if app.status != AppStatus::Mounted {
        return false;
    }
    clear_render(host, app);
    mount(host, app);
    app.status == AppStatus::Mounted
}

