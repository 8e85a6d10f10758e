//! JavaScript global objects.
//!
//! This module registers built-in global objects that are available to all
//! application scripts.
//!
//! # Implemented
//!
//! - `console` - [Console Standard](https://console.spec.whatwg.org/)
//! - `window` - [§ 7.2 The Window object](https://html.spec.whatwg.org/multipage/nav-history-apis.html#the-window-object)
//!
//! # Not Yet Implemented
//!
//! - `document` - [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
//! - `location` - [§ 7.7.1 The Location interface](https://html.spec.whatwg.org/multipage/nav-history-apis.html#the-location-interface)

mod console;
mod window;

use boa_engine::Context;

/// Register all global objects on the context.
///
/// This should be called once when creating a new `JsRuntime`.
pub fn register_globals(context: &mut Context) {
    console::register_console(context);
    window::register_window(context);
}
