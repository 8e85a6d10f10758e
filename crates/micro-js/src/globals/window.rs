//! [§ 7.2 The Window object](https://html.spec.whatwg.org/multipage/nav-history-apis.html#the-window-object)

use boa_engine::{Context, js_string, property::Attribute};

/// Register `window` (and `self`) as aliases of the global object.
///
/// "The window, frames, and self getter steps are to return this's relevant
/// realm.[[GlobalEnv]].[[GlobalThisValue]]."
pub fn register_window(context: &mut Context) {
    let global = context.global_object();
    for name in [js_string!("window"), js_string!("self")] {
        context
            .register_global_property(name, global.clone(), Attribute::all())
            .expect("window globals should not already exist");
    }
}
