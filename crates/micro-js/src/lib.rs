//! JavaScript runtime for micro application scripts.
//!
//! Uses [Boa](https://boajs.dev/) as the JavaScript engine.
//!
//! # Example
//!
//! ```
//! use micro_js::JsRuntime;
//!
//! let mut runtime = JsRuntime::new();
//! runtime.execute_function_scoped("window.answer = 42;", None).unwrap();
//! let answer = runtime.execute("answer").unwrap();
//! assert_eq!(answer.as_number(), Some(42.0));
//! ```
//!
//! # Implemented
//!
//! - Script execution via `JsRuntime::execute()`
//! - Function-scoped classic script execution with `window` bound to the
//!   global object
//! - Module evaluation (modules without imports)
//! - `console.log()`, `console.warn()`, `console.error()`
//! - `window` as an alias of the global object
//!
//! # Not Yet Implemented
//!
//! ## DOM APIs
//!
//! [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
//! - `document` and every element interface
//!
//! ## Timers
//!
//! [§ 8.6 Timers](https://html.spec.whatwg.org/multipage/timers-and-user-prompts.html#timers)
//! - `setTimeout()` / `setInterval()`
//!
//! ## Module Loading
//!
//! [§ 8.1.5.5 Fetching scripts](https://html.spec.whatwg.org/multipage/webappapis.html#fetching-scripts)
//! - `import` of other modules (no module loader is registered)

mod globals;

use boa_engine::builtins::promise::PromiseState;
use boa_engine::{Context, JsError, JsNativeError, JsValue, Module, Source};

/// JavaScript runtime shared by every application mounted in a host.
///
/// [§ 8.1.6 JavaScript execution context](https://html.spec.whatwg.org/multipage/webappapis.html)
///
/// There is one global object per runtime. Classic scripts of different
/// applications all see it as `window`, as they would in a browser tab.
pub struct JsRuntime {
    /// The Boa JavaScript context.
    context: Context,
}

impl JsRuntime {
    /// Create a new JavaScript runtime with global objects registered.
    #[must_use]
    pub fn new() -> Self {
        let mut context = Context::default();
        globals::register_globals(&mut context);
        Self { context }
    }

    /// Evaluate JavaScript source code as a global script.
    ///
    /// # Errors
    ///
    /// Returns `JsError` if the JavaScript code contains syntax errors or
    /// throws an uncaught exception.
    pub fn execute(&mut self, source: &str) -> Result<JsValue, JsError> {
        self.context.eval(Source::from_bytes(source))
    }

    /// Run classic script code inside its own function scope.
    ///
    /// The code is wrapped as `(function(window){ ... })` and called with
    /// `this` and `window` both bound to the global object. `var` and
    /// function declarations stay local to the call; assignments through
    /// `window` (or to undeclared names) reach the global object.
    ///
    /// When `source_url` is given a `//# sourceURL=` trailer names the code
    /// in stack traces.
    ///
    /// # Errors
    ///
    /// Returns `JsError` on syntax errors or uncaught exceptions.
    pub fn execute_function_scoped(
        &mut self,
        code: &str,
        source_url: Option<&str>,
    ) -> Result<(), JsError> {
        let trailer = source_url
            .map(|url| format!("//# sourceURL={url}\n"))
            .unwrap_or_default();
        let wrapped =
            format!("(function(window){{;{code}\n{trailer}}}).call(globalThis, globalThis);");
        self.execute(&wrapped).map(|_| ())
    }

    /// Parse, link and evaluate `code` as an ES module.
    ///
    /// [§ 8.1.4.2 Module scripts](https://html.spec.whatwg.org/multipage/webappapis.html#module-script)
    ///
    /// Pending jobs are drained before the evaluation promise is inspected,
    /// so a module without top-level await settles within this call.
    ///
    /// # Errors
    ///
    /// Returns `JsError` if parsing, linking or evaluation fails, or if the
    /// module is still pending afterwards.
    pub fn evaluate_module(&mut self, code: &str) -> Result<(), JsError> {
        let module = Module::parse(Source::from_bytes(code), None, &mut self.context)?;
        let promise = module.load_link_evaluate(&mut self.context);
        self.context.run_jobs();

        match promise.state() {
            PromiseState::Fulfilled(_) => Ok(()),
            PromiseState::Rejected(reason) => Err(JsError::from_opaque(reason)),
            PromiseState::Pending => Err(JsNativeError::error()
                .with_message("module evaluation did not settle")
                .into()),
        }
    }
}

impl Default for JsRuntime {
    fn default() -> Self {
        Self::new()
    }
}
