//! The seam between mounting and the JavaScript engine.

use micro_js::JsRuntime;
use thiserror::Error;
use tracing::debug;

/// Where classic code runs.
///
/// Only the host's global object exists; the variant documents the
/// `this`/`window` binding at call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// `this` and `window` are the global object.
    Global,
}

/// A script failed to parse or threw.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ExecutionError(pub String);

/// Runs application scripts.
pub trait CodeExecutor {
    /// Run classic script `code` in its own function scope.
    ///
    /// `source_url` names external code for diagnostics.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError`] if the code fails to parse or throws.
    fn execute(
        &mut self,
        code: &str,
        scope: Scope,
        source_url: Option<&str>,
    ) -> Result<(), ExecutionError>;

    /// Evaluate a module script loaded from `src`, whose text is `code`.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError`] if the module fails to parse, link or
    /// evaluate.
    fn run_module(&mut self, src: &str, code: &str) -> Result<(), ExecutionError>;
}

impl CodeExecutor for JsRuntime {
    fn execute(
        &mut self,
        code: &str,
        scope: Scope,
        source_url: Option<&str>,
    ) -> Result<(), ExecutionError> {
        debug!(?scope, source_url, "executing classic script");
        self.execute_function_scoped(code, source_url)
            .map_err(|e| ExecutionError(e.to_string()))
    }

    fn run_module(&mut self, src: &str, code: &str) -> Result<(), ExecutionError> {
        debug!(src, "evaluating module script");
        self.evaluate_module(code)
            .map_err(|e| ExecutionError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_reports_thrown_errors() {
        let mut runtime = JsRuntime::new();
        let err = CodeExecutor::execute(&mut runtime, "throw new Error('nope')", Scope::Global, None)
            .unwrap_err();
        assert!(err.0.contains("nope"), "unexpected message: {err}");
    }

    #[test]
    fn runtime_runs_modules_through_the_trait() {
        let mut runtime = JsRuntime::new();
        runtime
            .run_module("blob:micro-app/test", "globalThis.loaded = true;")
            .unwrap();
        let loaded = CodeExecutor::execute(&mut runtime, "window.ok = loaded;", Scope::Global, None);
        assert!(loaded.is_ok());
    }
}
