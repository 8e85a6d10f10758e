//! Tests for classic and module execution in `JsRuntime`.

use micro_js::JsRuntime;

#[test]
fn test_window_is_the_global_object() {
    let mut runtime = JsRuntime::new();
    let same = runtime.execute("window === globalThis").expect("eval");
    assert_eq!(same.as_boolean(), Some(true));
}

#[test]
fn test_function_scoped_code_writes_through_window() {
    let mut runtime = JsRuntime::new();
    runtime
        .execute_function_scoped("window.z = 1;", None)
        .expect("runs");
    let z = runtime.execute("z").expect("eval");
    assert_eq!(z.as_number(), Some(1.0));
}

#[test]
fn test_function_scoped_declarations_do_not_leak() {
    let mut runtime = JsRuntime::new();
    runtime
        .execute_function_scoped("var secret = 5; function helper() {}", Some("http://x/a.js"))
        .expect("runs");
    let leaked = runtime
        .execute("typeof secret + ',' + typeof helper")
        .expect("eval");
    assert_eq!(
        leaked.as_string().map(|s| s.to_std_string_escaped()),
        Some("undefined,undefined".to_string())
    );
}

#[test]
fn test_this_is_bound_to_global() {
    let mut runtime = JsRuntime::new();
    runtime
        .execute_function_scoped("this.viaThis = 'yes';", None)
        .expect("runs");
    let value = runtime.execute("viaThis").expect("eval");
    assert_eq!(
        value.as_string().map(|s| s.to_std_string_escaped()),
        Some("yes".to_string())
    );
}

#[test]
fn test_thrown_error_is_reported() {
    let mut runtime = JsRuntime::new();
    assert!(runtime
        .execute_function_scoped("throw new Error('boom');", None)
        .is_err());
}

#[test]
fn test_module_evaluation_has_module_scope() {
    let mut runtime = JsRuntime::new();
    runtime
        .evaluate_module("const local = 3; globalThis.fromModule = local * 2;")
        .expect("module evaluates");
    let value = runtime.execute("fromModule + ',' + typeof local").expect("eval");
    assert_eq!(
        value.as_string().map(|s| s.to_std_string_escaped()),
        Some("6,undefined".to_string())
    );
}

#[test]
fn test_module_syntax_error() {
    let mut runtime = JsRuntime::new();
    assert!(runtime.evaluate_module("export const = ;").is_err());
}
