//! Deduplicated warnings for unsupported features.
//!
//! A document that uses an unsupported feature usually uses it many times;
//! each distinct message is logged once per process (or until
//! [`clear_warnings`] is called).

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use tracing::warn;

/// Global set of warnings we've already logged (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about an unsupported feature (logs once per unique message).
///
/// Returns true if this call logged the warning.
///
/// # Example
/// ```
/// use micro_common::warning::warn_once;
///
/// assert!(warn_once("extract", "style isolation is not implemented"));
/// assert!(!warn_once("extract", "style isolation is not implemented"));
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let should_log = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_log {
        warn!(component, "{message}");
    }
    should_log
}

/// Clear all recorded warnings.
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleared_warnings_log_again() {
        let message = "cleared warnings log again";
        let _ = warn_once("test", message);
        assert!(!warn_once("test", message));
        clear_warnings();
        assert!(warn_once("test", message));
    }
}
