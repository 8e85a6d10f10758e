//! Resource URL normalization.
//!
//! A micro application's resources are addressed either absolutely or
//! relative to the application's base URL. Resolution is plain suffix
//! concatenation; `.` and `..` segments, query-only and protocol-relative
//! references are not resolved.

/// Returns true if `reference` is an absolute `http`/`https` URL with a
/// non-empty host.
#[must_use]
pub fn is_absolute_http(reference: &str) -> bool {
    let rest = strip_prefix_ignore_case(reference, "http://")
        .or_else(|| strip_prefix_ignore_case(reference, "https://"));
    rest.is_some_and(|r| {
        r.chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '[')
    })
}

/// Resolve a resource reference against an application's base URL.
///
/// # Algorithm
///
/// STEP 1: An absolute `http(s)` reference is returned unchanged.
///
/// STEP 2: Otherwise trim one trailing `/` from the base and one leading `/`
/// from the reference and join them with exactly one `/`.
///
/// ```
/// use micro_common::normalize_url;
///
/// assert_eq!(normalize_url("b.js", "http://x/app/"), "http://x/app/b.js");
/// assert_eq!(normalize_url("/b.js", "http://x/app"), "http://x/app/b.js");
/// assert_eq!(normalize_url("https://cdn.example.com/v.js", "http://x/"), "https://cdn.example.com/v.js");
/// ```
#[must_use]
pub fn normalize_url(reference: &str, base_url: &str) -> String {
    // STEP 1
    if is_absolute_http(reference) {
        return reference.to_string();
    }

    // STEP 2
    let base = base_url.strip_suffix('/').unwrap_or(base_url);
    let path = reference.strip_prefix('/').unwrap_or(reference);
    format!("{base}/{path}")
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_detection() {
        assert!(is_absolute_http("http://x/a.js"));
        assert!(is_absolute_http("HTTPS://example.com"));
        assert!(!is_absolute_http("http://"));
        assert!(!is_absolute_http("//cdn.example.com/a.js"));
        assert!(!is_absolute_http("a.js"));
        assert!(!is_absolute_http("httpfoo.js"));
    }

    #[test]
    fn joins_with_exactly_one_separator() {
        assert_eq!(normalize_url("a.css", "http://x/app/"), "http://x/app/a.css");
        assert_eq!(normalize_url("a.css", "http://x/app"), "http://x/app/a.css");
        assert_eq!(normalize_url("/static/a.css", "http://x/app/"), "http://x/app/static/a.css");
    }

    #[test]
    fn does_not_resolve_dot_segments() {
        assert_eq!(normalize_url("../a.js", "http://x/app/"), "http://x/app/../a.js");
    }
}
