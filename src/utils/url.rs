//! URL helpers for deriving provider endpoints.
//!
//! Endpoints are configured as complete URLs (for example
//! `http://localhost:11434/api/generate`). Auxiliary endpoints such as model
//! listings live next to them and are derived from the configured value.

use reqwest::Url;

/// Normalize a URL by removing trailing slashes.
///
/// # Examples
///
/// ```
/// use localchat::utils::url::normalize_url;
///
/// assert_eq!(normalize_url("http://localhost:1234/v1/"), "http://localhost:1234/v1");
/// assert_eq!(normalize_url("http://localhost:1234/v1"), "http://localhost:1234/v1");
/// ```
pub fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Replace the trailing `strip` path segments of `endpoint` with `append`.
///
/// Returns `None` when the endpoint is not an absolute URL.
///
/// # Examples
///
/// ```
/// use localchat::utils::url::sibling_endpoint;
///
/// assert_eq!(
///     sibling_endpoint("http://localhost:11434/api/generate", 1, "tags").as_deref(),
///     Some("http://localhost:11434/api/tags")
/// );
/// assert_eq!(
///     sibling_endpoint("http://localhost:1234/v1/chat/completions", 2, "models").as_deref(),
///     Some("http://localhost:1234/v1/models")
/// );
/// ```
pub fn sibling_endpoint(endpoint: &str, strip: usize, append: &str) -> Option<String> {
    let mut url = Url::parse(&normalize_url(endpoint)).ok()?;
    let mut segments: Vec<String> = url
        .path_segments()
        .map(|parts| {
            parts
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    let keep = segments.len().saturating_sub(strip);
    segments.truncate(keep);
    segments.extend(
        append
            .split('/')
            .filter(|part| !part.is_empty())
            .map(str::to_string),
    );
    url.set_path(&format!("/{}", segments.join("/")));
    url.set_query(None);
    Some(url.to_string())
}
