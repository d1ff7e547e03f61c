//! Shared header handling.
//!
//! Headers travel through the pipeline as a `BTreeMap<String, String>` keyed by the
//! lowercase header name, so that a caller's `Content-Type` and a default `content-type`
//! refer to the same entry. They are converted to an [`http::HeaderMap`] once, right before
//! the first attempt.
//!
//! # Media Type Classification
//!
//! | Content-Type | Classified as |
//! |--------------|---------------|
//! | contains `application/json` | JSON |
//! | contains `application/pdf` | binary |
//! | contains `octet-stream` | binary |
//! | anything else | text |
//!
//! # Examples
//!
//! ```
//! use invoice_api::protocol::{format_bearer, is_binary_media_type, is_json_media_type};
//!
//! assert_eq!(format_bearer("abc"), "Bearer abc");
//! assert!(is_json_media_type("application/json; charset=utf-8"));
//! assert!(is_binary_media_type("application/pdf"));
//! assert!(!is_binary_media_type("text/html"));
//! ```

use super::constants::{headers, media_types};
use crate::error::ErrorCause;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::BTreeMap;

/// Format an `Authorization` value for a bearer token.
#[inline]
pub fn format_bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Whether the media type denotes a JSON document.
pub fn is_json_media_type(value: &str) -> bool {
    value.to_ascii_lowercase().contains(media_types::JSON)
}

/// Whether the media type denotes a binary document (PDF or generic octet stream).
pub fn is_binary_media_type(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    lower.contains(media_types::PDF) || lower.contains(media_types::OCTET_STREAM)
}

/// Look up the `Content-Type` entry of a lowercase-keyed header map.
pub fn content_type(headers: &BTreeMap<String, String>) -> Option<&str> {
    headers.get(headers::CONTENT_TYPE).map(String::as_str)
}

/// Convert a lowercase-keyed header map into an [`http::HeaderMap`].
///
/// # Errors
///
/// Returns [`ErrorCause::Header`] for a name or value the HTTP layer rejects.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use invoice_api::protocol::to_header_map;
///
/// let mut headers = BTreeMap::new();
/// headers.insert("accept".to_string(), "application/json".to_string());
/// let map = to_header_map(&headers).unwrap();
/// assert_eq!(map["accept"], "application/json");
///
/// headers.insert("bad header".to_string(), "x".to_string());
/// assert!(to_header_map(&headers).is_err());
/// ```
pub fn to_header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, ErrorCause> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ErrorCause::Header(format!("invalid header name '{}'", name)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| ErrorCause::Header(format!("invalid value for header '{}'", name)))?;
        map.insert(name, value);
    }
    Ok(map)
}

/// Convert response headers into a lowercase-keyed map.
///
/// Values that are not visible ASCII are skipped. Repeated headers keep the last value.
pub fn header_map_to_btree(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for (name, value) in headers {
        if let Ok(val) = value.to_str() {
            out.insert(name.as_str().to_string(), val.to_string());
        }
    }
    out
}
