//! Response body decoding.
//!
//! | Condition | Result |
//! |-----------|--------|
//! | status `204` | [`Decoded::Null`], whatever the mode |
//! | mode `Json` | parsed value, or `Null` when empty or unparsable |
//! | mode `Blob` | [`Decoded::Blob`] tagged with the response media type |
//! | mode `ArrayBuffer` | [`Decoded::Bytes`] |
//! | mode `Text` | [`Decoded::Text`] (lossy UTF-8) |
//!
//! Without an explicit mode, `application/json` selects `Json`, `application/pdf` and
//! `*octet-stream` select `Blob`, and anything else selects `Text`.
//!
//! A success body that claims to be JSON but does not parse is treated as "no payload"
//! rather than an error.

use crate::protocol::{is_binary_media_type, is_json_media_type};
use crate::types::{Decoded, ParseMode};
use bytes::Bytes;

const NO_CONTENT: u16 = 204;
const DEFAULT_BLOB_TYPE: &str = "application/octet-stream";

/// Pick a decode mode from the declared content type.
pub fn infer_mode(content_type: Option<&str>) -> ParseMode {
    match content_type {
        Some(ct) if is_json_media_type(ct) => ParseMode::Json,
        Some(ct) if is_binary_media_type(ct) => ParseMode::Blob,
        _ => ParseMode::Text,
    }
}

/// Decode a successful response body.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use invoice_api::client::decode;
/// use invoice_api::{Decoded, ParseMode};
///
/// let body = Bytes::from_static(br#"{"id": 1}"#);
/// let decoded = decode(200, Some("application/json"), body.clone(), None);
/// assert_eq!(decoded, Decoded::Json(serde_json::json!({"id": 1})));
///
/// assert_eq!(decode(204, None, body, Some(ParseMode::Text)), Decoded::Null);
/// ```
pub fn decode(status: u16, content_type: Option<&str>, body: Bytes, mode: Option<ParseMode>) -> Decoded {
    if status == NO_CONTENT {
        return Decoded::Null;
    }

    match mode.unwrap_or_else(|| infer_mode(content_type)) {
        ParseMode::Json => decode_json(&body),
        ParseMode::Blob => Decoded::Blob {
            content_type: content_type.unwrap_or(DEFAULT_BLOB_TYPE).to_string(),
            bytes: body,
        },
        ParseMode::ArrayBuffer => Decoded::Bytes(body),
        ParseMode::Text => Decoded::Text(String::from_utf8_lossy(&body).into_owned()),
    }
}

fn decode_json(body: &[u8]) -> Decoded {
    if body.is_empty() {
        return Decoded::Null;
    }
    match serde_json::from_slice(body) {
        Ok(value) => Decoded::Json(value),
        Err(e) => {
            tracing::debug!(error = %e, "unparsable JSON success body, treating as no payload");
            Decoded::Null
        }
    }
}
