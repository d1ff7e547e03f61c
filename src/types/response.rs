//! Response-side types.

use crate::protocol;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use url::Url;

/// Decoded body of a successful call.
#[derive(Clone, Debug, PartialEq)]
pub enum Decoded {
    /// No payload: `204`, an empty JSON body, or a JSON body that failed to parse.
    Null,
    /// Structured JSON.
    Json(Value),
    /// Binary payload with its media type.
    Blob {
        /// Media type reported by the server.
        content_type: String,
        /// Payload.
        bytes: Bytes,
    },
    /// Raw bytes.
    Bytes(Bytes),
    /// Text.
    Text(String),
}

impl Decoded {
    /// Whether there is no payload.
    pub fn is_null(&self) -> bool {
        matches!(self, Decoded::Null)
    }

    /// Borrow the JSON value, if this is one.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Decoded::Json(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow the text, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Decoded::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Take the binary payload of a `Blob` or `Bytes` result.
    pub fn into_bytes(self) -> Option<Bytes> {
        match self {
            Decoded::Blob { bytes, .. } | Decoded::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Deserialize a JSON (or `Null`) result into `T`.
    ///
    /// `Null` deserializes as JSON `null`, so `Option<T>` targets yield `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use invoice_api::Decoded;
    /// use serde_json::json;
    ///
    /// let decoded = Decoded::Json(json!({"next_number": "SF-0042"}));
    /// let value: serde_json::Map<String, serde_json::Value> = decoded.json().unwrap();
    /// assert_eq!(value["next_number"], "SF-0042");
    ///
    /// let none: Option<u32> = Decoded::Null.json().unwrap();
    /// assert!(none.is_none());
    /// ```
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        match self {
            Decoded::Json(v) => T::deserialize(v),
            Decoded::Null => T::deserialize(&Value::Null),
            _ => Err(<serde_json::Error as serde::de::Error>::custom(
                "response body is not JSON",
            )),
        }
    }
}

/// Snapshot of the raw response handed to response interceptors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResponseMeta {
    /// HTTP status code.
    pub status: u16,
    /// Response headers, keyed by lowercase name.
    pub headers: BTreeMap<String, String>,
    /// URL the response was received from.
    pub url: Url,
}

impl ResponseMeta {
    /// Declared `Content-Type`, if any.
    pub fn content_type(&self) -> Option<&str> {
        protocol::content_type(&self.headers)
    }
}
