//! Request-side types: per-call options, bodies, and the mutable request context.

use super::params::{ParamValue, QueryParams};
use crate::error::{ApiError, ErrorCause, Result};
use crate::protocol::constants::{headers, media_types};
use crate::protocol::{messages, Locale};
use bytes::Bytes;
use http::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

/// How a successful response body should be decoded.
///
/// When unset, the mode is inferred from the response `Content-Type`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParseMode {
    /// Structured JSON.
    Json,
    /// Binary payload tagged with its content type.
    Blob,
    /// Raw bytes.
    ArrayBuffer,
    /// UTF-8 text.
    Text,
}

/// One part of a multipart form.
#[derive(Clone, Debug, PartialEq)]
pub enum FormPart {
    /// Plain text field.
    Text {
        /// Field name.
        name: String,
        /// Field value.
        value: String,
    },
    /// File upload.
    File {
        /// Field name.
        name: String,
        /// File name reported to the server.
        file_name: String,
        /// Media type of the file, if known.
        mime: Option<String>,
        /// File contents.
        bytes: Bytes,
    },
}

/// A multipart form, kept as plain data so every attempt can rebuild it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultipartForm {
    parts: Vec<FormPart>,
}

impl MultipartForm {
    /// Create an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Add a file part.
    #[must_use]
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: Option<&str>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        self.parts.push(FormPart::File {
            name: name.into(),
            file_name: file_name.into(),
            mime: mime.map(str::to_string),
            bytes: bytes.into(),
        });
        self
    }

    /// Parts in insertion order.
    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }
}

/// Request payload.
///
/// `Json` bodies are serialized and sent with `Content-Type: application/json`; a JSON
/// `null` counts as no body. `Binary` and `Multipart` bodies go out untouched and the
/// transport picks their content type (including the multipart boundary).
#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
    /// Structured JSON value.
    Json(Value),
    /// Raw bytes.
    Binary(Bytes),
    /// Multipart form.
    Multipart(MultipartForm),
}

impl RequestBody {
    /// Serialize any value into a JSON body.
    ///
    /// # Errors
    ///
    /// Returns a [`ErrorKind::Configuration`](crate::ErrorKind::Configuration) error if the
    /// value cannot be represented as JSON. The message uses the default [`Locale`].
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Self::json_in(value, Locale::default())
    }

    pub(crate) fn json_in<T: Serialize + ?Sized>(value: &T, locale: Locale) -> Result<Self> {
        serde_json::to_value(value).map(RequestBody::Json).map_err(|e| {
            ApiError::configuration(
                messages::invalid_request(locale, "request body"),
                ErrorCause::Json(e),
            )
        })
    }

    pub(crate) fn is_json(&self) -> bool {
        matches!(self, RequestBody::Json(_))
    }

    pub(crate) fn is_absent(&self) -> bool {
        matches!(self, RequestBody::Json(Value::Null))
    }
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        RequestBody::Json(value)
    }
}

impl From<Bytes> for RequestBody {
    fn from(bytes: Bytes) -> Self {
        RequestBody::Binary(bytes)
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(bytes: Vec<u8>) -> Self {
        RequestBody::Binary(Bytes::from(bytes))
    }
}

impl From<MultipartForm> for RequestBody {
    fn from(form: MultipartForm) -> Self {
        RequestBody::Multipart(form)
    }
}

/// Per-call options for [`ApiClient::request`](crate::ApiClient::request).
///
/// | Field | Default |
/// |-------|---------|
/// | `method` | `GET` |
/// | `headers` | none beyond `Accept` |
/// | `params` | none |
/// | `body` | none |
/// | `retry` | client default (2) |
/// | `parse_as` | inferred from `Content-Type` |
/// | `timeout` | client default (15 s) |
/// | `skip_auth` | `false` |
///
/// # Examples
///
/// ```
/// use invoice_api::{ParseMode, RequestOptions};
/// use std::time::Duration;
///
/// let options = RequestOptions::new()
///     .method(http::Method::POST)
///     .header("X-Trace", "1")
///     .param("draft", true)
///     .retry(0)
///     .timeout(Duration::from_secs(5))
///     .parse_as(ParseMode::Json);
/// assert_eq!(options.retry, Some(0));
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
    /// HTTP method.
    pub method: Method,
    /// Extra headers; they override the defaults.
    pub headers: BTreeMap<String, String>,
    /// Query parameters.
    pub params: QueryParams,
    /// Request payload.
    pub body: Option<RequestBody>,
    /// Retries after the first attempt.
    pub retry: Option<u32>,
    /// Response decode mode.
    pub parse_as: Option<ParseMode>,
    /// Per-attempt timeout.
    pub timeout: Option<Duration>,
    /// Do not send the `Authorization` header even when a token is set.
    pub skip_auth: bool,
}

impl RequestOptions {
    /// Options with every field at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Add or replace a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Replace all query parameters.
    #[must_use]
    pub fn params(mut self, params: impl Into<QueryParams>) -> Self {
        self.params = params.into();
        self
    }

    /// Add or replace one query parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key, value);
        self
    }

    /// Set the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the retry count.
    #[must_use]
    pub fn retry(mut self, retries: u32) -> Self {
        self.retry = Some(retries);
        self
    }

    /// Force a decode mode.
    #[must_use]
    pub fn parse_as(mut self, mode: ParseMode) -> Self {
        self.parse_as = Some(mode);
        self
    }

    /// Set the per-attempt timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Skip the `Authorization` header for this call.
    #[must_use]
    pub fn skip_auth(mut self) -> Self {
        self.skip_auth = true;
        self
    }
}

/// Fully resolved state of one logical call.
///
/// Built fresh for every call and owned by it. Header names are lowercase.
#[derive(Clone, Debug)]
pub struct RequestContext {
    /// Absolute target, query string included.
    pub target_url: Url,
    /// HTTP method.
    pub method: Method,
    /// Outgoing headers, keyed by lowercase name.
    pub headers: BTreeMap<String, String>,
    /// Payload, if any.
    pub body: Option<RequestBody>,
    /// Per-attempt timeout.
    pub timeout: Duration,
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Response decode mode.
    pub parse_mode: Option<ParseMode>,
    /// Whether the call opted out of the `Authorization` header.
    pub skip_auth: bool,
}

impl RequestContext {
    /// Header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Set a header, replacing any value stored under the same name in any case.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
    }

    /// Remove a header by case-insensitive name.
    pub fn remove_header(&mut self, name: &str) -> Option<String> {
        self.headers.remove(&name.to_ascii_lowercase())
    }

    /// Install a body. A JSON body sets `Content-Type: application/json`; other bodies leave
    /// the headers as they are.
    pub(crate) fn set_body(&mut self, body: Option<RequestBody>) {
        let body = body.filter(|b| !b.is_absent());
        if body.as_ref().is_some_and(RequestBody::is_json) {
            self.set_header(headers::CONTENT_TYPE, media_types::JSON);
        }
        self.body = body;
    }

    fn has_json_body(&self) -> bool {
        self.body.as_ref().is_some_and(RequestBody::is_json)
    }

    /// Merge a partial update into this context.
    ///
    /// Fields left unset in the patch keep their current value; headers are merged.
    pub fn apply(&mut self, patch: RequestPatch) {
        if let Some(url) = patch.target_url {
            self.target_url = url;
        }
        if let Some(method) = patch.method {
            self.method = method;
        }
        let sets_content_type = patch
            .headers
            .keys()
            .any(|name| name.eq_ignore_ascii_case(headers::CONTENT_TYPE));

        for name in &patch.remove_headers {
            self.remove_header(name);
        }
        for (name, value) in patch.headers {
            self.set_header(&name, value);
        }
        if let Some(body) = patch.body {
            let was_json = self.has_json_body();
            self.set_body(Some(body));
            // Drop the JSON content type that came with the replaced body.
            if was_json
                && !self.has_json_body()
                && !sets_content_type
                && self.header(headers::CONTENT_TYPE) == Some(media_types::JSON)
            {
                self.remove_header(headers::CONTENT_TYPE);
            }
        }
        if let Some(timeout) = patch.timeout {
            self.timeout = timeout;
        }
        if let Some(retries) = patch.max_retries {
            self.max_retries = retries;
        }
        if let Some(mode) = patch.parse_mode {
            self.parse_mode = Some(mode);
        }
    }
}

/// Partial update returned by a request interceptor.
///
/// # Examples
///
/// ```
/// use invoice_api::RequestPatch;
///
/// let patch = RequestPatch::new().header("X-Client", "desktop").remove_header("Accept");
/// assert_eq!(patch.headers.get("X-Client").map(String::as_str), Some("desktop"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestPatch {
    /// Replacement target.
    pub target_url: Option<Url>,
    /// Replacement method.
    pub method: Option<Method>,
    /// Headers to add or replace.
    pub headers: BTreeMap<String, String>,
    /// Headers to drop; applied before `headers`.
    pub remove_headers: Vec<String>,
    /// Replacement body.
    pub body: Option<RequestBody>,
    /// Replacement timeout.
    pub timeout: Option<Duration>,
    /// Replacement retry count.
    pub max_retries: Option<u32>,
    /// Replacement decode mode.
    pub parse_mode: Option<ParseMode>,
}

impl RequestPatch {
    /// An empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Drop a header.
    #[must_use]
    pub fn remove_header(mut self, name: impl Into<String>) -> Self {
        self.remove_headers.push(name.into());
        self
    }

    /// Replace the target URL.
    #[must_use]
    pub fn target_url(mut self, url: Url) -> Self {
        self.target_url = Some(url);
        self
    }

    /// Replace the method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Replace the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Replace the timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replace the retry count.
    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Replace the decode mode.
    #[must_use]
    pub fn parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_mode = Some(mode);
        self
    }
}
