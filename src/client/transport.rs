//! The transport seam: one HTTP exchange, no policy.
//!
//! [`ApiClient`](crate::ApiClient) wraps every [`Transport::send`] in the per-attempt
//! timeout and owns retries, decoding, and error mapping. Implementations only move bytes.
//! [`ReqwestTransport`] is the default; tests and embedders can plug in their own.

use super::config::ClientConfig;
use crate::error::{ApiError, ErrorCause, Result};
use crate::protocol::{header_map_to_btree, messages};
use crate::types::{FormPart, MultipartForm};
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method};
use reqwest::multipart::{Form, Part};
use std::collections::BTreeMap;
use url::Url;

/// Wire form of a request body.
#[derive(Clone, Debug, PartialEq)]
pub enum TransportBody {
    /// Bytes sent as-is; JSON bodies arrive here already serialized.
    Bytes(Bytes),
    /// Multipart form; the transport chooses the boundary.
    Multipart(MultipartForm),
}

/// One outgoing request.
#[derive(Clone, Debug)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute target.
    pub url: Url,
    /// Validated headers.
    pub headers: HeaderMap,
    /// Payload, if any.
    pub body: Option<TransportBody>,
}

/// One received response, body fully read.
#[derive(Clone, Debug)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers, keyed by lowercase name.
    pub headers: BTreeMap<String, String>,
    /// Response body.
    pub body: Bytes,
}

/// Performs a single HTTP exchange.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and read the whole response.
    ///
    /// Any error means no usable response was received.
    async fn send(&self, request: TransportRequest) -> std::result::Result<TransportResponse, ErrorCause>;
}

/// [`Transport`] backed by `reqwest` with a cookie store.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build the underlying `reqwest` client from `config`.
    ///
    /// Timeouts are left to the caller; the client itself has none.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid proxy URL or a TLS backend that fails
    /// to initialize.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .cookie_store(true)
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .pool_max_idle_per_host(config.max_idle_connections);

        if let Some(proxy_url) = config.proxy_url.as_deref().filter(|p| !p.is_empty()) {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| {
                    ApiError::configuration(
                        messages::invalid_request(config.locale, proxy_url),
                        ErrorCause::Http(e),
                    )
                })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| {
                ApiError::configuration(
                    messages::invalid_request(config.locale, "http client"),
                    ErrorCause::Http(e),
                )
            })?;

        Ok(ReqwestTransport { client })
    }

    /// Wrap an existing `reqwest` client.
    pub fn from_client(client: reqwest::Client) -> Self {
        ReqwestTransport { client }
    }
}

/// Check that every file part carries a usable media type.
///
/// Runs before any attempt so a bad form is reported once instead of failing every send.
pub(crate) fn check_form(form: &MultipartForm) -> std::result::Result<(), ErrorCause> {
    for part in form.parts() {
        if let FormPart::File { mime: Some(mime), .. } = part {
            Part::bytes(Vec::new()).mime_str(mime)?;
        }
    }
    Ok(())
}

fn to_form(form: &MultipartForm) -> std::result::Result<Form, reqwest::Error> {
    let mut out = Form::new();
    for part in form.parts() {
        out = match part {
            FormPart::Text { name, value } => out.text(name.clone(), value.clone()),
            FormPart::File {
                name,
                file_name,
                mime,
                bytes,
            } => {
                let mut file = Part::bytes(bytes.to_vec()).file_name(file_name.clone());
                if let Some(mime) = mime {
                    file = file.mime_str(mime)?;
                }
                out.part(name.clone(), file)
            }
        };
    }
    Ok(out)
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> std::result::Result<TransportResponse, ErrorCause> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);

        builder = match request.body {
            Some(TransportBody::Bytes(bytes)) => builder.body(bytes),
            Some(TransportBody::Multipart(form)) => builder.multipart(to_form(&form)?),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = header_map_to_btree(response.headers());
        let body = response.bytes().await?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}
