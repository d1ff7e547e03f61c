//! Main API client implementation.
//!
//! Provides [`ApiClient`], the facade that runs every call through the pipeline:
//!
//! 1. Build the [`RequestContext`] (URL, headers, body, auth)
//! 2. Run request interceptors over it
//! 3. Mark the call as loading
//! 4. For each attempt: send under the per-attempt timeout; decode and run response
//!    interceptors on success; otherwise normalize the failure and either back off and retry
//!    or raise
//! 5. Clear the loading mark on every exit path, including a dropped future
//!
//! # Examples
//!
//! ## Simple GET request
//!
//! ```ignore
//! use invoice_api::{ApiClient, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new(ClientConfig::default())?;
//!     let clients = client.get("/clients/", [("search", "acme")]).await?;
//!     println!("{:?}", clients);
//!     Ok(())
//! }
//! ```
//!
//! ## Adding a header to every call
//!
//! ```ignore
//! use futures::FutureExt;
//! use invoice_api::RequestPatch;
//!
//! let registration = client.use_request(|_ctx| async {
//!     Ok(Some(RequestPatch::new().header("X-Client", "desktop")))
//! });
//! // ...
//! registration.dispose();
//! ```

use super::config::ClientConfig;
use super::context::{self, ContextDefaults};
use super::decode::decode;
use super::interceptors::{Registration, RequestChain, ResponseChain};
use super::loading::LoadingTracker;
use super::normalize;
use super::retry::RetryPolicy;
use super::transport::{
    check_form, ReqwestTransport, Transport, TransportBody, TransportRequest, TransportResponse,
};
use super::utils::is_success_status;
use crate::error::{ApiError, ErrorCause, Result};
use crate::protocol::{self, messages};
use crate::types::{
    Decoded, QueryParams, RequestBody, RequestContext, RequestOptions, RequestPatch, ResponseMeta,
};
use futures::FutureExt;
use http::Method;
use parking_lot::RwLock;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tokio::time::{sleep, timeout};
use url::Url;

/// The invoice backend client.
///
/// Cheap to clone; clones share the token, interceptors, and loading state.
///
/// # Features
///
/// - Relative endpoints resolved against one configured base URL
/// - Bearer token injection with per-call opt-out
/// - Request and response interceptors with soft-failure semantics
/// - Retry with exponential backoff for network, timeout, rate-limit, and server failures
/// - Content-type driven decoding
/// - Localized [`ApiError`] messages
/// - Aggregate loading state with listeners
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: ClientConfig,
    base_url: Url,
    transport: Arc<dyn Transport>,
    retry_policy: RetryPolicy,
    token: RwLock<Option<String>>,
    request_interceptors: RequestChain,
    response_interceptors: ResponseChain,
    loading: LoadingTracker,
}

/// Context plus its wire-ready headers and body, fixed for all attempts.
struct PreparedRequest {
    context: RequestContext,
    headers: http::HeaderMap,
    body: Option<TransportBody>,
}

impl PreparedRequest {
    fn new(context: RequestContext, locale: protocol::Locale) -> Result<Self> {
        let headers = protocol::to_header_map(&context.headers).map_err(|cause| {
            ApiError::configuration(messages::invalid_request(locale, &cause.to_string()), cause)
                .with_url(context.target_url.as_str())
        })?;

        let body = match &context.body {
            None => None,
            Some(RequestBody::Json(value)) => {
                let bytes = serde_json::to_vec(value).map_err(|e| {
                    ApiError::configuration(
                        messages::invalid_request(locale, "request body"),
                        ErrorCause::Json(e),
                    )
                })?;
                Some(TransportBody::Bytes(bytes.into()))
            }
            Some(RequestBody::Binary(bytes)) => Some(TransportBody::Bytes(bytes.clone())),
            Some(RequestBody::Multipart(form)) => {
                check_form(form).map_err(|cause| {
                    ApiError::configuration(messages::invalid_request(locale, "multipart form"), cause)
                        .with_url(context.target_url.as_str())
                })?;
                Some(TransportBody::Multipart(form.clone()))
            }
        };

        Ok(PreparedRequest {
            context,
            headers,
            body,
        })
    }

    fn to_transport(&self) -> TransportRequest {
        TransportRequest {
            method: self.context.method.clone(),
            url: self.context.target_url.clone(),
            headers: self.headers.clone(),
            body: self.body.clone(),
        }
    }
}

impl ApiClient {
    /// Create a client that talks HTTP through `reqwest`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the base URL or proxy is malformed.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client over a custom [`Transport`].
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the base URL is malformed.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let base_url = context::parse_base_url(&config.base_url, config.locale)?;
        let retry_policy = RetryPolicy::from_config(&config);

        Ok(ApiClient {
            inner: Arc::new(ClientInner {
                config,
                base_url,
                transport,
                retry_policy,
                token: RwLock::new(None),
                request_interceptors: RequestChain::new(),
                response_interceptors: ResponseChain::new(),
                loading: LoadingTracker::new(),
            }),
        })
    }

    /// Client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Normalized base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    // ========== Authentication ==========

    /// Set the bearer token sent with every call. An empty token clears it.
    pub fn set_token(&self, token: impl Into<String>) {
        let token = token.into();
        *self.inner.token.write() = (!token.is_empty()).then_some(token);
    }

    /// Stop sending a bearer token.
    pub fn clear_token(&self) {
        *self.inner.token.write() = None;
    }

    /// Current bearer token.
    pub fn token(&self) -> Option<String> {
        self.inner.token.read().clone()
    }

    // ========== Interceptors ==========

    /// Register a request interceptor.
    ///
    /// It receives a copy of the running context and may return a patch to merge into it.
    /// Errors and panics are logged and skipped.
    pub fn use_request<F, Fut>(&self, interceptor: F) -> Registration
    where
        F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Option<RequestPatch>>> + Send + 'static,
    {
        self.inner
            .request_interceptors
            .register(Arc::new(move |ctx| interceptor(ctx).boxed()))
    }

    /// Register a response interceptor.
    ///
    /// It receives the decoded body, the response metadata, and the final context, and may
    /// return a replacement body. Errors and panics are logged and skipped.
    pub fn use_response<F, Fut>(&self, interceptor: F) -> Registration
    where
        F: Fn(Decoded, ResponseMeta, RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Option<Decoded>>> + Send + 'static,
    {
        self.inner
            .response_interceptors
            .register(Arc::new(move |body, meta, ctx| interceptor(body, meta, ctx).boxed()))
    }

    // ========== Loading state ==========

    /// Register a loading-state listener, called with the busy flag on every call start and end.
    pub fn on_loading_change<F>(&self, listener: F) -> Registration
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.inner.loading.subscribe(listener)
    }

    /// Whether any call is in flight.
    pub fn is_loading(&self) -> bool {
        self.inner.loading.is_loading()
    }

    /// Number of calls in flight.
    pub fn loading_count(&self) -> usize {
        self.inner.loading.count()
    }

    // ========== Requests ==========

    /// Resolve an endpoint and parameters to the absolute target URL.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a malformed endpoint.
    pub fn build_url(&self, endpoint: &str, params: &QueryParams) -> Result<Url> {
        context::build_target_url(&self.inner.base_url, endpoint, params, self.inner.config.locale)
    }

    /// Run one call through the full pipeline.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] for a malformed request (before any I/O), or for the failure
    /// of the last attempt.
    pub async fn request(&self, endpoint: &str, options: RequestOptions) -> Result<Decoded> {
        let inner = &self.inner;
        let locale = inner.config.locale;

        let token = inner.token.read().clone();
        let context = context::build_context(
            endpoint,
            options,
            ContextDefaults {
                base: &inner.base_url,
                token: token.as_deref(),
                timeout: inner.config.timeout(),
                max_retries: inner.config.max_retries,
                locale,
            },
        )?;

        let context = inner.request_interceptors.run(context).await;
        let prepared = PreparedRequest::new(context, locale)?;

        let _loading = inner.loading.guard();
        self.execute(&prepared).await
    }

    /// Attempt loop.
    async fn execute(&self, prepared: &PreparedRequest) -> Result<Decoded> {
        let inner = &self.inner;
        let context = &prepared.context;
        let mut attempt: u32 = 0;

        loop {
            let outcome = timeout(context.timeout, inner.transport.send(prepared.to_transport())).await;

            let error = match outcome {
                Ok(Ok(response)) if is_success_status(response.status) => {
                    return Ok(self.finish(response, context).await);
                }
                Ok(Ok(response)) => normalize::from_status(
                    inner.config.locale,
                    response.status,
                    protocol::content_type(&response.headers),
                    &response.body,
                    &context.target_url,
                ),
                Ok(Err(cause)) => normalize::from_transport(inner.config.locale, cause, &context.target_url),
                Err(_) => normalize::from_timeout(inner.config.locale, context.timeout, &context.target_url),
            };

            match inner.retry_policy.next_delay(&error, attempt, context.max_retries) {
                Some(delay) => {
                    if inner.config.enable_logging {
                        tracing::warn!(
                            method = %context.method,
                            url = %context.target_url,
                            attempt = attempt + 1,
                            status = error.status(),
                            kind = %error.kind(),
                            ?delay,
                            "request failed, retrying"
                        );
                    }
                    sleep(delay).await;
                    attempt += 1;
                }
                None => {
                    if inner.config.enable_logging {
                        tracing::debug!(
                            method = %context.method,
                            url = %context.target_url,
                            attempts = attempt + 1,
                            status = error.status(),
                            kind = %error.kind(),
                            "request failed"
                        );
                    }
                    return Err(error);
                }
            }
        }
    }

    /// Decode a successful response and run response interceptors.
    async fn finish(&self, response: TransportResponse, context: &RequestContext) -> Decoded {
        let meta = ResponseMeta {
            status: response.status,
            headers: response.headers,
            url: context.target_url.clone(),
        };
        let decoded = decode(meta.status, meta.content_type(), response.body, context.parse_mode);
        self.inner
            .response_interceptors
            .run(decoded, &meta, context)
            .await
    }

    // ========== Verb wrappers ==========

    /// `GET` with query parameters.
    pub async fn get(&self, endpoint: &str, params: impl Into<QueryParams>) -> Result<Decoded> {
        self.get_with(endpoint, params, RequestOptions::new()).await
    }

    /// `GET` with query parameters and extra options.
    pub async fn get_with(
        &self,
        endpoint: &str,
        params: impl Into<QueryParams>,
        options: RequestOptions,
    ) -> Result<Decoded> {
        self.request(endpoint, options.method(Method::GET).params(params))
            .await
    }

    /// `POST` with a body. A JSON `null` body sends nothing.
    pub async fn post(&self, endpoint: &str, body: impl Into<RequestBody>) -> Result<Decoded> {
        self.post_with(endpoint, body, RequestOptions::new()).await
    }

    /// `POST` with a body and extra options.
    pub async fn post_with(
        &self,
        endpoint: &str,
        body: impl Into<RequestBody>,
        options: RequestOptions,
    ) -> Result<Decoded> {
        self.request(endpoint, options.method(Method::POST).body(body))
            .await
    }

    /// `PUT` with a body.
    pub async fn put(&self, endpoint: &str, body: impl Into<RequestBody>) -> Result<Decoded> {
        self.put_with(endpoint, body, RequestOptions::new()).await
    }

    /// `PUT` with a body and extra options.
    pub async fn put_with(
        &self,
        endpoint: &str,
        body: impl Into<RequestBody>,
        options: RequestOptions,
    ) -> Result<Decoded> {
        self.request(endpoint, options.method(Method::PUT).body(body))
            .await
    }

    /// `PATCH` with a body.
    pub async fn patch(&self, endpoint: &str, body: impl Into<RequestBody>) -> Result<Decoded> {
        self.patch_with(endpoint, body, RequestOptions::new()).await
    }

    /// `PATCH` with a body and extra options.
    pub async fn patch_with(
        &self,
        endpoint: &str,
        body: impl Into<RequestBody>,
        options: RequestOptions,
    ) -> Result<Decoded> {
        self.request(endpoint, options.method(Method::PATCH).body(body))
            .await
    }

    /// `DELETE` with query parameters.
    pub async fn delete(&self, endpoint: &str, params: impl Into<QueryParams>) -> Result<Decoded> {
        self.delete_with(endpoint, params, RequestOptions::new()).await
    }

    /// `DELETE` with query parameters and extra options.
    pub async fn delete_with(
        &self,
        endpoint: &str,
        params: impl Into<QueryParams>,
        options: RequestOptions,
    ) -> Result<Decoded> {
        self.request(endpoint, options.method(Method::DELETE).params(params))
            .await
    }

    /// Serialize `data` and `POST` it.
    pub(crate) async fn post_json<T: Serialize + ?Sized>(&self, endpoint: &str, data: &T) -> Result<Decoded> {
        self.post(endpoint, RequestBody::json_in(data, self.inner.config.locale)?).await
    }

    /// Serialize `data` and `PUT` it.
    pub(crate) async fn put_json<T: Serialize + ?Sized>(&self, endpoint: &str, data: &T) -> Result<Decoded> {
        self.put(endpoint, RequestBody::json_in(data, self.inner.config.locale)?).await
    }

    /// Serialize `data` and `PATCH` it.
    pub(crate) async fn patch_json<T: Serialize + ?Sized>(&self, endpoint: &str, data: &T) -> Result<Decoded> {
        self.patch(endpoint, RequestBody::json_in(data, self.inner.config.locale)?).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("has_token", &self.inner.token.read().is_some())
            .field("loading", &self.inner.loading.count())
            .finish()
    }
}
