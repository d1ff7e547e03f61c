//! Invoice backend HTTP client.
//!
//! This module provides the request pipeline behind [`ApiClient`], enabling callers to:
//!
//! - **Resolve endpoints** against one configured base URL with typed query parameters
//! - **Intercept** requests and responses with best-effort, disposable hooks
//! - **Automatically retry** network, timeout, rate-limit, and server failures with
//!   exponential backoff
//! - **Decode** bodies by content type or an explicit mode
//! - **Track loading state** across every in-flight call
//!
//! # Module Organization
//!
//! ```text
//! client/
//! ├── fetch        - ApiClient and the attempt loop
//! ├── context      - base URL normalization, target URL and RequestContext construction
//! ├── interceptors - handle-keyed registry and the request/response chains
//! ├── retry        - RetryPolicy
//! ├── decode       - response body decoding
//! ├── normalize    - failure to ApiError conversion
//! ├── loading      - LoadingTracker and its RAII guard
//! ├── transport    - Transport trait and the reqwest implementation
//! ├── config       - Client configuration
//! └── utils        - Utility functions
//! ```
//!
//! # Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ApiClient`] | Main client facade |
//! | [`ClientConfig`] | Client configuration options |
//! | [`RetryPolicy`] | Retry classification and backoff |
//! | [`Registry`] | Ordered, handle-keyed interceptor and listener storage |
//! | [`LoadingTracker`] | In-flight call counter with listeners |
//! | [`Transport`] | One HTTP exchange; [`ReqwestTransport`] by default |
//!
//! # Examples
//!
//! ## Creating a Client
//!
//! ```
//! use invoice_api::client::{ApiClient, ClientConfig};
//!
//! // Default configuration
//! let client = ApiClient::new(ClientConfig::default()).unwrap();
//!
//! // Custom configuration
//! let config = ClientConfig {
//!     max_retries: 5,
//!     timeout_ms: 30_000,
//!     ..ClientConfig::default().with_base_url("https://billing.example.com/api")
//! };
//! let client = ApiClient::new(config).unwrap();
//! assert_eq!(client.base_url().as_str(), "https://billing.example.com/api/");
//! ```
//!
//! ## Utility Functions
//!
//! ```
//! use invoice_api::client::{exponential_backoff, is_retryable_status};
//! use std::time::Duration;
//!
//! // Check if status is retryable
//! assert!(is_retryable_status(503));
//! assert!(!is_retryable_status(404));
//!
//! // Calculate backoff delay
//! let delay = exponential_backoff(2, Duration::from_millis(250), Duration::from_secs(3));
//! assert_eq!(delay, Duration::from_millis(1000));
//! ```

mod config;
mod context;
mod decode;
mod fetch;
mod interceptors;
mod loading;
pub mod normalize;
mod retry;
mod transport;
mod utils;

pub use config::{ClientConfig, ENV_BASE_URL, ENV_LOCALE, ENV_MAX_RETRIES, ENV_TIMEOUT_MS};
pub use decode::{decode, infer_mode};
pub use fetch::ApiClient;
pub use interceptors::{
    Registration, Registry, RequestChain, RequestInterceptor, ResponseChain, ResponseInterceptor,
};
pub use loading::{LoadingGuard, LoadingListener, LoadingTracker};
pub use retry::RetryPolicy;
pub use transport::{ReqwestTransport, Transport, TransportBody, TransportRequest, TransportResponse};
pub use utils::*;
