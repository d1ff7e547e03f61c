#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # invoice_api: HTTP client for the invoicing backend
//!
//! This crate is the single gateway between an invoicing front end and its REST backend.
//! Every call goes through one pipeline that handles URL resolution, authentication,
//! interceptors, retries, decoding, error localization, and loading state.
//!
//! ## Overview
//!
//! A call moves through these stages:
//!
//! 1. **Context** - the endpoint is resolved against the base URL, parameters are encoded,
//!    headers and body are set, and the bearer token is attached
//! 2. **Request interceptors** - registered hooks may patch the context
//! 3. **Attempts** - each attempt runs under its own timeout; retryable failures back off
//!    exponentially up to the configured retry count
//! 4. **Decoding** - the success body is decoded by content type or an explicit mode
//! 5. **Response interceptors** - registered hooks may replace the decoded body
//!
//! Failures surface as [`ApiError`] with a kind, an HTTP status (`0` when no response
//! arrived), and a message localized to Lithuanian or English.
//!
//! ## Key Features
//!
//! - **Typed options**: [`RequestOptions`] with builder methods and sensible defaults
//! - **Retry classification**: network, `408`, `429`, and `5xx` failures are retried;
//!   everything else is terminal
//! - **Lenient decoding**: `204` and unparsable JSON success bodies decode to [`Decoded::Null`]
//! - **Disposable hooks**: every interceptor and listener registration returns a handle
//! - **Loading state**: an aggregate busy flag that stays balanced even when a call is dropped
//!
//! ## Client Usage
//!
//! ```ignore
//! use invoice_api::{ApiClient, ClientConfig, RequestOptions};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new(ClientConfig::from_env()?)?;
//!     client.set_token("eyJhbGciOi...");
//!
//!     // Route helpers
//!     let invoices = client.get_invoices([("status", "sent")]).await?;
//!
//!     // Raw requests with per-call options
//!     let report = client
//!         .request(
//!             "/reports/yearly",
//!             RequestOptions::new().retry(0).timeout(Duration::from_secs(60)),
//!         )
//!         .await?;
//!
//!     println!("{:?} {:?}", invoices, report);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - **[types]** - Request options, context, patches, bodies, and decoded responses
//! - **[error]** - Error types and result handling
//! - **[client]** - The client facade and its pipeline stages
//! - **[endpoints]** - Route helpers for clients, invoices, dashboard, and settings
//! - **[protocol]** - Header helpers, constants, and localized messages

pub mod client;
pub mod endpoints;
pub mod error;
pub mod protocol;
pub mod types;

pub use client::{ApiClient, ClientConfig};
pub use error::{ApiError, ConfigError, ErrorCause, ErrorKind, Result};
pub use protocol::Locale;
pub use types::{
    Decoded, FormPart, MultipartForm, ParamValue, ParseMode, QueryParams, RequestBody,
    RequestContext, RequestOptions, RequestPatch, ResponseMeta,
};
