//! HTTP-level constants, header helpers, and the localized message table.
//!
//! # Module Structure
//!
//! - **constants** - header names, media types, and client defaults
//! - **headers** - header map conversion, content-type classification, bearer formatting
//! - **messages** - [`Locale`] and the status-to-message table used for [`ApiError`](crate::ApiError)

pub mod headers;
pub mod messages;

pub use headers::{
    content_type, format_bearer, header_map_to_btree, is_binary_media_type, is_json_media_type,
    to_header_map,
};
pub use messages::{friendly_message, status_message, Locale};

/// Protocol constants.
pub mod constants {
    /// Header names used by the client. All lowercase, as stored in [`RequestContext`](crate::RequestContext).
    pub mod headers {
        /// `Accept`
        pub const ACCEPT: &str = "accept";
        /// `Authorization`
        pub const AUTHORIZATION: &str = "authorization";
        /// `Content-Type`
        pub const CONTENT_TYPE: &str = "content-type";
    }

    /// Media types recognized by the response decoder.
    pub mod media_types {
        /// Default `Accept` value: JSON, plain text, and wildcard.
        pub const ACCEPT_DEFAULT: &str = "application/json, text/plain, */*";
        /// JSON
        pub const JSON: &str = "application/json";
        /// PDF
        pub const PDF: &str = "application/pdf";
        /// Generic binary; matched as a substring so `application/octet-stream` qualifies.
        pub const OCTET_STREAM: &str = "octet-stream";
    }

    /// Base URL used when none is configured.
    pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
    /// Per-attempt timeout in milliseconds.
    pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;
    /// Retries after the first attempt.
    pub const DEFAULT_MAX_RETRIES: u32 = 2;
    /// First backoff delay in milliseconds.
    pub const DEFAULT_BACKOFF_BASE_MS: u64 = 250;
    /// Upper bound on any backoff delay in milliseconds.
    pub const DEFAULT_BACKOFF_CEILING_MS: u64 = 3_000;
}
