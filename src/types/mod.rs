//! Core request and response types.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`RequestOptions`] | Per-call options passed to [`ApiClient::request`](crate::ApiClient::request) |
//! | [`RequestContext`] | Resolved state of one call, seen by request interceptors |
//! | [`RequestPatch`] | Partial update returned by a request interceptor |
//! | [`RequestBody`] | JSON, binary, or multipart payload |
//! | [`QueryParams`] | Ordered query parameters |
//! | [`Decoded`] | Decoded response body |
//! | [`ResponseMeta`] | Status, headers, and URL of a response |

mod params;
mod request;
mod response;

pub use params::{ParamValue, QueryParams};
pub use request::{
    FormPart, MultipartForm, ParseMode, RequestBody, RequestContext, RequestOptions, RequestPatch,
};
pub use response::{Decoded, ResponseMeta};
