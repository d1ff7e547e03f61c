//! Typed adapters over the verb wrappers, one per backend route.
//!
//! Every method here is a thin shim: it formats the route, shapes parameters or body, and
//! delegates to [`ApiClient`](crate::ApiClient). Results are returned as [`Decoded`](crate::Decoded);
//! use [`Decoded::json`](crate::Decoded::json) to extract a typed value.
//!
//! | Module | Routes |
//! |--------|--------|
//! | [`clients`] | `/clients/…` |
//! | [`invoices`] | `/invoices/…` |
//! | [`dashboard`] | `/dashboard/…` |
//! | [`settings`] | `/settings/…` |

pub mod clients;
pub mod dashboard;
pub mod invoices;
pub mod settings;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::{ApiClient, ClientConfig};

    /// Client pointed at `{server}/api` with retries disabled.
    pub(crate) fn client_for(server: &mockito::ServerGuard) -> ApiClient {
        let config = ClientConfig {
            max_retries: 0,
            ..ClientConfig::default().with_base_url(format!("{}/api", server.url()))
        };
        ApiClient::new(config).unwrap()
    }
}
