//! Invoice routes.

use crate::error::Result;
use crate::types::{Decoded, ParseMode, QueryParams, RequestBody, RequestOptions};
use crate::ApiClient;
use serde::Serialize;
use serde_json::json;
use std::fmt::Display;

impl ApiClient {
    /// List invoices, filtered by `params`.
    pub async fn get_invoices(&self, params: impl Into<QueryParams>) -> Result<Decoded> {
        self.get("/invoices/", params).await
    }

    /// Fetch one invoice with its lines.
    pub async fn get_invoice(&self, id: impl Display) -> Result<Decoded> {
        self.get(&format!("/invoices/{id}"), QueryParams::new()).await
    }

    /// Create an invoice.
    pub async fn create_invoice<T: Serialize + ?Sized>(&self, data: &T) -> Result<Decoded> {
        self.post_json("/invoices/", data).await
    }

    /// Replace an invoice.
    pub async fn update_invoice<T: Serialize + ?Sized>(&self, id: impl Display, data: &T) -> Result<Decoded> {
        self.put_json(&format!("/invoices/{id}"), data).await
    }

    /// Delete an invoice.
    pub async fn delete_invoice(&self, id: impl Display) -> Result<Decoded> {
        self.delete(&format!("/invoices/{id}"), QueryParams::new())
            .await
    }

    /// Move an invoice to `status` (`draft`, `sent`, `paid`, …).
    pub async fn update_invoice_status(&self, id: impl Display, status: &str) -> Result<Decoded> {
        self.patch_json(&format!("/invoices/{id}/status"), &json!({ "status": status }))
            .await
    }

    /// Download the rendered PDF. Always decoded as [`Decoded::Blob`] (or `Null` on `204`).
    pub async fn get_invoice_pdf(&self, id: impl Display) -> Result<Decoded> {
        self.request(
            &format!("/invoices/{id}/pdf"),
            RequestOptions::new().parse_as(ParseMode::Blob),
        )
        .await
    }

    /// Copy an invoice into a new draft. Sends no body.
    pub async fn duplicate_invoice(&self, id: impl Display) -> Result<Decoded> {
        self.post(&format!("/invoices/{id}/duplicate"), RequestBody::Json(serde_json::Value::Null))
            .await
    }

    /// Next free number in an invoice series.
    pub async fn get_next_invoice_number(&self, series_id: impl Display) -> Result<Decoded> {
        self.get(&format!("/invoices/next-number/{series_id}"), QueryParams::new())
            .await
    }
}
