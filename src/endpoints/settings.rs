//! Settings routes: company details, bank accounts, invoice series.

use crate::error::Result;
use crate::types::{Decoded, QueryParams};
use crate::ApiClient;
use serde::Serialize;
use std::fmt::Display;

impl ApiClient {
    /// Issuing company details.
    pub async fn get_company_info(&self) -> Result<Decoded> {
        self.get("/settings/company", QueryParams::new()).await
    }

    /// Replace the issuing company details.
    pub async fn update_company_info<T: Serialize + ?Sized>(&self, data: &T) -> Result<Decoded> {
        self.put_json("/settings/company", data).await
    }

    /// List bank accounts.
    pub async fn get_bank_accounts(&self) -> Result<Decoded> {
        self.get("/settings/bank-accounts", QueryParams::new()).await
    }

    /// Add a bank account.
    pub async fn create_bank_account<T: Serialize + ?Sized>(&self, data: &T) -> Result<Decoded> {
        self.post_json("/settings/bank-accounts", data).await
    }

    /// Replace a bank account.
    pub async fn update_bank_account<T: Serialize + ?Sized>(&self, id: impl Display, data: &T) -> Result<Decoded> {
        self.put_json(&format!("/settings/bank-accounts/{id}"), data)
            .await
    }

    /// Remove a bank account.
    pub async fn delete_bank_account(&self, id: impl Display) -> Result<Decoded> {
        self.delete(&format!("/settings/bank-accounts/{id}"), QueryParams::new())
            .await
    }

    /// List invoice series.
    pub async fn get_invoice_series(&self) -> Result<Decoded> {
        self.get("/settings/series", QueryParams::new()).await
    }

    /// Add an invoice series.
    pub async fn create_invoice_series<T: Serialize + ?Sized>(&self, data: &T) -> Result<Decoded> {
        self.post_json("/settings/series", data).await
    }

    /// Replace an invoice series.
    pub async fn update_invoice_series<T: Serialize + ?Sized>(&self, id: impl Display, data: &T) -> Result<Decoded> {
        self.put_json(&format!("/settings/series/{id}"), data).await
    }
}

#[cfg(test)]
mod tests {
    use crate::endpoints::test_support::client_for;
    use mockito::Matcher;
    use serde::Serialize;
    use serde_json::json;

    #[derive(Serialize)]
    struct Series<'a> {
        prefix: &'a str,
        next_number: u32,
    }

    #[tokio::test]
    async fn test_company_info_carries_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/settings/company")
            .match_header("authorization", "Bearer secret")
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "UAB Pavyzdys"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        client.set_token("secret");
        let info = client.get_company_info().await.unwrap();
        assert_eq!(info.as_json(), Some(&json!({"name": "UAB Pavyzdys"})));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_series_serializes_struct() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/api/settings/series/1")
            .match_body(Matcher::Json(json!({"prefix": "SF", "next_number": 42})))
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": 1}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        client
            .update_invoice_series(1, &Series { prefix: "SF", next_number: 42 })
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_bank_account() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/api/settings/bank-accounts/8")
            .with_status(204)
            .create_async()
            .await;

        let client = client_for(&server);
        assert!(client.delete_bank_account(8).await.unwrap().is_null());
        mock.assert_async().await;
    }
}
