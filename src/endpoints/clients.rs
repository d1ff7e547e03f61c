//! Client (customer) routes.

use crate::error::Result;
use crate::types::{Decoded, QueryParams};
use crate::ApiClient;
use serde::Serialize;
use std::fmt::Display;

impl ApiClient {
    /// List clients, filtered by `params` (`search`, `limit`, …).
    pub async fn get_clients(&self, params: impl Into<QueryParams>) -> Result<Decoded> {
        self.get("/clients/", params).await
    }

    /// Fetch one client.
    pub async fn get_client(&self, id: impl Display) -> Result<Decoded> {
        self.get(&format!("/clients/{id}"), QueryParams::new()).await
    }

    /// Create a client.
    pub async fn create_client<T: Serialize + ?Sized>(&self, data: &T) -> Result<Decoded> {
        self.post_json("/clients/", data).await
    }

    /// Replace a client's fields.
    pub async fn update_client<T: Serialize + ?Sized>(&self, id: impl Display, data: &T) -> Result<Decoded> {
        self.put_json(&format!("/clients/{id}"), data).await
    }

    /// Delete a client. Pass `[("hard", true)]` for a hard delete.
    pub async fn delete_client(&self, id: impl Display, params: impl Into<QueryParams>) -> Result<Decoded> {
        self.delete(&format!("/clients/{id}"), params).await
    }

    /// Invoices issued to a client.
    pub async fn get_client_invoices(&self, id: impl Display, params: impl Into<QueryParams>) -> Result<Decoded> {
        self.get(&format!("/clients/{id}/invoices"), params).await
    }

    /// Aggregated figures for a client.
    pub async fn get_client_statistics(&self, id: impl Display) -> Result<Decoded> {
        self.get(&format!("/clients/{id}/statistics"), QueryParams::new())
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::endpoints::test_support::client_for;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_with_search() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/clients/")
            .match_query(Matcher::UrlEncoded("search".into(), "acme".into()))
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id": 1, "name": "Acme"}]"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let clients = client.get_clients([("search", "acme")]).await.unwrap();
        assert_eq!(clients.as_json(), Some(&json!([{"id": 1, "name": "Acme"}])));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_sends_json() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/clients/")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"name": "Acme", "code": "123"})))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": 7}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let created = client
            .create_client(&json!({"name": "Acme", "code": "123"}))
            .await
            .unwrap();
        assert_eq!(created.as_json(), Some(&json!({"id": 7})));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_hard_delete() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/api/clients/7")
            .match_query(Matcher::UrlEncoded("hard".into(), "true".into()))
            .with_status(204)
            .create_async()
            .await;

        let client = client_for(&server);
        let deleted = client.delete_client(7, [("hard", true)]).await.unwrap();
        assert!(deleted.is_null());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_client_statistics_route() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/clients/3/statistics")
            .with_header("content-type", "application/json")
            .with_body(r#"{"total": 10}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let stats = client.get_client_statistics(3).await.unwrap();
        assert_eq!(stats.as_json(), Some(&json!({"total": 10})));
        mock.assert_async().await;
    }
}
