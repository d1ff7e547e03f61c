//! Dashboard routes.

use crate::error::Result;
use crate::types::{Decoded, QueryParams};
use crate::ApiClient;

impl ApiClient {
    /// Totals for `year`, or for one month of it when `month` is set.
    pub async fn get_dashboard_statistics(&self, year: i32, month: Option<u32>) -> Result<Decoded> {
        let params = QueryParams::new().with("year", year).with("month", month);
        self.get("/dashboard/statistics", params).await
    }

    /// Per-month series for `year`.
    pub async fn get_monthly_data(&self, year: i32) -> Result<Decoded> {
        self.get("/dashboard/monthly-data", [("year", year)]).await
    }

    /// Latest invoice and client activity.
    pub async fn get_recent_activity(&self) -> Result<Decoded> {
        self.get("/dashboard/recent-activity", QueryParams::new())
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::endpoints::test_support::client_for;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_statistics_without_month_omits_it() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/dashboard/statistics")
            .match_query(Matcher::Exact("year=2024".into()))
            .with_header("content-type", "application/json")
            .with_body("{}")
            .create_async()
            .await;

        let client = client_for(&server);
        client.get_dashboard_statistics(2024, None).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_statistics_with_month() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/dashboard/statistics")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("year".into(), "2024".into()),
                Matcher::UrlEncoded("month".into(), "3".into()),
            ]))
            .with_header("content-type", "application/json")
            .with_body("{}")
            .create_async()
            .await;

        let client = client_for(&server);
        client.get_dashboard_statistics(2024, Some(3)).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_monthly_data() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/dashboard/monthly-data")
            .match_query(Matcher::UrlEncoded("year".into(), "2023".into()))
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let client = client_for(&server);
        let data = client.get_monthly_data(2023).await.unwrap();
        assert_eq!(data.as_json(), Some(&serde_json::json!([])));
        mock.assert_async().await;
    }
}
