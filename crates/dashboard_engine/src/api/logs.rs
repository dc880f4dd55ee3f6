use dashboard_core::{Ack, LogPage, LogStats};
use reqwest::Method;

use crate::client::ApiClient;
use crate::error::ApiError;

pub struct LogsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> LogsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, limit: u32) -> Result<LogPage, ApiError> {
        self.client
            .get("/logs", &[("limit", limit.to_string())])
            .await
    }

    pub async fn clear(&self) -> Result<Ack, ApiError> {
        self.client
            .ack::<()>(Method::DELETE, "/logs", &[], None)
            .await
    }

    pub async fn stats(&self) -> Result<LogStats, ApiError> {
        self.client.get("/logs/stats", &[]).await
    }
}
