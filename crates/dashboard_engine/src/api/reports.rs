use dashboard_core::{ExportFormat, ReportFilter, ReportPage, ReportSummary};

use crate::client::ApiClient;
use crate::error::ApiError;

pub struct ReportsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ReportsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, filter: &ReportFilter) -> Result<ReportPage, ApiError> {
        self.client.get("/reports", &filter.query_pairs()).await
    }

    pub async fn summary(&self, filter: &ReportFilter) -> Result<ReportSummary, ApiError> {
        self.client
            .get("/reports/summary", &filter.query_pairs())
            .await
    }

    /// The raw export file, CSV or JSON as produced by the backend.
    pub async fn export(
        &self,
        format: ExportFormat,
        filter: &ReportFilter,
    ) -> Result<Vec<u8>, ApiError> {
        let mut query = vec![("format", format.as_str().to_string())];
        query.extend(filter.query_pairs());
        self.client.download("/reports/export", &query).await
    }
}
