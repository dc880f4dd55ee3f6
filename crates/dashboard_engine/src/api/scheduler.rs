use dashboard_core::{Ack, CreateJobRequest, Diagnostics, Job, SchedulerStatus};
use reqwest::Method;
use url::Url;

use crate::client::ApiClient;
use crate::error::ApiError;

pub struct SchedulerApi<'a> {
    client: &'a ApiClient,
}

impl<'a> SchedulerApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn status(&self) -> Result<SchedulerStatus, ApiError> {
        self.client.get("/scheduler/status", &[]).await
    }

    pub async fn start(&self) -> Result<Ack, ApiError> {
        self.client
            .ack::<()>(Method::POST, "/scheduler/start", &[], None)
            .await
    }

    /// `wait` lets running jobs finish before the scheduler stops.
    pub async fn stop(&self, wait: bool) -> Result<Ack, ApiError> {
        self.client
            .ack::<()>(
                Method::POST,
                "/scheduler/stop",
                &[("wait", wait.to_string())],
                None,
            )
            .await
    }

    pub async fn create_job(&self, request: &CreateJobRequest) -> Result<Ack, ApiError> {
        self.client
            .ack(Method::POST, "/scheduler/jobs/cron", &[], Some(request))
            .await
    }

    pub async fn delete_job(&self, id: &str) -> Result<Ack, ApiError> {
        let url = self.job_url(id, None)?;
        self.client.ack_url::<()>(Method::DELETE, url, None).await
    }

    pub async fn pause_job(&self, id: &str) -> Result<Ack, ApiError> {
        let url = self.job_url(id, Some("pause"))?;
        self.client.ack_url::<()>(Method::POST, url, None).await
    }

    pub async fn resume_job(&self, id: &str) -> Result<Ack, ApiError> {
        let url = self.job_url(id, Some("resume"))?;
        self.client.ack_url::<()>(Method::POST, url, None).await
    }

    pub async fn job(&self, id: &str) -> Result<Job, ApiError> {
        let url = self.job_url(id, None)?;
        self.client.get_url(url).await
    }

    pub async fn diagnostics(&self) -> Result<Diagnostics, ApiError> {
        self.client.get("/scheduler/diagnostics", &[]).await
    }

    /// Job ids are user-typed; each one stays a single path segment.
    fn job_url(&self, id: &str, action: Option<&str>) -> Result<Url, ApiError> {
        let mut segments = vec![id];
        segments.extend(action);
        self.client.segment_endpoint("/scheduler/jobs", &segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ClientSettings;

    fn scheduler_url(id: &str, action: Option<&str>) -> String {
        let settings = ClientSettings::default().with_base_url("http://backend.test/api/v1");
        let client = ApiClient::new(settings).expect("client");
        client.scheduler().job_url(id, action).expect("url").to_string()
    }

    #[test]
    fn job_ids_stay_one_path_segment() {
        assert_eq!(
            scheduler_url("job_1", Some("pause")),
            "http://backend.test/api/v1/scheduler/jobs/job_1/pause"
        );
        assert_eq!(
            scheduler_url("nightly run", None),
            "http://backend.test/api/v1/scheduler/jobs/nightly%20run"
        );
        assert_eq!(
            scheduler_url("a/b", Some("resume")),
            "http://backend.test/api/v1/scheduler/jobs/a%2Fb/resume"
        );
    }
}
