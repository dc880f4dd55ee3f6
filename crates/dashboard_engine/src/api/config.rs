use dashboard_core::{Ack, DomainList, Settings, UploadOutcome};
use reqwest::Method;
use serde::Serialize;

use crate::client::ApiClient;
use crate::error::ApiError;

pub struct ConfigApi<'a> {
    client: &'a ApiClient,
}

#[derive(Serialize)]
struct DomainUpload<'a> {
    domains: &'a [String],
}

impl<'a> ConfigApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get(&self) -> Result<Settings, ApiError> {
        self.client.get("/config", &[]).await
    }

    pub async fn update(&self, settings: &Settings) -> Result<Ack, ApiError> {
        self.client
            .ack(Method::PUT, "/config", &[], Some(settings))
            .await
    }

    pub async fn reset(&self) -> Result<Ack, ApiError> {
        self.client
            .ack::<()>(Method::POST, "/config/reset", &[], None)
            .await
    }

    pub async fn test(&self, settings: &Settings) -> Result<Ack, ApiError> {
        self.client
            .ack(Method::POST, "/config/test", &[], Some(settings))
            .await
    }

    pub async fn upload_domains(&self, domains: &[String]) -> Result<UploadOutcome, ApiError> {
        self.client
            .send_json(
                Method::POST,
                "/config/domains/upload",
                &[],
                Some(&DomainUpload { domains }),
            )
            .await
    }

    pub async fn domains(&self) -> Result<DomainList, ApiError> {
        self.client.get("/config/domains", &[]).await
    }

    pub async fn clear_domains(&self) -> Result<Ack, ApiError> {
        self.client
            .ack::<()>(Method::DELETE, "/config/domains", &[], None)
            .await
    }
}
