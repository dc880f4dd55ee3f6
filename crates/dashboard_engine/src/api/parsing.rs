use dashboard_core::{Ack, ParsingStatus, SessionId, SessionProgress, StartParsingRequest};
use reqwest::Method;

use crate::client::ApiClient;
use crate::error::ApiError;

pub struct ParsingApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ParsingApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn start(&self, request: &StartParsingRequest) -> Result<Ack, ApiError> {
        self.client
            .ack(Method::POST, "/parsing/start", &[], Some(request))
            .await
    }

    pub async fn stop(&self) -> Result<Ack, ApiError> {
        self.client
            .ack::<()>(Method::POST, "/parsing/stop", &[], None)
            .await
    }

    pub async fn status(&self) -> Result<ParsingStatus, ApiError> {
        self.client.get("/parsing/status", &[]).await
    }

    pub async fn progress(&self, session_id: SessionId) -> Result<SessionProgress, ApiError> {
        self.client
            .get(&format!("/parsing/progress/{session_id}"), &[])
            .await
    }

    /// Drop every queued task on the worker broker.
    pub async fn purge_queue(&self) -> Result<Ack, ApiError> {
        self.client
            .ack::<()>(Method::POST, "/parsing/queue/purge", &[], None)
            .await
    }

    /// Re-derive the session state from the database after a purge.
    pub async fn resync_state(&self) -> Result<Ack, ApiError> {
        self.client
            .ack::<()>(Method::POST, "/parsing/sync-state", &[], None)
            .await
    }
}
