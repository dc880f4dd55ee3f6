use dashboard_core::{ApiCall, ApiReply};

use crate::client::ApiClient;
use crate::error::ApiError;

/// Executes one backend operation. The dispatcher only knows this trait, so
/// tests can swap the HTTP client for a scripted backend.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn execute(&self, call: &ApiCall) -> Result<ApiReply, ApiError>;
}

#[async_trait::async_trait]
impl Backend for ApiClient {
    async fn execute(&self, call: &ApiCall) -> Result<ApiReply, ApiError> {
        let reply = match call {
            ApiCall::StartParsing(request) => ApiReply::Ack(self.parsing().start(request).await?),
            ApiCall::StopParsing => ApiReply::Ack(self.parsing().stop().await?),
            ApiCall::ParsingStatus => ApiReply::ParsingStatus(self.parsing().status().await?),
            ApiCall::ParsingProgress(id) => ApiReply::Progress(self.parsing().progress(*id).await?),
            ApiCall::PurgeQueue => ApiReply::Ack(self.parsing().purge_queue().await?),
            ApiCall::ResyncState => ApiReply::Ack(self.parsing().resync_state().await?),

            ApiCall::GetSettings => ApiReply::Settings(self.config().get().await?),
            ApiCall::UpdateSettings(settings) => {
                ApiReply::Ack(self.config().update(settings).await?)
            }
            ApiCall::ResetSettings => ApiReply::Ack(self.config().reset().await?),
            ApiCall::TestSettings(settings) => ApiReply::Ack(self.config().test(settings).await?),
            ApiCall::UploadDomains(domains) => {
                ApiReply::Uploaded(self.config().upload_domains(domains).await?)
            }
            ApiCall::GetDomains => ApiReply::Domains(self.config().domains().await?),
            ApiCall::ClearDomains => ApiReply::Ack(self.config().clear_domains().await?),
            ApiCall::FetchExternalDomains { url } => {
                ApiReply::Domains(self.fetch_external_domains(url).await?)
            }

            ApiCall::SchedulerStatus => ApiReply::Scheduler(self.scheduler().status().await?),
            ApiCall::StartScheduler => ApiReply::Ack(self.scheduler().start().await?),
            ApiCall::StopScheduler { wait } => ApiReply::Ack(self.scheduler().stop(*wait).await?),
            ApiCall::CreateJob(request) => {
                ApiReply::Ack(self.scheduler().create_job(request).await?)
            }
            ApiCall::DeleteJob(id) => ApiReply::Ack(self.scheduler().delete_job(id).await?),
            ApiCall::PauseJob(id) => ApiReply::Ack(self.scheduler().pause_job(id).await?),
            ApiCall::ResumeJob(id) => ApiReply::Ack(self.scheduler().resume_job(id).await?),
            ApiCall::GetJob(id) => ApiReply::Job(self.scheduler().job(id).await?),
            ApiCall::SchedulerDiagnostics => {
                ApiReply::Diagnostics(self.scheduler().diagnostics().await?)
            }

            ApiCall::ListReports(filter) => ApiReply::Reports(self.reports().list(filter).await?),
            ApiCall::ReportSummary(filter) => {
                ApiReply::Summary(self.reports().summary(filter).await?)
            }
            ApiCall::ExportReports { format, filter } => {
                ApiReply::Export(self.reports().export(*format, filter).await?)
            }

            ApiCall::GetLogs { limit } => ApiReply::Logs(self.logs().list(*limit).await?),
            ApiCall::ClearLogs => ApiReply::Ack(self.logs().clear().await?),
            ApiCall::LogStats => ApiReply::LogStats(self.logs().stats().await?),
        };
        Ok(reply)
    }
}
