//! Backend operations as plain data, so the state machine can request them
//! without doing I/O.
use crate::model::{
    Ack, CreateJobRequest, Diagnostics, DomainList, ExportFormat, Job, LogPage, LogStats,
    ParsingStatus, ReportPage, ReportSummary, SchedulerStatus, SessionId, SessionProgress,
    Settings, StartParsingRequest, UploadOutcome,
};
use crate::effect::Effect;
use crate::reports::ReportFilter;
use crate::resource::{Failure, FailureKind, Seq};
use crate::route::Route;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    StartParsing(StartParsingRequest),
    StopParsing,
    ParsingStatus,
    ParsingProgress(SessionId),
    PurgeQueue,
    ResyncState,

    GetSettings,
    UpdateSettings(Settings),
    ResetSettings,
    TestSettings(Settings),
    UploadDomains(Vec<String>),
    GetDomains,
    ClearDomains,
    /// GET an arbitrary external URL serving a domain file.
    FetchExternalDomains { url: String },

    SchedulerStatus,
    StartScheduler,
    StopScheduler { wait: bool },
    CreateJob(CreateJobRequest),
    DeleteJob(String),
    PauseJob(String),
    ResumeJob(String),
    GetJob(String),
    SchedulerDiagnostics,

    ListReports(ReportFilter),
    ReportSummary(ReportFilter),
    ExportReports {
        format: ExportFormat,
        filter: ReportFilter,
    },

    GetLogs { limit: u32 },
    ClearLogs,
    LogStats,
}

impl ApiCall {
    /// Reads can be dropped when their page unmounts; writes never are.
    pub fn is_read(&self) -> bool {
        matches!(
            self,
            ApiCall::ParsingStatus
                | ApiCall::ParsingProgress(_)
                | ApiCall::GetSettings
                | ApiCall::GetDomains
                | ApiCall::FetchExternalDomains { .. }
                | ApiCall::SchedulerStatus
                | ApiCall::GetJob(_)
                | ApiCall::SchedulerDiagnostics
                | ApiCall::ListReports(_)
                | ApiCall::ReportSummary(_)
                | ApiCall::GetLogs { .. }
                | ApiCall::LogStats
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiReply {
    Ack(Ack),
    ParsingStatus(ParsingStatus),
    Progress(SessionProgress),
    Settings(Settings),
    Domains(DomainList),
    Uploaded(UploadOutcome),
    Scheduler(SchedulerStatus),
    Job(Job),
    Diagnostics(Diagnostics),
    Reports(ReportPage),
    Summary(ReportSummary),
    Export(Vec<u8>),
    Logs(LogPage),
    LogStats(LogStats),
}

/// What a reply is for; the same call can serve several purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Purpose {
    DashboardStatus,
    DashboardProgress,
    StartParsing,
    StopParsing,

    LoadSettings,
    SaveSettings,
    ResetSettings,
    TestSettings,
    LoadDomains,
    UploadDomains,
    ExternalDomains,
    ClearDomains,

    SchedulerStatus,
    SchedulerDiagnostics,
    UploadedDomainCount,
    ToggleScheduler,
    ResolveJobDomains,
    CreateJob,
    JobAction,
    PurgeQueue,
    ResyncState,

    ReportList,
    ReportSummary,
    Export,

    LogEntries,
    LogStats,
    ClearLogs,
}

impl Purpose {
    pub fn route(self) -> Route {
        match self {
            Purpose::DashboardStatus
            | Purpose::DashboardProgress
            | Purpose::StartParsing
            | Purpose::StopParsing => Route::Dashboard,
            Purpose::LoadSettings
            | Purpose::SaveSettings
            | Purpose::ResetSettings
            | Purpose::TestSettings
            | Purpose::LoadDomains
            | Purpose::UploadDomains
            | Purpose::ExternalDomains
            | Purpose::ClearDomains => Route::Configuration,
            Purpose::SchedulerStatus
            | Purpose::SchedulerDiagnostics
            | Purpose::UploadedDomainCount
            | Purpose::ToggleScheduler
            | Purpose::ResolveJobDomains
            | Purpose::CreateJob
            | Purpose::JobAction
            | Purpose::PurgeQueue
            | Purpose::ResyncState => Route::Scheduler,
            Purpose::ReportList | Purpose::ReportSummary | Purpose::Export => Route::Reports,
            Purpose::LogEntries | Purpose::LogStats | Purpose::ClearLogs => Route::Logs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub seq: Seq,
    pub purpose: Purpose,
}

/// Hands out sequence numbers. One counter for the whole app keeps tickets
/// unique across pages.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Requests {
    last_seq: Seq,
}

impl Requests {
    pub fn issue(&mut self, purpose: Purpose, call: ApiCall) -> (Seq, Effect) {
        self.last_seq += 1;
        let ticket = Ticket {
            seq: self.last_seq,
            purpose,
        };
        (ticket.seq, Effect::Api { ticket, call })
    }

    pub fn last_seq(&self) -> Seq {
        self.last_seq
    }
}

/// Narrow a reply to the variant a purpose expects.
pub(crate) fn narrow<T>(
    result: Result<ApiReply, Failure>,
    pick: impl FnOnce(ApiReply) -> Option<T>,
) -> Result<T, Failure> {
    let reply = result?;
    pick(reply).ok_or_else(|| Failure::new(FailureKind::Decode, "reply of the wrong kind"))
}

pub(crate) fn ack(result: Result<ApiReply, Failure>) -> Result<Ack, Failure> {
    narrow(result, |reply| match reply {
        ApiReply::Ack(ack) => Some(ack),
        _ => None,
    })
}
