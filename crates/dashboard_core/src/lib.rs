//! Dashboard core: canonical API schema, pure state machine and view models.
mod api;
mod configuration;
mod dashboard;
mod domains;
mod effect;
mod logs;
mod model;
mod msg;
mod notice;
mod reports;
mod resource;
mod route;
mod scheduler;
mod state;
mod update;
mod view_model;

pub use api::{ApiCall, ApiReply, Purpose, Requests, Ticket};
pub use configuration::{
    parse_port, ConfigurationView, SettingsEdit, SettingsForm, DOMAIN_PREVIEW_LEN,
};
pub use dashboard::{progress_percent, throughput_per_hour, DashboardView};
pub use domains::{parse_domain_payload, parse_manual_domains, validate_http_url, DomainFileError};
pub use effect::Effect;
pub use logs::{LogFilter, LogsView, LOG_FETCH_LIMIT, LOG_WINDOW};
pub use model::*;
pub use msg::Msg;
pub use notice::{Banner, ConfirmAction, PendingConfirm, Tone};
pub use reports::{ReportFilter, ReportStatus, ReportsView};
pub use resource::{Failure, FailureKind, LoadState, Now, PollTimer, Resource, Seq};
pub use route::Route;
pub use scheduler::{
    generated_job_id, DomainSource, JobDraft, JobForm, JobFormEdit, ResolvedSource,
    SchedulerView, CRON_PRESETS, DEFAULT_BATCH_SIZE, DEFAULT_CRON,
};
pub use state::{AppState, UiPreferences};
pub use update::update;
pub use view_model::AppViewModel;
