use std::path::PathBuf;

use crate::api::{ApiReply, Ticket};
use crate::configuration::SettingsEdit;
use crate::logs::LogFilter;
use crate::model::ExportFormat;
use crate::reports::ReportFilter;
use crate::resource::{Failure, Now};
use crate::route::Route;
use crate::scheduler::JobFormEdit;
use crate::state::UiPreferences;

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User picked a route in the navigation bar (mounts the page).
    Navigate(Route),
    /// Clock tick; drives polling timers.
    Tick(Now),
    /// A backend call finished.
    ApiReplied {
        ticket: Ticket,
        result: Result<ApiReply, Failure>,
    },
    /// Restore persisted UI preferences at startup.
    RestorePreferences(UiPreferences),
    /// User accepted the pending confirmation prompt.
    ConfirmAccepted,
    /// User dismissed the pending confirmation prompt.
    ConfirmDismissed,
    /// User closed the banner on a page.
    BannerDismissed(Route),

    // Dashboard
    StartBatchSizeChanged(String),
    ForceRefreshToggled(bool),
    StartParsingClicked,
    StopParsingClicked,

    // Configuration
    SettingsEdited(SettingsEdit),
    SaveSettingsClicked,
    ResetSettingsClicked,
    TestSettingsClicked,
    DomainFilePathChanged(String),
    UploadDomainFileClicked,
    DomainFileLoaded {
        path: PathBuf,
        result: Result<String, Failure>,
    },
    FetchExternalDomainsClicked,
    ClearDomainsClicked,

    // Scheduler
    SchedulerToggleClicked,
    JobFormToggled,
    JobFormEdited(JobFormEdit),
    SubmitJobClicked,
    PauseJobClicked(String),
    ResumeJobClicked(String),
    DeleteJobClicked(String),
    ClearStuckSessionClicked,

    // Reports
    ReportFilterChanged(ReportFilter),
    ExportClicked(ExportFormat),
    ExportSaved(Result<PathBuf, Failure>),

    // Logs
    LogFilterChanged(LogFilter),
    AutoScrollToggled(bool),
    ClearLogsClicked,
}
