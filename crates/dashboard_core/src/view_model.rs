use crate::configuration::ConfigurationView;
use crate::dashboard::DashboardView;
use crate::logs::LogsView;
use crate::notice::PendingConfirm;
use crate::reports::ReportsView;
use crate::route::Route;
use crate::scheduler::SchedulerView;

/// Everything the shell needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct AppViewModel {
    pub route: Route,
    pub confirm: Option<PendingConfirm>,
    pub dashboard: DashboardView,
    pub configuration: ConfigurationView,
    pub scheduler: SchedulerView,
    pub reports: ReportsView,
    pub logs: LogsView,
    pub dirty: bool,
}
