use serde::{Deserialize, Serialize};

use crate::api::Requests;
use crate::configuration::ConfigurationPage;
use crate::dashboard::DashboardPage;
use crate::logs::{LogFilter, LogsPage};
use crate::notice::PendingConfirm;
use crate::reports::{ReportFilter, ReportsPage};
use crate::resource::{Now, PollTimer};
use crate::route::Route;
use crate::scheduler::SchedulerPage;
use crate::view_model::AppViewModel;

/// UI choices that survive a restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiPreferences {
    pub route: Route,
    pub log_filter: LogFilter,
    pub auto_scroll: bool,
    pub report_filter: ReportFilter,
}

impl Default for UiPreferences {
    fn default() -> Self {
        Self {
            route: Route::Dashboard,
            log_filter: LogFilter::All,
            auto_scroll: true,
            report_filter: ReportFilter::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub(crate) route: Route,
    pub(crate) mounted: bool,
    pub(crate) requests: Requests,
    pub(crate) clock: Option<Now>,
    pub(crate) poll: Option<PollTimer>,
    pub(crate) confirm: Option<PendingConfirm>,
    pub(crate) dashboard: DashboardPage,
    pub(crate) configuration: ConfigurationPage,
    pub(crate) scheduler: SchedulerPage,
    pub(crate) reports: ReportsPage,
    pub(crate) logs: LogsPage,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(&self) -> Route {
        self.route
    }

    /// True once a route has been mounted; before that nothing polls.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_polling(&self) -> bool {
        self.poll.is_some_and(|timer| timer.is_armed())
    }

    pub fn preferences(&self) -> UiPreferences {
        UiPreferences {
            route: self.route,
            log_filter: self.logs.filter(),
            auto_scroll: self.logs.auto_scroll(),
            report_filter: self.reports.filter().clone(),
        }
    }

    pub fn view(&self) -> AppViewModel {
        let now = self.clock.map(|now| now.utc);
        AppViewModel {
            route: self.route,
            confirm: self.confirm.clone(),
            dashboard: self.dashboard.view(now),
            configuration: self.configuration.view(),
            scheduler: self.scheduler.view(),
            reports: self.reports.view(),
            logs: self.logs.view(),
            dirty: self.dirty,
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
