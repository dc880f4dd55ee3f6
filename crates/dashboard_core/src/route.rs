use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The five screens of the console, keyed by their URL path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Route {
    #[default]
    Dashboard,
    Configuration,
    Scheduler,
    Reports,
    Logs,
}

impl Route {
    pub const ALL: [Route; 5] = [
        Route::Dashboard,
        Route::Configuration,
        Route::Scheduler,
        Route::Reports,
        Route::Logs,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Route::Dashboard => "/",
            Route::Configuration => "/configuration",
            Route::Scheduler => "/scheduler",
            Route::Reports => "/reports",
            Route::Logs => "/logs",
        }
    }

    /// Unknown paths fall back to the dashboard.
    pub fn from_path(path: &str) -> Route {
        let trimmed = path.trim();
        let normalized = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };
        Route::ALL
            .into_iter()
            .find(|route| route.path() == normalized)
            .unwrap_or_default()
    }

    pub fn label(self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::Configuration => "Configuration",
            Route::Scheduler => "Scheduler",
            Route::Reports => "Reports",
            Route::Logs => "Logs",
        }
    }

    /// Polling cadence while the route is mounted; `None` means fetch-on-mount only.
    pub fn poll_interval(self) -> Option<Duration> {
        match self {
            Route::Dashboard => Some(Duration::from_secs(5)),
            Route::Scheduler => Some(Duration::from_secs(10)),
            Route::Logs => Some(Duration::from_secs(3)),
            Route::Configuration | Route::Reports => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Route;

    #[test]
    fn paths_round_trip_and_unknown_falls_back() {
        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()), route);
        }
        assert_eq!(Route::from_path("/logs/"), Route::Logs);
        assert_eq!(Route::from_path("/nope"), Route::Dashboard);
        assert_eq!(Route::from_path(""), Route::Dashboard);
    }
}
