mod common;

use dashboard_core::{
    update, ApiCall, AppState, LogFilter, LogLevel, Msg, ReportFilter, ReportStatus, Route,
    UiPreferences,
};
use pretty_assertions::assert_eq;

use common::{calls, init_logging};

#[test]
fn restored_preferences_mount_the_saved_route() {
    init_logging();
    let prefs = UiPreferences {
        route: Route::Reports,
        log_filter: LogFilter::Level(LogLevel::Warning),
        auto_scroll: false,
        report_filter: ReportFilter {
            status: ReportStatus::Failed,
            ..ReportFilter::default()
        },
    };
    let (mut state, effects) = update(AppState::new(), Msg::RestorePreferences(prefs.clone()));

    assert_eq!(state.route(), Route::Reports);
    assert_eq!(
        calls(&effects),
        vec![
            &ApiCall::ListReports(prefs.report_filter.clone()),
            &ApiCall::ReportSummary(prefs.report_filter.clone())
        ]
    );
    assert_eq!(state.preferences(), prefs);
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn preferences_follow_user_choices() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::Navigate(Route::Logs));
    let (state, _) = update(state, Msg::AutoScrollToggled(false));
    let (state, _) = update(state, Msg::LogFilterChanged(LogFilter::Level(LogLevel::Error)));

    let prefs = state.preferences();
    assert_eq!(prefs.route, Route::Logs);
    assert!(!prefs.auto_scroll);
    assert_eq!(prefs.log_filter, LogFilter::Level(LogLevel::Error));
}
