mod common;

use std::collections::BTreeMap;
use std::path::PathBuf;

use dashboard_core::{
    update, ApiCall, ApiReply, Effect, ExportFormat, LogEntry, LogFilter, LogLevel, LogPage,
    LogStats, Msg, ReportFilter, ReportStatus, Route, Tone,
};
use pretty_assertions::assert_eq;

use common::{calls, mounted, ok_ack, reply, ticket_for};

fn log(id: i64, level: LogLevel) -> LogEntry {
    LogEntry {
        id: Some(id),
        level,
        message: format!("message {id}"),
        timestamp: None,
        domain: None,
        extra: None,
    }
}

#[test]
fn filter_change_issues_one_list_and_one_summary_fetch() {
    let (state, effects, _) = mounted(Route::Reports);
    assert_eq!(
        calls(&effects),
        vec![
            &ApiCall::ListReports(ReportFilter::default()),
            &ApiCall::ReportSummary(ReportFilter::default())
        ]
    );

    let filter = ReportFilter {
        domain: "shop".to_string(),
        status: ReportStatus::Success,
        ..ReportFilter::default()
    };
    let (_state, effects) = update(state, Msg::ReportFilterChanged(filter.clone()));
    assert_eq!(
        calls(&effects),
        vec![
            &ApiCall::ListReports(filter.clone()),
            &ApiCall::ReportSummary(filter)
        ]
    );
}

#[test]
fn half_typed_dates_wait_until_they_parse() {
    let (state, _, _) = mounted(Route::Reports);
    let partial = ReportFilter {
        start_date: "2024-0".to_string(),
        ..ReportFilter::default()
    };
    let (state, effects) = update(state, Msg::ReportFilterChanged(partial.clone()));
    assert!(effects.is_empty());
    let view = state.view().reports;
    assert_eq!(view.filter, partial);
    assert!(view.filter_pending);

    let (state, effects) = update(state, Msg::ExportClicked(ExportFormat::Csv));
    assert!(effects.is_empty());
    assert_eq!(
        state.view().reports.banner.map(|b| b.tone),
        Some(Tone::Error)
    );

    let full = ReportFilter {
        start_date: "2024-05-01".to_string(),
        ..ReportFilter::default()
    };
    let (state, effects) = update(state, Msg::ReportFilterChanged(full.clone()));
    assert_eq!(
        calls(&effects),
        vec![
            &ApiCall::ListReports(full.clone()),
            &ApiCall::ReportSummary(full)
        ]
    );
    assert!(!state.view().reports.filter_pending);
}

#[test]
fn export_saves_the_blob_with_the_clock_timestamp() {
    let (state, _, now) = mounted(Route::Reports);
    let (state, effects) = update(state, Msg::ExportClicked(ExportFormat::Csv));
    assert_eq!(
        calls(&effects),
        vec![&ApiCall::ExportReports {
            format: ExportFormat::Csv,
            filter: ReportFilter::default(),
        }]
    );
    assert!(state.view().reports.exporting);

    // Exports do not stack.
    let (state, again) = update(state, Msg::ExportClicked(ExportFormat::Json));
    assert!(again.is_empty());

    let ticket = ticket_for(&effects, |call| matches!(call, ApiCall::ExportReports { .. }));
    let (state, effects) = reply(state, ticket, Ok(ApiReply::Export(b"domain\n".to_vec())));
    assert_eq!(
        effects,
        vec![Effect::SaveExport {
            format: ExportFormat::Csv,
            bytes: b"domain\n".to_vec(),
            timestamp_ms: now.utc.timestamp_millis(),
        }]
    );

    let (state, _) = update(
        state,
        Msg::ExportSaved(Ok(PathBuf::from("exports/reports-1.csv"))),
    );
    let view = state.view().reports;
    assert!(!view.exporting);
    assert_eq!(view.banner.map(|b| b.tone), Some(Tone::Success));
}

#[test]
fn logs_are_shown_oldest_first_and_filtered_locally() {
    let (state, effects, _) = mounted(Route::Logs);
    assert_eq!(
        calls(&effects),
        vec![&ApiCall::GetLogs { limit: 100 }, &ApiCall::LogStats]
    );
    let ticket = ticket_for(&effects, |call| matches!(call, ApiCall::GetLogs { .. }));
    let page = LogPage {
        count: 3,
        logs: vec![
            log(3, LogLevel::Error),
            log(2, LogLevel::Info),
            log(1, LogLevel::Error),
        ],
    };
    let (state, _) = reply(state, ticket, Ok(ApiReply::Logs(page)));
    let ids: Vec<_> = state.view().logs.entries.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![Some(1), Some(2), Some(3)]);

    let (state, effects) = update(state, Msg::LogFilterChanged(LogFilter::Level(LogLevel::Error)));
    assert!(effects.is_empty());
    let ids: Vec<_> = state.view().logs.entries.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![Some(1), Some(3)]);
}

#[test]
fn auto_scroll_toggle_never_hits_the_network() {
    let (state, _, _) = mounted(Route::Logs);
    let (state, effects) = update(state, Msg::AutoScrollToggled(false));
    assert!(effects.is_empty());
    assert!(!state.view().logs.auto_scroll);
    let (_state, effects) = update(state, Msg::AutoScrollToggled(true));
    assert!(effects.is_empty());
}

#[test]
fn clearing_logs_zeroes_counts_and_refetches_stats() {
    let (state, effects, _) = mounted(Route::Logs);
    let stats_ticket = ticket_for(&effects, |call| call == &ApiCall::LogStats);
    let stats = LogStats {
        total: 12,
        by_level: BTreeMap::from([("INFO".to_string(), 10), ("ERROR".to_string(), 2)]),
    };
    let (state, _) = reply(state, stats_ticket, Ok(ApiReply::LogStats(stats)));

    let (state, effects) = update(state, Msg::ClearLogsClicked);
    assert!(effects.is_empty());
    let (state, effects) = update(state, Msg::ConfirmAccepted);
    assert_eq!(calls(&effects), vec![&ApiCall::ClearLogs]);

    let clear = ticket_for(&effects, |call| call == &ApiCall::ClearLogs);
    let (state, effects) = reply(state, clear, ok_ack());
    assert_eq!(calls(&effects), vec![&ApiCall::LogStats]);
    let view = state.view().logs;
    assert!(view.entries.is_empty());
    assert_eq!(view.stats.as_ref().map(|s| s.total), Some(0));

    let refetch = ticket_for(&effects, |call| call == &ApiCall::LogStats);
    let (state, _) = reply(state, refetch, Ok(ApiReply::LogStats(LogStats::zeroed())));
    let stats = state.view().logs.stats.expect("stats");
    for level in LogLevel::KNOWN {
        assert_eq!(stats.count(level), 0);
    }
}
