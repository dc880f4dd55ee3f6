use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{narrow, ApiCall, ApiReply, Purpose, Requests, Ticket};
use crate::effect::Effect;
use crate::model::{ExportFormat, ReportPage, ReportRow, ReportSummary};
use crate::notice::Banner;
use crate::resource::{Failure, LoadState, Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReportStatus {
    #[default]
    All,
    Success,
    Failed,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 3] = [ReportStatus::All, ReportStatus::Success, ReportStatus::Failed];

    pub fn label(self) -> &'static str {
        match self {
            ReportStatus::All => "All",
            ReportStatus::Success => "Success",
            ReportStatus::Failed => "Failed",
        }
    }

    fn query_value(self) -> Option<&'static str> {
        match self {
            ReportStatus::All => None,
            ReportStatus::Success => Some("success"),
            ReportStatus::Failed => Some("failed"),
        }
    }
}

/// Report filter; dates are `YYYY-MM-DD` as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportFilter {
    pub start_date: String,
    pub end_date: String,
    pub domain: String,
    pub status: ReportStatus,
}

impl ReportFilter {
    /// Query parameters; blank fields and the "all" status are left out.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        for (key, value) in [
            ("start_date", &self.start_date),
            ("end_date", &self.end_date),
            ("domain", &self.domain),
        ] {
            let value = value.trim();
            if !value.is_empty() {
                pairs.push((key, value.to_string()));
            }
        }
        if let Some(status) = self.status.query_value() {
            pairs.push(("status", status.to_string()));
        }
        pairs
    }

    /// Both dates are blank or a full `YYYY-MM-DD`. A half-typed date keeps
    /// the filter from being sent.
    pub fn dates_complete(&self) -> bool {
        [&self.start_date, &self.end_date].into_iter().all(|date| {
            let date = date.trim();
            date.is_empty() || NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportsPage {
    filter: ReportFilter,
    rows: Resource<ReportPage>,
    summary: Resource<ReportSummary>,
    exporting: Option<ExportFormat>,
    banner: Option<Banner>,
}

impl ReportsPage {
    pub(crate) fn mount(&mut self, requests: &mut Requests) -> Vec<Effect> {
        self.rows = Resource::default();
        self.summary = Resource::default();
        self.fetch(requests)
    }

    fn fetch(&mut self, requests: &mut Requests) -> Vec<Effect> {
        if !self.filter.dates_complete() {
            return Vec::new();
        }
        let (rows_seq, rows) = requests.issue(
            Purpose::ReportList,
            ApiCall::ListReports(self.filter.clone()),
        );
        self.rows.begin(rows_seq);
        let (summary_seq, summary) = requests.issue(
            Purpose::ReportSummary,
            ApiCall::ReportSummary(self.filter.clone()),
        );
        self.summary.begin(summary_seq);
        vec![rows, summary]
    }

    pub(crate) fn filter(&self) -> &ReportFilter {
        &self.filter
    }

    pub(crate) fn restore_filter(&mut self, filter: ReportFilter) {
        self.filter = filter;
    }

    pub(crate) fn change_filter(&mut self, requests: &mut Requests, filter: ReportFilter) -> Vec<Effect> {
        self.filter = filter;
        self.fetch(requests)
    }

    pub(crate) fn export(&mut self, requests: &mut Requests, format: ExportFormat) -> Vec<Effect> {
        if self.exporting.is_some() {
            return Vec::new();
        }
        if !self.filter.dates_complete() {
            self.banner = Some(Banner::error("Dates must be YYYY-MM-DD"));
            return Vec::new();
        }
        self.exporting = Some(format);
        let (_, effect) = requests.issue(
            Purpose::Export,
            ApiCall::ExportReports {
                format,
                filter: self.filter.clone(),
            },
        );
        vec![effect]
    }

    pub(crate) fn export_saved(&mut self, result: Result<PathBuf, Failure>) {
        self.exporting = None;
        self.banner = Some(match result {
            Ok(path) => Banner::success(format!("Export saved to {}", path.display())),
            Err(failure) => Banner::failed("Saving the export", &failure),
        });
    }

    pub(crate) fn on_reply(
        &mut self,
        ticket: Ticket,
        result: Result<ApiReply, Failure>,
        now: Option<DateTime<Utc>>,
    ) -> Vec<Effect> {
        match ticket.purpose {
            Purpose::ReportList => {
                let rows = narrow(result, |reply| match reply {
                    ApiReply::Reports(page) => Some(page),
                    _ => None,
                });
                self.rows.apply(ticket.seq, rows);
                Vec::new()
            }
            Purpose::ReportSummary => {
                let summary = narrow(result, |reply| match reply {
                    ApiReply::Summary(summary) => Some(summary),
                    _ => None,
                });
                self.summary.apply(ticket.seq, summary);
                Vec::new()
            }
            Purpose::Export => {
                let Some(format) = self.exporting else {
                    return Vec::new();
                };
                let bytes = narrow(result, |reply| match reply {
                    ApiReply::Export(bytes) => Some(bytes),
                    _ => None,
                });
                match bytes {
                    Ok(bytes) => vec![Effect::SaveExport {
                        format,
                        bytes,
                        timestamp_ms: now.map_or(0, |now| now.timestamp_millis()),
                    }],
                    Err(failure) => {
                        self.exporting = None;
                        self.banner = Some(Banner::failed("Export", &failure));
                        Vec::new()
                    }
                }
            }
            _ => Vec::new(),
        }
    }

    pub(crate) fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    pub fn view(&self) -> ReportsView {
        let page = self.rows.data();
        ReportsView {
            filter: self.filter.clone(),
            filter_pending: !self.filter.dates_complete(),
            load_state: self.rows.state(),
            error: self.rows.error().map(ToString::to_string),
            rows: page.map(|page| page.rows.clone()).unwrap_or_default(),
            total: page.map_or(0, |page| page.total),
            summary: self.summary.data().cloned(),
            summary_error: self.summary.error().map(ToString::to_string),
            exporting: self.exporting.is_some(),
            banner: self.banner.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportsView {
    pub filter: ReportFilter,
    /// A date is half-typed; the shown rows still belong to the last full filter.
    pub filter_pending: bool,
    pub load_state: LoadState,
    pub error: Option<String>,
    pub rows: Vec<ReportRow>,
    pub total: usize,
    pub summary: Option<ReportSummary>,
    pub summary_error: Option<String>,
    pub exporting: bool,
    pub banner: Option<Banner>,
}
