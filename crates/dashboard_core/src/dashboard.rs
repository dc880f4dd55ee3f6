use chrono::{DateTime, Utc};

use crate::api::{ack, narrow, ApiCall, ApiReply, Purpose, Requests, Ticket};
use crate::effect::Effect;
use crate::model::{ParsingState, ParsingStatus, SessionId, SessionProgress, StartParsingRequest};
use crate::notice::Banner;
use crate::resource::{Failure, LoadState, Resource};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardPage {
    status: Resource<ParsingStatus>,
    progress: Resource<SessionProgress>,
    start_batch_size: String,
    force_refresh: bool,
    control_in_flight: bool,
    banner: Option<Banner>,
}

impl DashboardPage {
    pub(crate) fn mount(&mut self, requests: &mut Requests) -> Vec<Effect> {
        self.status = Resource::default();
        self.progress = Resource::default();
        self.poll(requests)
    }

    pub(crate) fn poll(&mut self, requests: &mut Requests) -> Vec<Effect> {
        let (seq, effect) = requests.issue(Purpose::DashboardStatus, ApiCall::ParsingStatus);
        self.status.begin(seq);
        vec![effect]
    }

    pub(crate) fn on_reply(
        &mut self,
        requests: &mut Requests,
        ticket: Ticket,
        result: Result<ApiReply, Failure>,
    ) -> Vec<Effect> {
        match ticket.purpose {
            Purpose::DashboardStatus => {
                let status = narrow(result, |reply| match reply {
                    ApiReply::ParsingStatus(status) => Some(status),
                    _ => None,
                });
                if !self.status.apply(ticket.seq, status) {
                    return Vec::new();
                }
                match self.status.data().and_then(|status| status.session_id) {
                    Some(session_id) => self.fetch_progress(requests, session_id),
                    None => Vec::new(),
                }
            }
            Purpose::DashboardProgress => {
                let progress = narrow(result, |reply| match reply {
                    ApiReply::Progress(progress) => Some(progress),
                    _ => None,
                });
                self.progress.apply(ticket.seq, progress);
                Vec::new()
            }
            Purpose::StartParsing | Purpose::StopParsing => {
                self.control_in_flight = false;
                let action = if ticket.purpose == Purpose::StartParsing {
                    "Start parsing"
                } else {
                    "Stop parsing"
                };
                match ack(result) {
                    Ok(ack) => {
                        let text = ack.message.unwrap_or_else(|| format!("{action}: done"));
                        self.banner = Some(Banner::success(text));
                        self.poll(requests)
                    }
                    Err(failure) => {
                        self.banner = Some(Banner::failed(action, &failure));
                        Vec::new()
                    }
                }
            }
            _ => Vec::new(),
        }
    }

    fn fetch_progress(&mut self, requests: &mut Requests, session_id: SessionId) -> Vec<Effect> {
        let (seq, effect) = requests.issue(
            Purpose::DashboardProgress,
            ApiCall::ParsingProgress(session_id),
        );
        self.progress.begin(seq);
        vec![effect]
    }

    pub(crate) fn set_batch_size(&mut self, raw: String) {
        self.start_batch_size = raw;
    }

    pub(crate) fn set_force_refresh(&mut self, force: bool) {
        self.force_refresh = force;
    }

    pub(crate) fn start(&mut self, requests: &mut Requests) -> Vec<Effect> {
        if self.control_in_flight {
            return Vec::new();
        }
        let batch_size = match parse_batch_size(&self.start_batch_size) {
            Ok(batch_size) => batch_size,
            Err(failure) => {
                self.banner = Some(Banner::error(failure.message));
                return Vec::new();
            }
        };
        self.control_in_flight = true;
        let request = StartParsingRequest {
            batch_size,
            force_refresh: self.force_refresh,
        };
        let (_, effect) = requests.issue(Purpose::StartParsing, ApiCall::StartParsing(request));
        vec![effect]
    }

    pub(crate) fn stop(&mut self, requests: &mut Requests) -> Vec<Effect> {
        if self.control_in_flight {
            return Vec::new();
        }
        if !self.is_running() {
            self.banner = Some(Banner::error("No parsing session is running"));
            return Vec::new();
        }
        self.control_in_flight = true;
        let (_, effect) = requests.issue(Purpose::StopParsing, ApiCall::StopParsing);
        vec![effect]
    }

    pub(crate) fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    fn is_running(&self) -> bool {
        self.status
            .data()
            .is_some_and(|status| status.status.is_running())
    }

    pub fn view(&self, now: Option<DateTime<Utc>>) -> DashboardView {
        let status = self.status.data().cloned().unwrap_or_default();
        // Progress is fresher than the status snapshot when it is for the same session.
        let progress = self
            .progress
            .data()
            .filter(|progress| {
                status.session_id.is_some()
                    && progress.session_id.is_none_or(|id| Some(id) == status.session_id)
            });
        let (total, processed, successful, failed) = match progress {
            Some(p) => (
                p.total_domains,
                p.processed_domains,
                p.successful_domains,
                p.failed_domains,
            ),
            None => (
                status.total_domains,
                status.processed_domains,
                status.successful_domains,
                status.failed_domains,
            ),
        };
        let domains_per_hour = match (status.started_at, now) {
            (Some(started_at), Some(now)) => throughput_per_hour(processed, started_at, now),
            _ => 0.0,
        };
        let running = status.status.is_running();
        DashboardView {
            load_state: self.status.state(),
            first_load: self.status.is_first_load(),
            error: self.status.error().map(ToString::to_string),
            is_empty: self.status.data().is_some()
                && status.session_id.is_none()
                && status.total_domains == 0,
            state: status.status,
            session_id: status.session_id,
            total,
            processed,
            successful,
            failed,
            progress_percent: progress_percent(processed, total),
            domains_per_hour,
            started_at: status.started_at,
            estimated_completion: status.estimated_completion,
            current_domain: progress.and_then(|p| p.current_domain.clone()),
            banner: self.banner.clone(),
            start_batch_size: self.start_batch_size.clone(),
            force_refresh: self.force_refresh,
            can_start: !self.control_in_flight && !running,
            can_stop: !self.control_in_flight && running,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub load_state: LoadState,
    pub first_load: bool,
    pub error: Option<String>,
    pub is_empty: bool,
    pub state: ParsingState,
    pub session_id: Option<SessionId>,
    pub total: u64,
    pub processed: u64,
    pub successful: u64,
    pub failed: u64,
    pub progress_percent: f64,
    pub domains_per_hour: f64,
    pub started_at: Option<DateTime<Utc>>,
    pub estimated_completion: Option<DateTime<Utc>>,
    pub current_domain: Option<String>,
    pub banner: Option<Banner>,
    pub start_batch_size: String,
    pub force_refresh: bool,
    pub can_start: bool,
    pub can_stop: bool,
}

/// Processed share of the total in percent, 0 for an empty session.
pub fn progress_percent(processed: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (processed as f64 / total as f64 * 100.0).min(100.0)
}

/// Processed domains per elapsed hour; 0 until time has passed.
pub fn throughput_per_hour(processed: u64, started_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let elapsed_ms = (now - started_at).num_milliseconds();
    if elapsed_ms <= 0 {
        return 0.0;
    }
    let hours = elapsed_ms as f64 / 3_600_000.0;
    processed as f64 / hours
}

fn parse_batch_size(raw: &str) -> Result<Option<u32>, Failure> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<u32>() {
        Ok(0) | Err(_) => Err(Failure::validation(
            "Batch size must be a positive whole number",
        )),
        Ok(size) => Ok(Some(size)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn percent_handles_empty_and_overflowing_totals() {
        assert_eq!(progress_percent(0, 0), 0.0);
        assert_eq!(progress_percent(25, 100), 25.0);
        assert_eq!(progress_percent(120, 100), 100.0);
    }

    #[test]
    fn throughput_is_processed_over_elapsed_hours() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(throughput_per_hour(300, start, now), 150.0);
        assert_eq!(throughput_per_hour(300, start, start), 0.0);
        assert_eq!(throughput_per_hour(300, now, start), 0.0);
    }

    #[test]
    fn batch_size_is_optional_but_positive() {
        assert_eq!(parse_batch_size("  "), Ok(None));
        assert_eq!(parse_batch_size("250"), Ok(Some(250)));
        assert!(parse_batch_size("0").is_err());
        assert!(parse_batch_size("ten").is_err());
    }
}
