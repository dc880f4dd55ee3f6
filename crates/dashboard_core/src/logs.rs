use serde::{Deserialize, Serialize};

use crate::api::{ack, narrow, ApiCall, ApiReply, Purpose, Requests, Ticket};
use crate::effect::Effect;
use crate::model::{LogEntry, LogLevel, LogStats};
use crate::notice::Banner;
use crate::resource::{Failure, LoadState, Resource};

/// Entries kept on screen.
pub const LOG_WINDOW: usize = 100;
/// Entries requested per poll.
pub const LOG_FETCH_LIMIT: u32 = 100;

/// Client-side level filter; changing it never refetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LogFilter {
    #[default]
    All,
    Level(LogLevel),
}

impl LogFilter {
    pub fn matches(self, entry: &LogEntry) -> bool {
        match self {
            LogFilter::All => true,
            LogFilter::Level(level) => entry.level == level,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LogFilter::All => "All",
            LogFilter::Level(level) => level.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogsPage {
    /// Oldest first.
    entries: Resource<Vec<LogEntry>>,
    stats: Resource<LogStats>,
    filter: LogFilter,
    auto_scroll: bool,
    clearing: bool,
    banner: Option<Banner>,
}

impl Default for LogsPage {
    fn default() -> Self {
        Self {
            entries: Resource::default(),
            stats: Resource::default(),
            filter: LogFilter::All,
            auto_scroll: true,
            clearing: false,
            banner: None,
        }
    }
}

impl LogsPage {
    pub(crate) fn mount(&mut self, requests: &mut Requests) -> Vec<Effect> {
        self.entries = Resource::default();
        self.stats = Resource::default();
        self.poll(requests)
    }

    pub(crate) fn poll(&mut self, requests: &mut Requests) -> Vec<Effect> {
        let (entries_seq, entries) = requests.issue(
            Purpose::LogEntries,
            ApiCall::GetLogs {
                limit: LOG_FETCH_LIMIT,
            },
        );
        self.entries.begin(entries_seq);
        let mut effects = vec![entries];
        effects.extend(self.fetch_stats(requests));
        effects
    }

    fn fetch_stats(&mut self, requests: &mut Requests) -> Vec<Effect> {
        let (seq, effect) = requests.issue(Purpose::LogStats, ApiCall::LogStats);
        self.stats.begin(seq);
        vec![effect]
    }

    pub(crate) fn filter(&self) -> LogFilter {
        self.filter
    }

    pub(crate) fn set_filter(&mut self, filter: LogFilter) {
        self.filter = filter;
    }

    pub(crate) fn auto_scroll(&self) -> bool {
        self.auto_scroll
    }

    pub(crate) fn set_auto_scroll(&mut self, enabled: bool) {
        self.auto_scroll = enabled;
    }

    /// Runs after the clear confirmation was accepted.
    pub(crate) fn clear(&mut self, requests: &mut Requests) -> Vec<Effect> {
        if self.clearing {
            return Vec::new();
        }
        self.clearing = true;
        let (_, effect) = requests.issue(Purpose::ClearLogs, ApiCall::ClearLogs);
        vec![effect]
    }

    pub(crate) fn on_reply(
        &mut self,
        requests: &mut Requests,
        ticket: Ticket,
        result: Result<ApiReply, Failure>,
    ) -> Vec<Effect> {
        match ticket.purpose {
            Purpose::LogEntries => {
                let entries = narrow(result, |reply| match reply {
                    ApiReply::Logs(page) => Some(window(page.logs)),
                    _ => None,
                });
                self.entries.apply(ticket.seq, entries);
                Vec::new()
            }
            Purpose::LogStats => {
                let stats = narrow(result, |reply| match reply {
                    ApiReply::LogStats(stats) => Some(stats),
                    _ => None,
                });
                self.stats.apply(ticket.seq, stats);
                Vec::new()
            }
            Purpose::ClearLogs => {
                self.clearing = false;
                match ack(result) {
                    Ok(_) => {
                        self.entries.replace(ticket.seq, Vec::new());
                        self.stats.replace(ticket.seq, LogStats::zeroed());
                        self.banner = Some(Banner::success("Logs cleared"));
                        self.fetch_stats(requests)
                    }
                    Err(failure) => {
                        self.banner = Some(Banner::failed("Clearing logs", &failure));
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

    pub fn view(&self) -> LogsView {
        let entries: Vec<LogEntry> = self
            .entries
            .data()
            .map(|entries| {
                entries
                    .iter()
                    .filter(|entry| self.filter.matches(entry))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        LogsView {
            load_state: self.entries.state(),
            error: self.entries.error().map(ToString::to_string),
            entries,
            stats: self.stats.data().cloned(),
            filter: self.filter,
            auto_scroll: self.auto_scroll,
            clearing: self.clearing,
            banner: self.banner.clone(),
        }
    }
}

/// Newest-first server order to an oldest-first window of the latest entries.
fn window(mut newest_first: Vec<LogEntry>) -> Vec<LogEntry> {
    newest_first.truncate(LOG_WINDOW);
    newest_first.reverse();
    newest_first
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogsView {
    pub load_state: LoadState,
    pub error: Option<String>,
    pub entries: Vec<LogEntry>,
    pub stats: Option<LogStats>,
    pub filter: LogFilter,
    pub auto_scroll: bool,
    pub clearing: bool,
    pub banner: Option<Banner>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64) -> LogEntry {
        LogEntry {
            id: Some(id),
            level: LogLevel::Info,
            message: format!("entry {id}"),
            timestamp: None,
            domain: None,
            extra: None,
        }
    }

    #[test]
    fn window_keeps_latest_entries_oldest_first() {
        let newest_first: Vec<LogEntry> = (1..=150).rev().map(entry).collect();
        let shown = window(newest_first);
        assert_eq!(shown.len(), LOG_WINDOW);
        assert_eq!(shown.first().and_then(|e| e.id), Some(51));
        assert_eq!(shown.last().and_then(|e| e.id), Some(150));
    }
}
