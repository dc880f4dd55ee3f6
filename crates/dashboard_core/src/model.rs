//! Canonical wire schema for every backend payload.
//!
//! Field names that changed between backend revisions are accepted through
//! serde aliases; the Rust field name is the canonical one.
use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub type SessionId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ParsingState {
    #[default]
    Idle,
    Running,
    Paused,
    Stopped,
    Completed,
    Failed,
    Unknown,
}

impl From<String> for ParsingState {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "idle" => ParsingState::Idle,
            "running" => ParsingState::Running,
            "paused" => ParsingState::Paused,
            "stopped" => ParsingState::Stopped,
            "completed" => ParsingState::Completed,
            "failed" => ParsingState::Failed,
            _ => ParsingState::Unknown,
        }
    }
}

impl ParsingState {
    pub fn is_running(self) -> bool {
        self == ParsingState::Running
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "RawParsingStatus")]
pub struct ParsingStatus {
    pub session_id: Option<SessionId>,
    pub status: ParsingState,
    pub total_domains: u64,
    pub processed_domains: u64,
    pub successful_domains: u64,
    pub failed_domains: u64,
    pub started_at: Option<DateTime<Utc>>,
    pub estimated_completion: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct RawParsingStatus {
    #[serde(default)]
    session_id: Option<SessionId>,
    #[serde(default)]
    status: Option<ParsingState>,
    /// Older revision: a bare running flag instead of `status`.
    #[serde(default)]
    is_running: Option<bool>,
    #[serde(default)]
    total_domains: u64,
    #[serde(default)]
    processed_domains: u64,
    #[serde(default)]
    successful_domains: u64,
    #[serde(default)]
    failed_domains: u64,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    started_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    estimated_completion: Option<DateTime<Utc>>,
}

impl From<RawParsingStatus> for ParsingStatus {
    fn from(raw: RawParsingStatus) -> Self {
        let status = match (raw.status, raw.is_running) {
            (Some(status), _) => status,
            (None, Some(true)) => ParsingState::Running,
            (None, Some(false)) => ParsingState::Stopped,
            (None, None) => ParsingState::Idle,
        };
        Self {
            session_id: raw.session_id,
            status,
            total_domains: raw.total_domains,
            processed_domains: raw.processed_domains,
            successful_domains: raw.successful_domains,
            failed_domains: raw.failed_domains,
            started_at: raw.started_at,
            estimated_completion: raw.estimated_completion,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SessionProgress {
    #[serde(default)]
    pub session_id: Option<SessionId>,
    #[serde(default)]
    pub status: Option<ParsingState>,
    #[serde(default, alias = "total")]
    pub total_domains: u64,
    #[serde(default, alias = "processed")]
    pub processed_domains: u64,
    #[serde(default, alias = "successful")]
    pub successful_domains: u64,
    #[serde(default, alias = "failed")]
    pub failed_domains: u64,
    #[serde(default)]
    pub current_domain: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct StartParsingRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<u32>,
    pub force_refresh: bool,
}

pub const DEFAULT_PROXY_HTTP_PORT: u16 = 59100;
pub const DEFAULT_PROXY_SOCKS_PORT: u16 = 59101;

fn default_http_port() -> u16 {
    DEFAULT_PROXY_HTTP_PORT
}

fn default_socks_port() -> u16 {
    DEFAULT_PROXY_SOCKS_PORT
}

/// Backend configuration as edited on the configuration page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, deserialize_with = "string_or_empty", alias = "api_url")]
    pub domains_api_url: String,
    #[serde(default, deserialize_with = "string_or_empty", alias = "gemini_key")]
    pub gemini_api_key: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub gemini_prompt: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub webhook_url: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub webhook_token: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub proxy_host: String,
    #[serde(default = "default_http_port")]
    pub proxy_http_port: u16,
    #[serde(default = "default_socks_port")]
    pub proxy_socks_port: u16,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub proxy_login: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub proxy_password: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            domains_api_url: String::new(),
            gemini_api_key: String::new(),
            gemini_prompt: String::new(),
            webhook_url: String::new(),
            webhook_token: String::new(),
            proxy_host: String::new(),
            proxy_http_port: DEFAULT_PROXY_HTTP_PORT,
            proxy_socks_port: DEFAULT_PROXY_SOCKS_PORT,
            proxy_login: String::new(),
            proxy_password: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DomainList {
    #[serde(default)]
    pub domains: Vec<String>,
    #[serde(default)]
    pub count: usize,
}

impl DomainList {
    pub fn new(domains: Vec<String>) -> Self {
        let count = domains.len();
        Self { domains, count }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct UploadOutcome {
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub message: Option<String>,
    /// Preview of the stored list; the backend truncates it.
    #[serde(default)]
    pub domains: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SchedulerStatus {
    #[serde(default, alias = "running")]
    pub is_running: bool,
    #[serde(default)]
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Job {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub trigger: String,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub next_run_time: Option<DateTime<Utc>>,
    #[serde(default, alias = "pending")]
    pub paused: bool,
    #[serde(default)]
    pub func: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    #[default]
    FullScraping,
    PartialScraping,
}

impl JobType {
    pub fn label(self) -> &'static str {
        match self {
            JobType::FullScraping => "Full scraping",
            JobType::PartialScraping => "Partial scraping",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateJobRequest {
    pub job_id: String,
    pub cron_expression: String,
    pub job_type: JobType,
    pub domains: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<u32>,
}

/// Queue and session health exposed by the scheduler diagnostics endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Diagnostics {
    #[serde(default)]
    pub queue_length: u64,
    #[serde(default)]
    pub active_session_id: Option<SessionId>,
    #[serde(default)]
    pub session_status: Option<String>,
    #[serde(default)]
    pub stuck: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportRow {
    pub domain: String,
    #[serde(default)]
    pub session_id: Option<SessionId>,
    #[serde(default, alias = "deals_found")]
    pub deals_count: u64,
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "timestamp::deserialize", alias = "last_scraped_at")]
    pub scraped_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub webhook_sent: bool,
    #[serde(default)]
    pub error_count: u64,
    #[serde(default)]
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "RawReportPage")]
pub struct ReportPage {
    pub rows: Vec<ReportRow>,
    pub total: usize,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawReportPage {
    Page {
        #[serde(default)]
        domains: Vec<ReportRow>,
        #[serde(default)]
        total: Option<usize>,
    },
    Rows(Vec<ReportRow>),
}

impl From<RawReportPage> for ReportPage {
    fn from(raw: RawReportPage) -> Self {
        match raw {
            RawReportPage::Page { domains, total } => {
                let total = total.unwrap_or(domains.len());
                Self {
                    rows: domains,
                    total,
                }
            }
            RawReportPage::Rows(rows) => {
                let total = rows.len();
                Self { rows, total }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ReportSummary {
    #[serde(default)]
    pub total_domains: u64,
    #[serde(default)]
    pub total_sessions: u64,
    #[serde(default)]
    pub total_deals_found: u64,
    #[serde(default)]
    pub total_deals_sent: u64,
    #[serde(default)]
    pub successful_scrapes: u64,
    #[serde(default)]
    pub failed_scrapes: u64,
    #[serde(default)]
    pub average_deals_per_domain: f64,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub last_scrape_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub domains_per_hour_avg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Other,
}

impl LogLevel {
    pub const KNOWN: [LogLevel; 4] = [
        LogLevel::Info,
        LogLevel::Error,
        LogLevel::Warning,
        LogLevel::Debug,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Other => "OTHER",
        }
    }
}

impl From<String> for LogLevel {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => LogLevel::Debug,
            "INFO" => LogLevel::Info,
            "WARNING" | "WARN" => LogLevel::Warning,
            "ERROR" => LogLevel::Error,
            _ => LogLevel::Other,
        }
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        level.as_str().to_string()
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LogEntry {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default = "default_level")]
    pub level: LogLevel,
    #[serde(default)]
    pub message: String,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub extra: Option<serde_json::Map<String, serde_json::Value>>,
}

fn default_level() -> LogLevel {
    LogLevel::Info
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct LogPage {
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct LogStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub by_level: BTreeMap<String, u64>,
}

impl LogStats {
    /// All known levels present with a zero count.
    pub fn zeroed() -> Self {
        Self {
            total: 0,
            by_level: LogLevel::KNOWN
                .iter()
                .map(|level| (level.as_str().to_string(), 0))
                .collect(),
        }
    }

    pub fn count(&self, level: LogLevel) -> u64 {
        self.by_level.get(level.as_str()).copied().unwrap_or(0)
    }
}

/// Acknowledgement returned by mutating endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl Ack {
    /// Some endpoints report failure in a 200 body instead of a status code.
    pub fn is_rejected(&self) -> bool {
        self.success == Some(false)
    }
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Lenient timestamp parsing: RFC 3339, or naive ISO-8601 taken as UTC.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .map(|naive| naive.and_utc())
    }

    /// An unparseable value becomes `None` rather than failing the payload.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse))
    }
}
