use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use dashboard_engine::{ClientSettings, BASE_URL_ENV, DEFAULT_BASE_URL};
use log::LevelFilter;

/// Desktop console for the scraper backend.
#[derive(Debug, Clone, Parser)]
#[command(name = "scraper-console", version, about)]
pub struct Cli {
    /// Base URL of the backend REST API
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,

    /// Directory report exports are saved into
    #[arg(long, default_value = "./exports")]
    pub export_dir: PathBuf,

    /// Directory holding the saved UI preferences
    #[arg(long, default_value = ".")]
    pub state_dir: PathBuf,

    /// Where log output goes
    #[arg(long = "log", value_enum, default_value_t = LogTarget::Terminal)]
    pub log_target: LogTarget,

    /// Log level: off, error, warn, info, debug or trace
    #[arg(long, default_value = "info", value_parser = parse_log_level)]
    pub log_level: LevelFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

fn parse_log_level(raw: &str) -> Result<LevelFilter, String> {
    engine_logging::parse_level(raw).ok_or_else(|| format!("unknown log level '{raw}'"))
}

impl Cli {
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings::default()
            .with_base_url(self.api_url.clone())
            .with_request_timeout(Duration::from_secs(self.timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "scraper-console",
            "--api-url",
            "http://scraper.internal:9000/api/v1/",
            "--timeout-secs",
            "5",
            "--log",
            "both",
            "--log-level",
            "DEBUG",
        ])
        .unwrap();
        assert_eq!(cli.log_target, LogTarget::Both);
        assert_eq!(cli.log_level, LevelFilter::Debug);

        let settings = cli.client_settings();
        assert_eq!(settings.base_url, "http://scraper.internal:9000/api/v1");
        assert_eq!(settings.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn unknown_level_and_zero_timeout_are_rejected() {
        assert!(Cli::try_parse_from(["scraper-console", "--log-level", "loud"]).is_err());
        assert!(Cli::try_parse_from(["scraper-console", "--timeout-secs", "0"]).is_err());
    }

    #[test]
    fn defaults_point_at_local_directories() {
        let cli = Cli::try_parse_from(["scraper-console", "--api-url", DEFAULT_BASE_URL]).unwrap();
        assert_eq!(cli.export_dir, PathBuf::from("./exports"));
        assert_eq!(cli.state_dir, PathBuf::from("."));
        assert_eq!(cli.timeout_secs, 30);
        assert_eq!(cli.log_target, LogTarget::Terminal);
    }
}
