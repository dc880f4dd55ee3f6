#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
mod config;
mod platform;

use clap::Parser;
use engine_logging::engine_info;

use config::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    platform::logging::initialize(cli.log_target, cli.log_level);
    engine_info!(
        "starting scraper console: api={} exports={:?} state={:?}",
        cli.api_url,
        cli.export_dir,
        cli.state_dir
    );
    platform::run_app(cli)
}
