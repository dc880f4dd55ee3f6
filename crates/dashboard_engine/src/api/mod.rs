//! One accessor per backend resource group.
mod config;
mod health;
mod logs;
mod parsing;
mod reports;
mod scheduler;

pub use config::ConfigApi;
pub use health::{Health, HealthApi};
pub use logs::LogsApi;
pub use parsing::ParsingApi;
pub use reports::ReportsApi;
pub use scheduler::SchedulerApi;
