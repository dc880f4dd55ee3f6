//! Dashboard engine: REST client, request dispatcher and local file IO.
mod api;
mod backend;
mod client;
mod engine;
mod error;
mod export;
mod persist;
mod settings;

pub use api::{ConfigApi, Health, HealthApi, LogsApi, ParsingApi, ReportsApi, SchedulerApi};
pub use backend::Backend;
pub use client::ApiClient;
pub use engine::{EngineError, EngineEvent, EngineHandle};
pub use error::ApiError;
pub use export::{export_filename, save_export};
pub use persist::{
    ensure_output_dir, read_domain_file, AtomicFileWriter, PersistError, MAX_DOMAIN_FILE_BYTES,
};
pub use settings::{ClientSettings, BASE_URL_ENV, DEFAULT_BASE_URL};
