use std::path::{Path, PathBuf};

use dashboard_core::ExportFormat;
use engine_logging::engine_info;

use crate::persist::{AtomicFileWriter, PersistError};

/// `reports-<unix millis>.<csv|json>`
pub fn export_filename(format: ExportFormat, timestamp_ms: i64) -> String {
    format!("reports-{timestamp_ms}.{}", format.as_str())
}

/// Save a downloaded report export into `dir`.
pub fn save_export(
    dir: &Path,
    format: ExportFormat,
    timestamp_ms: i64,
    bytes: &[u8],
) -> Result<PathBuf, PersistError> {
    let writer = AtomicFileWriter::new(dir.to_path_buf());
    let path = writer.write(&export_filename(format, timestamp_ms), bytes)?;
    engine_info!("saved {} byte export to {}", bytes.len(), path.display());
    Ok(path)
}
