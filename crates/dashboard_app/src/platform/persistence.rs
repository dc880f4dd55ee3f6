use std::fs;
use std::path::Path;

use dashboard_core::UiPreferences;
use dashboard_engine::AtomicFileWriter;
use engine_logging::{engine_error, engine_info, engine_warn};

const PREFS_FILENAME: &str = ".dashboard_prefs.ron";

/// Missing or unreadable preferences fall back to the defaults.
pub(crate) fn load_preferences(state_dir: &Path) -> UiPreferences {
    let path = state_dir.join(PREFS_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return UiPreferences::default();
        }
        Err(err) => {
            engine_warn!("Failed to read preferences from {:?}: {}", path, err);
            return UiPreferences::default();
        }
    };

    match ron::from_str(&content) {
        Ok(prefs) => {
            engine_info!("Loaded preferences from {:?}", path);
            prefs
        }
        Err(err) => {
            engine_warn!("Failed to parse preferences from {:?}: {}", path, err);
            UiPreferences::default()
        }
    }
}

pub(crate) fn save_preferences(state_dir: &Path, prefs: &UiPreferences) {
    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(prefs, pretty) {
        Ok(text) => text,
        Err(err) => {
            engine_error!("Failed to serialize preferences: {}", err);
            return;
        }
    };

    let writer = AtomicFileWriter::new(state_dir.to_path_buf());
    if let Err(err) = writer.write(PREFS_FILENAME, content.as_bytes()) {
        engine_error!("Failed to write preferences to {:?}: {}", state_dir, err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::{LogFilter, LogLevel, ReportFilter, ReportStatus, Route};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn preferences_survive_a_restart() {
        let temp = TempDir::new().unwrap();
        let prefs = UiPreferences {
            route: Route::Logs,
            log_filter: LogFilter::Level(LogLevel::Warning),
            auto_scroll: false,
            report_filter: ReportFilter {
                domain: "shop".to_string(),
                status: ReportStatus::Failed,
                ..ReportFilter::default()
            },
        };

        save_preferences(temp.path(), &prefs);
        assert!(temp.path().join(PREFS_FILENAME).is_file());
        assert_eq!(load_preferences(temp.path()), prefs);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        assert_eq!(load_preferences(temp.path()), UiPreferences::default());
    }

    #[test]
    fn garbage_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(PREFS_FILENAME), "not ron at all {").unwrap();
        assert_eq!(load_preferences(temp.path()), UiPreferences::default());
    }

    #[test]
    fn missing_fields_take_their_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(PREFS_FILENAME), "(route: Scheduler)").unwrap();
        let prefs = load_preferences(temp.path());
        assert_eq!(prefs.route, Route::Scheduler);
        assert!(prefs.auto_scroll);
    }
}
