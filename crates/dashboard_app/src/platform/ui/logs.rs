use dashboard_core::{LogEntry, LogFilter, LogLevel, LogsView, Msg, Route};
use eframe::egui::{self, Color32, RichText, Ui};

use super::constants::{ERROR, MUTED, WARNING};
use super::widgets;

pub(super) fn show(ui: &mut Ui, view: &LogsView, out: &mut Vec<Msg>) {
    widgets::page_heading(ui, "Logs", view.load_state);
    widgets::banner(ui, view.banner.as_ref(), Route::Logs, out);
    widgets::fetch_error(ui, view.error.as_deref());

    ui.horizontal(|ui| {
        ui.label("Level");
        let filters = std::iter::once(LogFilter::All)
            .chain(LogLevel::KNOWN.into_iter().map(LogFilter::Level));
        for filter in filters {
            let label = match (filter, &view.stats) {
                (LogFilter::Level(level), Some(stats)) => {
                    format!("{} ({})", filter.label(), stats.count(level))
                }
                (LogFilter::All, Some(stats)) => format!("All ({})", stats.total),
                _ => filter.label().to_string(),
            };
            if ui.selectable_label(view.filter == filter, label).clicked() && view.filter != filter
            {
                out.push(Msg::LogFilterChanged(filter));
            }
        }

        ui.separator();
        let mut auto_scroll = view.auto_scroll;
        if ui.checkbox(&mut auto_scroll, "Auto-scroll").changed() {
            out.push(Msg::AutoScrollToggled(auto_scroll));
        }
        if ui
            .add_enabled(!view.clearing, egui::Button::new("Clear logs"))
            .clicked()
        {
            out.push(Msg::ClearLogsClicked);
        }
    });
    ui.separator();

    if view.entries.is_empty() {
        widgets::muted(ui, "No log entries.");
        return;
    }
    egui::ScrollArea::vertical()
        .id_salt("log_entries")
        .auto_shrink([false, false])
        .stick_to_bottom(view.auto_scroll)
        .show(ui, |ui| {
            for entry in &view.entries {
                entry_row(ui, entry);
            }
        });
}

fn entry_row(ui: &mut Ui, entry: &LogEntry) {
    ui.horizontal_wrapped(|ui| {
        ui.monospace(RichText::new(widgets::timestamp(entry.timestamp)).color(MUTED));
        ui.monospace(
            RichText::new(format!("{:<7}", entry.level.as_str())).color(level_color(entry.level)),
        );
        if let Some(domain) = &entry.domain {
            ui.monospace(RichText::new(format!("[{domain}]")).strong());
        }
        ui.label(&entry.message);
    });
}

fn level_color(level: LogLevel) -> Color32 {
    match level {
        LogLevel::Error => ERROR,
        LogLevel::Warning => WARNING,
        LogLevel::Debug | LogLevel::Other => MUTED,
        LogLevel::Info => Color32::LIGHT_BLUE,
    }
}
