use dashboard_core::{DashboardView, LoadState, Msg, ParsingState, Route};
use eframe::egui::{self, RichText, Ui};

use super::constants::{ERROR, SUCCESS, WARNING};
use super::widgets;

pub(super) fn show(ui: &mut Ui, view: &DashboardView, out: &mut Vec<Msg>) {
    widgets::page_heading(ui, "Parsing dashboard", view.load_state);
    widgets::banner(ui, view.banner.as_ref(), Route::Dashboard, out);
    widgets::fetch_error(ui, view.error.as_deref());

    controls(ui, view, out);
    ui.add_space(12.0);

    if view.first_load && view.load_state == LoadState::Loading {
        widgets::muted(ui, "Loading parsing status…");
        return;
    }
    if view.is_empty {
        widgets::muted(ui, "No parsing session yet. Start one above.");
        return;
    }

    ui.horizontal(|ui| {
        ui.label("Status:");
        ui.label(RichText::new(state_label(view.state)).strong().color(state_color(view.state)));
        if let Some(id) = view.session_id {
            widgets::muted(ui, format!("session #{id}"));
        }
    });
    ui.add(
        egui::ProgressBar::new((view.progress_percent / 100.0) as f32)
            .text(format!("{:.1}%", view.progress_percent)),
    );
    ui.add_space(8.0);

    egui::Grid::new("dashboard_counts")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui| {
            ui.label("Total domains");
            ui.label(view.total.to_string());
            ui.end_row();
            ui.label("Processed");
            ui.label(view.processed.to_string());
            ui.end_row();
            ui.label("Successful");
            ui.label(RichText::new(view.successful.to_string()).color(SUCCESS));
            ui.end_row();
            ui.label("Failed");
            ui.label(RichText::new(view.failed.to_string()).color(ERROR));
            ui.end_row();
            ui.label("Throughput");
            ui.label(format!("{:.1} domains/hour", view.domains_per_hour));
            ui.end_row();
            ui.label("Started");
            ui.label(widgets::timestamp(view.started_at));
            ui.end_row();
            ui.label("Estimated completion");
            ui.label(widgets::timestamp(view.estimated_completion));
            ui.end_row();
            ui.label("Current domain");
            ui.label(view.current_domain.as_deref().unwrap_or("–"));
            ui.end_row();
        });
}

fn controls(ui: &mut Ui, view: &DashboardView, out: &mut Vec<Msg>) {
    ui.horizontal(|ui| {
        ui.label("Batch size");
        let mut batch = view.start_batch_size.clone();
        let edit = egui::TextEdit::singleline(&mut batch)
            .hint_text("all")
            .desired_width(70.0);
        if ui.add(edit).changed() {
            out.push(Msg::StartBatchSizeChanged(batch));
        }

        let mut force = view.force_refresh;
        if ui.checkbox(&mut force, "Force refresh").changed() {
            out.push(Msg::ForceRefreshToggled(force));
        }

        if ui
            .add_enabled(view.can_start, egui::Button::new("▶ Start parsing"))
            .clicked()
        {
            out.push(Msg::StartParsingClicked);
        }
        if ui
            .add_enabled(view.can_stop, egui::Button::new("■ Stop"))
            .clicked()
        {
            out.push(Msg::StopParsingClicked);
        }
    });
}

fn state_label(state: ParsingState) -> &'static str {
    match state {
        ParsingState::Idle => "Idle",
        ParsingState::Running => "Running",
        ParsingState::Paused => "Paused",
        ParsingState::Stopped => "Stopped",
        ParsingState::Completed => "Completed",
        ParsingState::Failed => "Failed",
        ParsingState::Unknown => "Unknown",
    }
}

fn state_color(state: ParsingState) -> egui::Color32 {
    match state {
        ParsingState::Running | ParsingState::Completed => SUCCESS,
        ParsingState::Failed => ERROR,
        ParsingState::Paused | ParsingState::Stopped => WARNING,
        ParsingState::Idle | ParsingState::Unknown => egui::Color32::GRAY,
    }
}
