use chrono::{DateTime, Local, Utc};
use dashboard_core::{Banner, LoadState, Msg, PendingConfirm, Route, Tone};
use eframe::egui::{self, Align2, RichText, Ui};

use super::constants::{ERROR, MUTED, SUCCESS, TIME_FORMAT};

pub(super) fn page_heading(ui: &mut Ui, title: &str, state: LoadState) {
    ui.horizontal(|ui| {
        ui.heading(title);
        if state == LoadState::Loading {
            ui.spinner();
        }
    });
    ui.separator();
}

/// The page's outcome banner with a close button.
pub(super) fn banner(ui: &mut Ui, banner: Option<&Banner>, route: Route, out: &mut Vec<Msg>) {
    let Some(banner) = banner else {
        return;
    };
    let color = match banner.tone {
        Tone::Success => SUCCESS,
        Tone::Error => ERROR,
    };
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.label(RichText::new(&banner.text).color(color));
            if ui.small_button("✕").clicked() {
                out.push(Msg::BannerDismissed(route));
            }
        });
    });
    ui.add_space(6.0);
}

pub(super) fn fetch_error(ui: &mut Ui, error: Option<&str>) {
    if let Some(error) = error {
        ui.label(RichText::new(error).color(ERROR));
    }
}

pub(super) fn muted(ui: &mut Ui, text: impl Into<String>) {
    ui.label(RichText::new(text.into()).color(MUTED));
}

pub(super) fn timestamp(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|utc| utc.with_timezone(&Local).format(TIME_FORMAT).to_string())
        .unwrap_or_else(|| "–".to_string())
}

/// A labelled single-line input; emits a message only when the text changes.
pub(super) fn text_row(
    ui: &mut Ui,
    label: &str,
    value: &str,
    secret: bool,
    out: &mut Vec<Msg>,
    on_change: impl FnOnce(String) -> Msg,
) {
    ui.label(label);
    let mut text = value.to_string();
    let edit = egui::TextEdit::singleline(&mut text)
        .password(secret)
        .desired_width(320.0);
    if ui.add(edit).changed() {
        out.push(on_change(text));
    }
    ui.end_row();
}

pub(super) fn confirm_dialog(ctx: &egui::Context, confirm: Option<&PendingConfirm>, out: &mut Vec<Msg>) {
    let Some(confirm) = confirm else {
        return;
    };
    egui::Window::new("Please confirm")
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(&confirm.prompt);
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button(RichText::new("Confirm").color(ERROR)).clicked() {
                    out.push(Msg::ConfirmAccepted);
                }
                if ui.button("Cancel").clicked() {
                    out.push(Msg::ConfirmDismissed);
                }
            });
        });
}
