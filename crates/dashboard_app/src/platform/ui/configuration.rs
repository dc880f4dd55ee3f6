use dashboard_core::{ConfigurationView, LoadState, Msg, Route, SettingsEdit, SettingsForm};
use eframe::egui::{self, Ui};

use super::widgets;

pub(super) fn show(ui: &mut Ui, view: &ConfigurationView, out: &mut Vec<Msg>) {
    widgets::page_heading(ui, "Configuration", view.settings_state);
    widgets::banner(ui, view.banner.as_ref(), Route::Configuration, out);

    settings_section(ui, view, out);
    ui.add_space(16.0);
    domains_section(ui, view, out);
}

fn settings_section(ui: &mut Ui, view: &ConfigurationView, out: &mut Vec<Msg>) {
    ui.strong("Backend settings");
    widgets::fetch_error(ui, view.settings_error.as_deref());
    if view.settings_state == LoadState::Loading && view.form == SettingsForm::default() {
        widgets::muted(ui, "Loading settings…");
        return;
    }

    let form = &view.form;
    egui::Grid::new("settings_form")
        .num_columns(2)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            widgets::text_row(ui, "Domains API URL", &form.domains_api_url, false, out, |v| {
                Msg::SettingsEdited(SettingsEdit::DomainsApiUrl(v))
            });
            widgets::text_row(ui, "Gemini API key", &form.gemini_api_key, true, out, |v| {
                Msg::SettingsEdited(SettingsEdit::GeminiApiKey(v))
            });

            ui.label("Gemini prompt");
            let mut prompt = form.gemini_prompt.clone();
            let edit = egui::TextEdit::multiline(&mut prompt)
                .desired_rows(4)
                .desired_width(320.0);
            if ui.add(edit).changed() {
                out.push(Msg::SettingsEdited(SettingsEdit::GeminiPrompt(prompt)));
            }
            ui.end_row();

            widgets::text_row(ui, "Webhook URL", &form.webhook_url, false, out, |v| {
                Msg::SettingsEdited(SettingsEdit::WebhookUrl(v))
            });
            widgets::text_row(ui, "Webhook token", &form.webhook_token, true, out, |v| {
                Msg::SettingsEdited(SettingsEdit::WebhookToken(v))
            });
            widgets::text_row(ui, "Proxy host", &form.proxy_host, false, out, |v| {
                Msg::SettingsEdited(SettingsEdit::ProxyHost(v))
            });
            widgets::text_row(ui, "Proxy HTTP port", &form.proxy_http_port, false, out, |v| {
                Msg::SettingsEdited(SettingsEdit::ProxyHttpPort(v))
            });
            widgets::text_row(ui, "Proxy SOCKS port", &form.proxy_socks_port, false, out, |v| {
                Msg::SettingsEdited(SettingsEdit::ProxySocksPort(v))
            });
            widgets::text_row(ui, "Proxy login", &form.proxy_login, false, out, |v| {
                Msg::SettingsEdited(SettingsEdit::ProxyLogin(v))
            });
            widgets::text_row(ui, "Proxy password", &form.proxy_password, true, out, |v| {
                Msg::SettingsEdited(SettingsEdit::ProxyPassword(v))
            });
        });

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        let idle = !view.saving && !view.testing && !view.resetting;
        let save_label = if view.saving { "Saving…" } else { "Save" };
        if ui.add_enabled(idle, egui::Button::new(save_label)).clicked() {
            out.push(Msg::SaveSettingsClicked);
        }
        let test_label = if view.testing { "Testing…" } else { "Test settings" };
        if ui.add_enabled(idle, egui::Button::new(test_label)).clicked() {
            out.push(Msg::TestSettingsClicked);
        }
        if ui
            .add_enabled(idle, egui::Button::new("Reset to defaults"))
            .clicked()
        {
            out.push(Msg::ResetSettingsClicked);
        }
    });
}

fn domains_section(ui: &mut Ui, view: &ConfigurationView, out: &mut Vec<Msg>) {
    ui.horizontal(|ui| {
        ui.strong("Domains");
        if view.domains_state == LoadState::Loading || view.busy_with_domains {
            ui.spinner();
        }
    });
    widgets::fetch_error(ui, view.domains_error.as_deref());
    ui.label(format!("{} domains stored", view.domain_count));

    if !view.domain_preview.is_empty() {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            for domain in &view.domain_preview {
                ui.monospace(domain);
            }
            if view.domain_count > view.domain_preview.len() {
                widgets::muted(
                    ui,
                    format!("… and {} more", view.domain_count - view.domain_preview.len()),
                );
            }
        });
    }
    ui.add_space(8.0);

    let idle = !view.busy_with_domains;
    ui.horizontal(|ui| {
        ui.label("JSON file");
        let mut path = view.domain_file_path.clone();
        let edit = egui::TextEdit::singleline(&mut path)
            .hint_text("/path/to/domains.json")
            .desired_width(320.0);
        if ui.add(edit).changed() {
            out.push(Msg::DomainFilePathChanged(path));
        }
        let can_upload = idle && !view.domain_file_path.trim().is_empty();
        if ui.add_enabled(can_upload, egui::Button::new("Upload")).clicked() {
            out.push(Msg::UploadDomainFileClicked);
        }
    });
    ui.horizontal(|ui| {
        if ui
            .add_enabled(idle, egui::Button::new("Fetch from domains API"))
            .clicked()
        {
            out.push(Msg::FetchExternalDomainsClicked);
        }
        let can_clear = idle && view.domain_count > 0;
        if ui
            .add_enabled(can_clear, egui::Button::new("Clear all domains"))
            .clicked()
        {
            out.push(Msg::ClearDomainsClicked);
        }
    });
}
