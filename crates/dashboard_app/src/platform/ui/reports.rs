use dashboard_core::{ExportFormat, Msg, ReportFilter, ReportStatus, ReportsView, Route};
use eframe::egui::{self, RichText, Ui};

use super::constants::{ERROR, SUCCESS};
use super::widgets;

pub(super) fn show(ui: &mut Ui, view: &ReportsView, out: &mut Vec<Msg>) {
    widgets::page_heading(ui, "Reports", view.load_state);
    widgets::banner(ui, view.banner.as_ref(), Route::Reports, out);

    filters(ui, &view.filter, out);
    if view.filter_pending {
        widgets::muted(ui, "Finish the dates as YYYY-MM-DD to apply the filter.");
    }
    ui.horizontal(|ui| {
        for format in [ExportFormat::Csv, ExportFormat::Json] {
            let label = format!("Export {}", format.as_str().to_uppercase());
            if ui
                .add_enabled(!view.exporting, egui::Button::new(label))
                .clicked()
            {
                out.push(Msg::ExportClicked(format));
            }
        }
        if view.exporting {
            ui.spinner();
        }
    });
    ui.add_space(8.0);

    summary(ui, view);
    ui.add_space(8.0);

    widgets::fetch_error(ui, view.error.as_deref());
    rows(ui, view);
}

/// Every edit sends the whole filter; each one triggers a refetch.
fn filters(ui: &mut Ui, filter: &ReportFilter, out: &mut Vec<Msg>) {
    ui.horizontal_wrapped(|ui| {
        date_input(ui, "From", &filter.start_date, out, |date| ReportFilter {
            start_date: date,
            ..filter.clone()
        });
        date_input(ui, "To", &filter.end_date, out, |date| ReportFilter {
            end_date: date,
            ..filter.clone()
        });

        ui.label("Domain");
        let mut domain = filter.domain.clone();
        let edit = egui::TextEdit::singleline(&mut domain)
            .hint_text("contains…")
            .desired_width(160.0);
        if ui.add(edit).changed() {
            out.push(Msg::ReportFilterChanged(ReportFilter {
                domain,
                ..filter.clone()
            }));
        }

        ui.label("Status");
        egui::ComboBox::from_id_salt("report_status")
            .selected_text(filter.status.label())
            .show_ui(ui, |ui| {
                for status in ReportStatus::ALL {
                    if ui
                        .selectable_label(filter.status == status, status.label())
                        .clicked()
                        && filter.status != status
                    {
                        out.push(Msg::ReportFilterChanged(ReportFilter {
                            status,
                            ..filter.clone()
                        }));
                    }
                }
            });
    });
}

fn date_input(
    ui: &mut Ui,
    label: &str,
    value: &str,
    out: &mut Vec<Msg>,
    with_date: impl FnOnce(String) -> ReportFilter,
) {
    ui.label(label);
    let mut text = value.to_string();
    let edit = egui::TextEdit::singleline(&mut text)
        .hint_text("YYYY-MM-DD")
        .desired_width(96.0);
    if ui.add(edit).changed() {
        out.push(Msg::ReportFilterChanged(with_date(text)));
    }
}

fn summary(ui: &mut Ui, view: &ReportsView) {
    widgets::fetch_error(ui, view.summary_error.as_deref());
    let Some(summary) = &view.summary else {
        return;
    };
    egui::Grid::new("report_summary")
        .num_columns(4)
        .spacing([24.0, 4.0])
        .show(ui, |ui| {
            ui.label(format!("Domains: {}", summary.total_domains));
            ui.label(format!("Sessions: {}", summary.total_sessions));
            ui.label(format!("Deals found: {}", summary.total_deals_found));
            ui.label(format!("Deals sent: {}", summary.total_deals_sent));
            ui.end_row();
            ui.label(RichText::new(format!("Successful: {}", summary.successful_scrapes)).color(SUCCESS));
            ui.label(RichText::new(format!("Failed: {}", summary.failed_scrapes)).color(ERROR));
            ui.label(format!("Avg deals/domain: {:.2}", summary.average_deals_per_domain));
            ui.label(format!("Domains/hour: {:.1}", summary.domains_per_hour_avg));
            ui.end_row();
        });
    widgets::muted(
        ui,
        format!("Last scrape: {}", widgets::timestamp(summary.last_scrape_date)),
    );
}

fn rows(ui: &mut Ui, view: &ReportsView) {
    if view.rows.is_empty() {
        widgets::muted(ui, "No reports match the current filter.");
        return;
    }
    widgets::muted(ui, format!("{} of {} rows", view.rows.len(), view.total));
    egui::Grid::new("report_rows")
        .num_columns(6)
        .striped(true)
        .show(ui, |ui| {
            for header in ["Domain", "Session", "Deals", "Result", "Scraped", "Last error"] {
                ui.strong(header);
            }
            ui.end_row();
            for row in &view.rows {
                ui.label(&row.domain);
                ui.label(row.session_id.map_or_else(String::new, |id| format!("#{id}")));
                ui.label(row.deals_count.to_string());
                if row.success {
                    ui.label(RichText::new("ok").color(SUCCESS));
                } else {
                    ui.label(RichText::new("failed").color(ERROR));
                }
                ui.label(widgets::timestamp(row.scraped_at));
                ui.label(row.last_error.as_deref().unwrap_or(""));
                ui.end_row();
            }
        });
}
