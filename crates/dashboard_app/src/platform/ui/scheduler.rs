use dashboard_core::{
    DomainSource, Job, JobFormEdit, JobType, Msg, Route, SchedulerView, CRON_PRESETS,
};
use eframe::egui::{self, RichText, Ui};

use super::constants::{ERROR, SUCCESS, WARNING};
use super::widgets;

pub(super) fn show(ui: &mut Ui, view: &SchedulerView, out: &mut Vec<Msg>) {
    widgets::page_heading(ui, "Scheduler", view.load_state);
    widgets::banner(ui, view.banner.as_ref(), Route::Scheduler, out);
    widgets::fetch_error(ui, view.error.as_deref());

    ui.horizontal(|ui| {
        let (label, color) = if view.is_running {
            ("Running", SUCCESS)
        } else {
            ("Stopped", WARNING)
        };
        ui.label("Scheduler:");
        ui.label(RichText::new(label).strong().color(color));
        let toggle = if view.is_running { "Stop scheduler" } else { "Start scheduler" };
        if ui
            .add_enabled(!view.toggling, egui::Button::new(toggle))
            .clicked()
        {
            out.push(Msg::SchedulerToggleClicked);
        }
        if let Some(count) = view.uploaded_domains {
            widgets::muted(ui, format!("{count} uploaded domains available"));
        }
    });
    ui.add_space(8.0);

    diagnostics(ui, view, out);
    ui.add_space(12.0);

    jobs_table(ui, &view.jobs, out);
    ui.add_space(12.0);

    let form_label = if view.form_open { "Hide new job form" } else { "New job…" };
    if ui.button(form_label).clicked() {
        out.push(Msg::JobFormToggled);
    }
    if view.form_open {
        job_form(ui, view, out);
    }
}

fn diagnostics(ui: &mut Ui, view: &SchedulerView, out: &mut Vec<Msg>) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.strong("Queue diagnostics");
        widgets::fetch_error(ui, view.diagnostics_error.as_deref());
        if let Some(diag) = &view.diagnostics {
            ui.label(format!("Queue length: {}", diag.queue_length));
            let session = diag
                .active_session_id
                .map_or_else(|| "none".to_string(), |id| format!("#{id}"));
            let status = diag.session_status.as_deref().unwrap_or("–");
            ui.label(format!("Active session: {session} ({status})"));
            if diag.stuck {
                ui.label(RichText::new("The active session looks stuck.").color(ERROR));
            }
            if let Some(message) = &diag.message {
                widgets::muted(ui, message.clone());
            }
        }
        let label = if view.recovering { "Recovering…" } else { "Clear stuck session" };
        if ui
            .add_enabled(!view.recovering, egui::Button::new(label))
            .clicked()
        {
            out.push(Msg::ClearStuckSessionClicked);
        }
    });
}

fn jobs_table(ui: &mut Ui, jobs: &[Job], out: &mut Vec<Msg>) {
    ui.strong("Scheduled jobs");
    if jobs.is_empty() {
        widgets::muted(ui, "No jobs scheduled.");
        return;
    }
    egui::Grid::new("scheduler_jobs")
        .num_columns(5)
        .striped(true)
        .show(ui, |ui| {
            ui.strong("Job");
            ui.strong("Trigger");
            ui.strong("Next run");
            ui.strong("State");
            ui.strong("");
            ui.end_row();
            for job in jobs {
                ui.label(job.name.as_deref().unwrap_or(&job.id));
                ui.monospace(&job.trigger);
                ui.label(widgets::timestamp(job.next_run_time));
                if job.paused {
                    ui.label(RichText::new("paused").color(WARNING));
                } else {
                    ui.label(RichText::new("active").color(SUCCESS));
                }
                ui.horizontal(|ui| {
                    if job.paused {
                        if ui.small_button("Resume").clicked() {
                            out.push(Msg::ResumeJobClicked(job.id.clone()));
                        }
                    } else if ui.small_button("Pause").clicked() {
                        out.push(Msg::PauseJobClicked(job.id.clone()));
                    }
                    if ui.small_button("Delete").clicked() {
                        out.push(Msg::DeleteJobClicked(job.id.clone()));
                    }
                });
                ui.end_row();
            }
        });
}

fn job_form(ui: &mut Ui, view: &SchedulerView, out: &mut Vec<Msg>) {
    let form = &view.form;
    egui::Frame::group(ui.style()).show(ui, |ui| {
        egui::Grid::new("job_form")
            .num_columns(2)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                ui.label("Job id");
                let mut job_id = form.job_id.clone();
                let edit = egui::TextEdit::singleline(&mut job_id).hint_text("generated if empty");
                if ui.add(edit).changed() {
                    out.push(Msg::JobFormEdited(JobFormEdit::JobId(job_id)));
                }
                ui.end_row();

                ui.label("Cron expression");
                ui.horizontal(|ui| {
                    let mut cron = form.cron_expression.clone();
                    let edit = egui::TextEdit::singleline(&mut cron)
                        .font(egui::TextStyle::Monospace)
                        .desired_width(140.0);
                    if ui.add(edit).changed() {
                        out.push(Msg::JobFormEdited(JobFormEdit::Cron(cron)));
                    }
                    egui::ComboBox::from_id_salt("cron_presets")
                        .selected_text("Presets")
                        .show_ui(ui, |ui| {
                            for (label, expression) in CRON_PRESETS {
                                let selected = form.cron_expression == expression;
                                if ui.selectable_label(selected, label).clicked() {
                                    out.push(Msg::JobFormEdited(JobFormEdit::Cron(
                                        expression.to_string(),
                                    )));
                                }
                            }
                        });
                });
                ui.end_row();

                ui.label("Job type");
                ui.horizontal(|ui| {
                    for job_type in [JobType::FullScraping, JobType::PartialScraping] {
                        if ui
                            .radio(form.job_type == job_type, job_type.label())
                            .clicked()
                        {
                            out.push(Msg::JobFormEdited(JobFormEdit::JobType(job_type)));
                        }
                    }
                });
                ui.end_row();

                if form.job_type == JobType::PartialScraping {
                    widgets::text_row(ui, "Batch size", &form.batch_size, false, out, |v| {
                        Msg::JobFormEdited(JobFormEdit::BatchSize(v))
                    });
                }

                ui.label("Domains from");
                ui.horizontal(|ui| {
                    for source in DomainSource::ALL {
                        if ui.radio(form.source == source, source.label()).clicked() {
                            out.push(Msg::JobFormEdited(JobFormEdit::Source(source)));
                        }
                    }
                });
                ui.end_row();

                match form.source {
                    DomainSource::Uploaded => {
                        ui.label("");
                        let count = view
                            .uploaded_domains
                            .map_or_else(|| "unknown".to_string(), |n| n.to_string());
                        widgets::muted(ui, format!("Uses the uploaded list ({count} domains)"));
                        ui.end_row();
                    }
                    DomainSource::ExternalApi => {
                        widgets::text_row(ui, "API URL", &form.external_url, false, out, |v| {
                            Msg::JobFormEdited(JobFormEdit::ExternalUrl(v))
                        });
                    }
                    DomainSource::Manual => {
                        ui.label("Domains (one per line)");
                        let mut text = form.manual_domains.clone();
                        let edit = egui::TextEdit::multiline(&mut text)
                            .desired_rows(6)
                            .desired_width(320.0);
                        if ui.add(edit).changed() {
                            out.push(Msg::JobFormEdited(JobFormEdit::ManualDomains(text)));
                        }
                        ui.end_row();
                    }
                }
            });

        ui.add_space(6.0);
        let label = if view.submitting { "Creating…" } else { "Create job" };
        if ui
            .add_enabled(!view.submitting, egui::Button::new(label))
            .clicked()
        {
            out.push(Msg::SubmitJobClicked);
        }
    });
}
