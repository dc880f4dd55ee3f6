pub mod constants;
mod configuration;
mod dashboard;
mod logs;
mod reports;
mod scheduler;
mod widgets;

use dashboard_core::{AppViewModel, Msg, Route};
use eframe::egui;

/// Draw one frame from the view model and collect the user's intents.
pub fn render(ctx: &egui::Context, view: &AppViewModel) -> Vec<Msg> {
    let mut out = Vec::new();

    egui::TopBottomPanel::top("navigation").show(ctx, |ui| {
        nav_bar(ui, view.route, &mut out);
    });

    egui::CentralPanel::default().show(ctx, |ui| match view.route {
        // The log list has its own scroll area so it can stick to the bottom.
        Route::Logs => logs::show(ui, &view.logs, &mut out),
        route => {
            egui::ScrollArea::vertical()
                .id_salt(route.path())
                .auto_shrink([false, false])
                .show(ui, |ui| match route {
                    Route::Configuration => configuration::show(ui, &view.configuration, &mut out),
                    Route::Scheduler => scheduler::show(ui, &view.scheduler, &mut out),
                    Route::Reports => reports::show(ui, &view.reports, &mut out),
                    Route::Dashboard | Route::Logs => dashboard::show(ui, &view.dashboard, &mut out),
                });
        }
    });

    widgets::confirm_dialog(ctx, view.confirm.as_ref(), &mut out);
    out
}

fn nav_bar(ui: &mut egui::Ui, active: Route, out: &mut Vec<Msg>) {
    ui.horizontal(|ui| {
        ui.strong("Scraper Console");
        ui.separator();
        for route in Route::ALL {
            if ui.selectable_label(route == active, route.label()).clicked() && route != active {
                out.push(Msg::Navigate(route));
            }
        }
    });
}
