use std::path::PathBuf;
use std::sync::mpsc;

use dashboard_core::{update, AppState, AppViewModel, Msg, Now, UiPreferences};
use eframe::egui;
use engine_logging::engine_info;

use super::effects::EffectRunner;
use super::persistence::{load_preferences, save_preferences};
use super::ui;
use crate::config::Cli;

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([ui::constants::WINDOW_WIDTH, ui::constants::WINDOW_HEIGHT])
            .with_title("Scraper Console"),
        ..Default::default()
    };

    eframe::run_native(
        "Scraper Console",
        options,
        Box::new(move |cc| Ok(Box::new(ConsoleApp::new(cc, cli)?))),
    )
    .map_err(|err| anyhow::anyhow!("window closed with an error: {err}"))
}

struct ConsoleApp {
    state: AppState,
    view: AppViewModel,
    runner: EffectRunner,
    msg_rx: mpsc::Receiver<Msg>,
    state_dir: PathBuf,
    saved_prefs: UiPreferences,
}

impl ConsoleApp {
    fn new(
        cc: &eframe::CreationContext<'_>,
        cli: Cli,
    ) -> Result<Self, dashboard_engine::EngineError> {
        let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
        let runner = EffectRunner::new(
            cli.client_settings(),
            cli.export_dir.clone(),
            msg_tx,
            cc.egui_ctx.clone(),
        )?;

        let prefs = load_preferences(&cli.state_dir);
        let state = AppState::new();
        let view = state.view();
        let mut app = Self {
            state,
            view,
            runner,
            msg_rx,
            state_dir: cli.state_dir,
            saved_prefs: prefs.clone(),
        };
        app.dispatch(Msg::Tick(Now::capture()));
        app.dispatch(Msg::RestorePreferences(prefs));
        Ok(app)
    }

    fn process_pending_messages(&mut self) {
        let inbox: Vec<Msg> = self.msg_rx.try_iter().collect();
        for msg in inbox {
            self.dispatch(msg);
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.runner.enqueue(effects);
        if state.consume_dirty() {
            self.view = state.view();
        }
        self.state = state;
    }

    fn persist_preferences(&mut self) {
        let prefs = self.state.preferences();
        if prefs != self.saved_prefs {
            save_preferences(&self.state_dir, &prefs);
            self.saved_prefs = prefs;
        }
    }
}

impl eframe::App for ConsoleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_pending_messages();
        self.dispatch(Msg::Tick(Now::capture()));

        for msg in ui::render(ctx, &self.view) {
            self.dispatch(msg);
        }

        ctx.request_repaint_after(ui::constants::TICK_INTERVAL);
    }
}

impl Drop for ConsoleApp {
    fn drop(&mut self) {
        self.persist_preferences();
        engine_info!("console closed on {}", self.state.route().path());
    }
}
