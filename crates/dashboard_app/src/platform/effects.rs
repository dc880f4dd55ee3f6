use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use dashboard_core::{Effect, Failure, FailureKind, Msg};
use dashboard_engine::{
    read_domain_file, save_export, ClientSettings, EngineError, EngineEvent, EngineHandle,
};
use eframe::egui;
use engine_logging::{engine_debug, engine_info, engine_warn};

/// Executes the effects returned by `update` and feeds the outcomes back as
/// messages. Local file work runs on short-lived threads so the frame loop
/// never blocks on disk.
pub struct EffectRunner {
    engine: Arc<EngineHandle>,
    msg_tx: mpsc::Sender<Msg>,
    export_dir: PathBuf,
    repaint: egui::Context,
}

impl EffectRunner {
    pub fn new(
        settings: ClientSettings,
        export_dir: PathBuf,
        msg_tx: mpsc::Sender<Msg>,
        repaint: egui::Context,
    ) -> Result<Self, EngineError> {
        engine_info!("backend at {}", settings.base_url);
        let engine = Arc::new(EngineHandle::new(settings)?);
        let runner = Self {
            engine,
            msg_tx,
            export_dir,
            repaint,
        };
        runner.spawn_event_loop();
        Ok(runner)
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Api { ticket, call } => {
                    engine_debug!("submit {:?} seq={}", ticket.purpose, ticket.seq);
                    self.engine.submit(ticket, call);
                }
                Effect::CancelReads { route } => self.engine.cancel_reads(route),
                Effect::ReadDomainFile { path } => self.read_domain_file(path),
                Effect::SaveExport {
                    format,
                    bytes,
                    timestamp_ms,
                } => {
                    let dir = self.export_dir.clone();
                    self.run_local(move || {
                        let result = save_export(&dir, format, timestamp_ms, &bytes)
                            .map_err(|err| Failure::new(FailureKind::Io, err.to_string()));
                        Msg::ExportSaved(result)
                    });
                }
            }
        }
    }

    fn read_domain_file(&self, path: PathBuf) {
        self.run_local(move || {
            let result = read_domain_file(&path).map_err(|err| {
                engine_warn!("could not read domain file {:?}: {}", path, err);
                Failure::new(FailureKind::Io, err.to_string())
            });
            Msg::DomainFileLoaded { path, result }
        });
    }

    fn run_local(&self, job: impl FnOnce() -> Msg + Send + 'static) {
        let msg_tx = self.msg_tx.clone();
        let repaint = self.repaint.clone();
        thread::spawn(move || {
            if msg_tx.send(job()).is_ok() {
                repaint.request_repaint();
            }
        });
    }

    fn spawn_event_loop(&self) {
        let engine = self.engine.clone();
        let msg_tx = self.msg_tx.clone();
        let repaint = self.repaint.clone();
        thread::spawn(move || loop {
            match engine.recv_timeout(Duration::from_millis(100)) {
                Some(EngineEvent::Replied { ticket, result }) => {
                    if let Err(failure) = &result {
                        engine_warn!("{:?} failed: {}", ticket.purpose, failure);
                    }
                    if msg_tx.send(Msg::ApiReplied { ticket, result }).is_err() {
                        break;
                    }
                    repaint.request_repaint();
                }
                None => {
                    if Arc::strong_count(&engine) == 1 {
                        break;
                    }
                }
            }
        });
    }
}
