use std::collections::HashMap;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use dashboard_core::{ApiCall, ApiReply, Failure, Route, Ticket};
use engine_logging::{engine_debug, engine_warn};
use tokio_util::sync::CancellationToken;

use crate::backend::Backend;
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::settings::ClientSettings;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A call finished. Cancelled reads never produce one.
    Replied {
        ticket: Ticket,
        result: Result<ApiReply, Failure>,
    },
}

enum EngineCommand {
    Call { ticket: Ticket, call: ApiCall },
    CancelReads(Route),
    Shutdown,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("could not start the async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("could not build the API client: {0}")]
    Client(#[from] ApiError),
}

/// Runs backend calls on a background tokio runtime. Calls are fired without
/// waiting for earlier ones; replies come back through `try_recv`.
///
/// The handle is `Sync`, so one thread can drain events while another submits.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Mutex<mpsc::Receiver<EngineEvent>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, EngineError> {
        let client = ApiClient::new(settings)?;
        Self::with_backend(Arc::new(client))
    }

    pub fn with_backend(backend: Arc<dyn Backend>) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("dashboard-engine")
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        let worker = thread::spawn(move || {
            let root = CancellationToken::new();
            let mut read_tokens: HashMap<Route, CancellationToken> = HashMap::new();
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Call { ticket, call } => {
                        let cancel = call.is_read().then(|| {
                            read_tokens
                                .entry(ticket.purpose.route())
                                .or_insert_with(|| root.child_token())
                                .clone()
                        });
                        let backend = backend.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            run_call(backend.as_ref(), ticket, call, cancel, event_tx).await;
                        });
                    }
                    EngineCommand::CancelReads(route) => {
                        if let Some(token) = read_tokens.remove(&route) {
                            engine_debug!("cancelling in-flight reads for {}", route.path());
                            token.cancel();
                        }
                    }
                    EngineCommand::Shutdown => break,
                }
            }
            root.cancel();
            runtime.shutdown_timeout(Duration::from_secs(1));
        });

        Ok(Self {
            cmd_tx,
            event_rx: Mutex::new(event_rx),
            worker: Some(worker),
        })
    }

    pub fn submit(&self, ticket: Ticket, call: ApiCall) {
        if self.cmd_tx.send(EngineCommand::Call { ticket, call }).is_err() {
            engine_warn!("engine stopped; dropping call {:?}", ticket.purpose);
        }
    }

    /// Drop the in-flight reads of a route that is no longer shown.
    pub fn cancel_reads(&self, route: Route) {
        let _ = self.cmd_tx.send(EngineCommand::CancelReads(route));
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv_timeout(timeout).ok()
    }

    /// Cancel everything and stop the runtime thread.
    pub fn shutdown(&mut self) {
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn run_call(
    backend: &dyn Backend,
    ticket: Ticket,
    call: ApiCall,
    cancel: Option<CancellationToken>,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let result = match cancel {
        Some(token) => match token.run_until_cancelled(backend.execute(&call)).await {
            Some(result) => result,
            None => {
                engine_debug!("read {:?} cancelled", ticket.purpose);
                return;
            }
        },
        None => backend.execute(&call).await,
    };
    let _ = event_tx.send(EngineEvent::Replied {
        ticket,
        result: result.map_err(Failure::from),
    });
}
