use std::sync::Arc;
use std::time::Duration;

use dashboard_core::{
    Ack, ApiCall, ApiReply, FailureKind, ParsingStatus, Purpose, Route, Ticket,
};
use dashboard_engine::{ApiError, Backend, EngineEvent, EngineHandle};

/// Reads of the parsing status hang for a long time; everything else answers
/// at once.
struct ScriptedBackend;

#[async_trait::async_trait]
impl Backend for ScriptedBackend {
    async fn execute(&self, call: &ApiCall) -> Result<ApiReply, ApiError> {
        match call {
            ApiCall::ParsingStatus => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(ApiReply::ParsingStatus(ParsingStatus::default()))
            }
            ApiCall::StopParsing => Ok(ApiReply::Ack(Ack::default())),
            ApiCall::LogStats => Err(ApiError::Server {
                status: 500,
                detail: "database locked".to_string(),
            }),
            _ => Ok(ApiReply::Ack(Ack::default())),
        }
    }
}

fn ticket(seq: u64, purpose: Purpose) -> Ticket {
    Ticket { seq, purpose }
}

fn engine() -> EngineHandle {
    engine_logging::initialize_for_tests();
    EngineHandle::with_backend(Arc::new(ScriptedBackend)).expect("engine")
}

#[test]
fn replies_carry_the_submitted_ticket() {
    let engine = engine();
    engine.submit(ticket(7, Purpose::StopParsing), ApiCall::StopParsing);

    let event = engine.recv_timeout(Duration::from_secs(5)).expect("reply");
    let EngineEvent::Replied { ticket: got, result } = event;
    assert_eq!(got, ticket(7, Purpose::StopParsing));
    assert_eq!(result, Ok(ApiReply::Ack(Ack::default())));
}

#[test]
fn backend_errors_become_failures() {
    let engine = engine();
    engine.submit(ticket(1, Purpose::LogStats), ApiCall::LogStats);

    let EngineEvent::Replied { result, .. } =
        engine.recv_timeout(Duration::from_secs(5)).expect("reply");
    let failure = result.unwrap_err();
    assert_eq!(failure.kind, FailureKind::Server { status: 500 });
    assert_eq!(failure.message, "database locked");
}

#[test]
fn cancelled_reads_stay_silent_but_writes_complete() {
    let engine = engine();
    engine.submit(ticket(1, Purpose::DashboardStatus), ApiCall::ParsingStatus);
    engine.submit(ticket(2, Purpose::StopParsing), ApiCall::StopParsing);
    engine.cancel_reads(Route::Dashboard);

    let EngineEvent::Replied { ticket: got, .. } =
        engine.recv_timeout(Duration::from_secs(5)).expect("write reply");
    assert_eq!(got.purpose, Purpose::StopParsing);
    assert!(engine.recv_timeout(Duration::from_millis(300)).is_none());
}

#[test]
fn cancelling_one_route_leaves_others_alone() {
    let engine = engine();
    engine.submit(ticket(1, Purpose::LogStats), ApiCall::LogStats);
    engine.cancel_reads(Route::Dashboard);

    let EngineEvent::Replied { ticket: got, .. } =
        engine.recv_timeout(Duration::from_secs(5)).expect("reply");
    assert_eq!(got.purpose, Purpose::LogStats);
}

#[test]
fn shutdown_is_idempotent() {
    let mut engine = engine();
    engine.submit(ticket(1, Purpose::DashboardStatus), ApiCall::ParsingStatus);
    engine.shutdown();
    engine.shutdown();
    engine.submit(ticket(2, Purpose::StopParsing), ApiCall::StopParsing);
    assert!(engine.try_recv().is_none());
}
