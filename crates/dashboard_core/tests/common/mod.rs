#![allow(dead_code)]

use std::time::Duration;

use dashboard_core::{update, Ack, ApiCall, ApiReply, AppState, Effect, Failure, Msg, Now, Route, Ticket};

pub fn init_logging() {
    engine_logging::initialize_for_tests();
}

/// A state that has seen one tick and mounted `route`.
pub fn mounted(route: Route) -> (AppState, Vec<Effect>, Now) {
    init_logging();
    let now = Now::capture();
    let (state, _) = update(AppState::new(), Msg::Tick(now));
    let (state, effects) = update(state, Msg::Navigate(route));
    (state, effects, now)
}

pub fn calls(effects: &[Effect]) -> Vec<&ApiCall> {
    effects.iter().filter_map(Effect::api_call).collect()
}

pub fn ticket_for(effects: &[Effect], wanted: impl Fn(&ApiCall) -> bool) -> Ticket {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::Api { ticket, call } if wanted(call) => Some(*ticket),
            _ => None,
        })
        .expect("matching api effect")
}

pub fn reply(state: AppState, ticket: Ticket, result: Result<ApiReply, Failure>) -> (AppState, Vec<Effect>) {
    update(state, Msg::ApiReplied { ticket, result })
}

pub fn ok_ack() -> Result<ApiReply, Failure> {
    Ok(ApiReply::Ack(Ack {
        success: Some(true),
        message: None,
        error: None,
    }))
}

pub fn tick(state: AppState, start: Now, secs: u64) -> (AppState, Vec<Effect>) {
    update(state, Msg::Tick(start.advanced(Duration::from_secs(secs))))
}
