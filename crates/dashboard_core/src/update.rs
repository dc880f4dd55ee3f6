use crate::api::{ApiReply, Ticket};
use crate::notice::{ConfirmAction, PendingConfirm};
use crate::resource::Failure;
use crate::route::Route;
use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Navigate(route) => navigate(&mut state, route),
        Msg::Tick(now) => {
            state.clock = Some(now);
            let due = state
                .poll
                .as_mut()
                .is_some_and(|timer| timer.tick(now.instant));
            if due {
                poll(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::ApiReplied { ticket, result } => on_reply(&mut state, ticket, result),
        Msg::RestorePreferences(prefs) => {
            state.logs.set_filter(prefs.log_filter);
            state.logs.set_auto_scroll(prefs.auto_scroll);
            state.reports.restore_filter(prefs.report_filter);
            navigate(&mut state, prefs.route)
        }
        Msg::ConfirmAccepted => match state.confirm.take() {
            Some(pending) => confirmed(&mut state, pending.action),
            None => Vec::new(),
        },
        Msg::ConfirmDismissed => {
            state.confirm = None;
            Vec::new()
        }
        Msg::BannerDismissed(route) => {
            match route {
                Route::Dashboard => state.dashboard.dismiss_banner(),
                Route::Configuration => state.configuration.dismiss_banner(),
                Route::Scheduler => state.scheduler.dismiss_banner(),
                Route::Reports => state.reports.dismiss_banner(),
                Route::Logs => state.logs.dismiss_banner(),
            }
            Vec::new()
        }

        Msg::StartBatchSizeChanged(raw) => {
            state.dashboard.set_batch_size(raw);
            Vec::new()
        }
        Msg::ForceRefreshToggled(force) => {
            state.dashboard.set_force_refresh(force);
            Vec::new()
        }
        Msg::StartParsingClicked => state.dashboard.start(&mut state.requests),
        Msg::StopParsingClicked => state.dashboard.stop(&mut state.requests),

        Msg::SettingsEdited(edit) => {
            state.configuration.edit(edit);
            Vec::new()
        }
        Msg::SaveSettingsClicked => state.configuration.save(&mut state.requests),
        Msg::ResetSettingsClicked => ask(&mut state, ConfirmAction::ResetSettings),
        Msg::TestSettingsClicked => state.configuration.test(&mut state.requests),
        Msg::DomainFilePathChanged(path) => {
            state.configuration.set_domain_file_path(path);
            Vec::new()
        }
        Msg::UploadDomainFileClicked => state.configuration.upload_file(),
        Msg::DomainFileLoaded { path, result } => {
            state
                .configuration
                .file_loaded(&mut state.requests, path, result)
        }
        Msg::FetchExternalDomainsClicked => state.configuration.fetch_external(&mut state.requests),
        Msg::ClearDomainsClicked => ask(&mut state, ConfirmAction::ClearDomains),

        Msg::SchedulerToggleClicked => state.scheduler.toggle_scheduler(&mut state.requests),
        Msg::JobFormToggled => {
            state.scheduler.toggle_form();
            Vec::new()
        }
        Msg::JobFormEdited(edit) => {
            state.scheduler.edit_form(edit);
            Vec::new()
        }
        // Generated job ids come from the clock, so nothing is submitted
        // before the first tick.
        Msg::SubmitJobClicked => match state.clock {
            Some(now) => state.scheduler.submit(&mut state.requests, now.utc),
            None => Vec::new(),
        },
        Msg::PauseJobClicked(id) => state.scheduler.pause_job(&mut state.requests, id),
        Msg::ResumeJobClicked(id) => state.scheduler.resume_job(&mut state.requests, id),
        Msg::DeleteJobClicked(id) => ask(&mut state, ConfirmAction::DeleteJob(id)),
        Msg::ClearStuckSessionClicked => ask(&mut state, ConfirmAction::ClearStuckSession),

        Msg::ReportFilterChanged(filter) => {
            state.reports.change_filter(&mut state.requests, filter)
        }
        Msg::ExportClicked(format) => state.reports.export(&mut state.requests, format),
        Msg::ExportSaved(result) => {
            state.reports.export_saved(result);
            Vec::new()
        }

        Msg::LogFilterChanged(filter) => {
            state.logs.set_filter(filter);
            Vec::new()
        }
        Msg::AutoScrollToggled(enabled) => {
            state.logs.set_auto_scroll(enabled);
            Vec::new()
        }
        Msg::ClearLogsClicked => ask(&mut state, ConfirmAction::ClearLogs),
    };

    state.mark_dirty();
    (state, effects)
}

/// Unmount the current page, then mount `route` and arm its poll timer.
fn navigate(state: &mut AppState, route: Route) -> Vec<Effect> {
    if state.mounted && state.route == route {
        return Vec::new();
    }
    let mut effects = Vec::new();
    if state.mounted {
        effects.push(Effect::CancelReads { route: state.route });
    }
    state.route = route;
    state.mounted = true;
    state.confirm = None;

    let requests = &mut state.requests;
    effects.extend(match route {
        Route::Dashboard => state.dashboard.mount(requests),
        Route::Configuration => state.configuration.mount(requests),
        Route::Scheduler => state.scheduler.mount(requests),
        Route::Reports => state.reports.mount(requests),
        Route::Logs => state.logs.mount(requests),
    });

    state.poll = route.poll_interval().map(|interval| {
        let mut timer = crate::resource::PollTimer::new(interval);
        timer.arm();
        timer
    });
    effects
}

fn poll(state: &mut AppState) -> Vec<Effect> {
    let requests = &mut state.requests;
    match state.route {
        Route::Dashboard => state.dashboard.poll(requests),
        Route::Scheduler => state.scheduler.poll(requests),
        Route::Logs => state.logs.poll(requests),
        Route::Configuration | Route::Reports => Vec::new(),
    }
}

fn on_reply(state: &mut AppState, ticket: Ticket, result: Result<ApiReply, Failure>) -> Vec<Effect> {
    let route = ticket.purpose.route();
    let now = state.clock.map(|now| now.utc);
    let requests = &mut state.requests;
    let mut effects = match route {
        Route::Dashboard => state.dashboard.on_reply(requests, ticket, result),
        Route::Configuration => state.configuration.on_reply(requests, ticket, result),
        Route::Scheduler => state.scheduler.on_reply(requests, ticket, result),
        Route::Reports => state.reports.on_reply(ticket, result, now),
        Route::Logs => state.logs.on_reply(requests, ticket, result),
    };
    // A page that is not shown finishes its writes but starts no new reads.
    if route != state.route {
        effects.retain(|effect| effect.api_call().is_none_or(|call| !call.is_read()));
    }
    effects
}

fn ask(state: &mut AppState, action: ConfirmAction) -> Vec<Effect> {
    state.confirm = Some(PendingConfirm::new(action));
    Vec::new()
}

fn confirmed(state: &mut AppState, action: ConfirmAction) -> Vec<Effect> {
    let requests = &mut state.requests;
    match action {
        ConfirmAction::ResetSettings => state.configuration.reset(requests),
        ConfirmAction::ClearDomains => state.configuration.clear_domains(requests),
        ConfirmAction::DeleteJob(id) => state.scheduler.delete_job(requests, id),
        ConfirmAction::ClearStuckSession => state.scheduler.clear_stuck_session(requests),
        ConfirmAction::ClearLogs => state.logs.clear(requests),
    }
}
