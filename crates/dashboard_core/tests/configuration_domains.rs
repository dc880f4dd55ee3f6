mod common;

use std::path::PathBuf;

use dashboard_core::{
    parse_domain_payload, update, ApiCall, ApiReply, DomainFileError, DomainList, Effect, Msg,
    Route, Settings, SettingsEdit, Tone, UploadOutcome,
};
use pretty_assertions::assert_eq;

use common::{calls, mounted, ok_ack, reply, ticket_for};

#[test]
fn both_upload_shapes_parse_to_the_same_list() {
    let wrapped = parse_domain_payload(r#"{"status":"ok","data":["a.com"," b.com ",""]}"#)
        .expect("data shape");
    let plain = parse_domain_payload(r#"{"domains":["a.com","b.com"]}"#).expect("domains shape");
    assert_eq!(wrapped, plain);
    assert_eq!(plain.count, 2);
    assert_eq!(plain.domains, vec!["a.com".to_string(), "b.com".to_string()]);
}

#[test]
fn bad_domain_files_are_rejected() {
    assert!(matches!(
        parse_domain_payload("{not json"),
        Err(DomainFileError::MalformedJson(_))
    ));
    assert_eq!(
        parse_domain_payload(r#"["a.com"]"#),
        Err(DomainFileError::UnexpectedShape)
    );
    assert_eq!(
        parse_domain_payload(r#"{"items":["a.com"]}"#),
        Err(DomainFileError::UnexpectedShape)
    );
    assert_eq!(
        parse_domain_payload(r#"{"domains":["  ",""]}"#),
        Err(DomainFileError::Empty)
    );
}

#[test]
fn mount_loads_settings_into_the_form() {
    let (state, effects, _) = mounted(Route::Configuration);
    let ticket = ticket_for(&effects, |call| call == &ApiCall::GetSettings);
    let settings = Settings {
        proxy_host: "10.0.0.2".to_string(),
        proxy_http_port: 8080,
        ..Settings::default()
    };
    let (state, _) = reply(state, ticket, Ok(ApiReply::Settings(settings)));
    let form = state.view().configuration.form;
    assert_eq!(form.proxy_host, "10.0.0.2");
    assert_eq!(form.proxy_http_port, "8080");
}

#[test]
fn upload_reads_parses_and_posts_the_file() {
    let (state, _, _) = mounted(Route::Configuration);
    let (state, _) = update(state, Msg::DomainFilePathChanged("/tmp/domains.json".to_string()));
    let (state, effects) = update(state, Msg::UploadDomainFileClicked);
    assert_eq!(
        effects,
        vec![Effect::ReadDomainFile {
            path: PathBuf::from("/tmp/domains.json")
        }]
    );
    assert_eq!(state.view().configuration.domain_file_path, "");

    let (state, effects) = update(
        state,
        Msg::DomainFileLoaded {
            path: PathBuf::from("/tmp/domains.json"),
            result: Ok(r#"{"domains":["a.com","b.com"]}"#.to_string()),
        },
    );
    assert_eq!(
        calls(&effects),
        vec![&ApiCall::UploadDomains(vec![
            "a.com".to_string(),
            "b.com".to_string()
        ])]
    );

    let ticket = ticket_for(&effects, |call| matches!(call, ApiCall::UploadDomains(_)));
    let outcome = UploadOutcome {
        count: 2,
        message: None,
        domains: vec!["a.com".to_string(), "b.com".to_string()],
    };
    let (state, effects) = reply(state, ticket, Ok(ApiReply::Uploaded(outcome)));
    assert_eq!(calls(&effects), vec![&ApiCall::GetDomains]);
    assert_eq!(
        state.view().configuration.banner.map(|b| b.tone),
        Some(Tone::Success)
    );
}

#[test]
fn malformed_file_makes_no_network_call() {
    let (state, _, _) = mounted(Route::Configuration);
    let (state, _) = update(state, Msg::DomainFilePathChanged("bad.json".to_string()));
    let (state, _) = update(state, Msg::UploadDomainFileClicked);
    let (state, effects) = update(
        state,
        Msg::DomainFileLoaded {
            path: PathBuf::from("bad.json"),
            result: Ok("{\"domains\": [".to_string()),
        },
    );
    assert!(effects.is_empty());
    let view = state.view().configuration;
    assert_eq!(view.banner.map(|b| b.tone), Some(Tone::Error));
    assert!(!view.busy_with_domains);
}

#[test]
fn invalid_port_blocks_save() {
    let (state, _, _) = mounted(Route::Configuration);
    let (state, _) = update(
        state,
        Msg::SettingsEdited(SettingsEdit::ProxySocksPort("70000".to_string())),
    );
    let (state, effects) = update(state, Msg::SaveSettingsClicked);
    assert!(effects.is_empty());
    assert!(state.view().configuration.banner.is_some());
}

#[test]
fn save_sends_the_whole_buffer() {
    let (state, _, _) = mounted(Route::Configuration);
    let (state, _) = update(
        state,
        Msg::SettingsEdited(SettingsEdit::WebhookUrl("https://hooks.example/x".to_string())),
    );
    let (_state, effects) = update(state, Msg::SaveSettingsClicked);
    let expected = Settings {
        webhook_url: "https://hooks.example/x".to_string(),
        ..Settings::default()
    };
    assert_eq!(calls(&effects), vec![&ApiCall::UpdateSettings(expected)]);
}

#[test]
fn reset_is_confirmed_then_refetches() {
    let (state, _, _) = mounted(Route::Configuration);
    let (state, effects) = update(state, Msg::ResetSettingsClicked);
    assert!(effects.is_empty());
    let (state, effects) = update(state, Msg::ConfirmAccepted);
    assert_eq!(calls(&effects), vec![&ApiCall::ResetSettings]);

    let ticket = ticket_for(&effects, |call| call == &ApiCall::ResetSettings);
    let (_state, effects) = reply(state, ticket, ok_ack());
    assert_eq!(calls(&effects), vec![&ApiCall::GetSettings]);
}

#[test]
fn clear_domains_empties_the_list_and_refetches() {
    let (state, effects, _) = mounted(Route::Configuration);
    let load = ticket_for(&effects, |call| call == &ApiCall::GetDomains);
    let list = DomainList::new(vec!["a.com".to_string()]);
    let (state, _) = reply(state, load, Ok(ApiReply::Domains(list)));
    assert_eq!(state.view().configuration.domain_count, 1);

    let (state, _) = update(state, Msg::ClearDomainsClicked);
    let (state, effects) = update(state, Msg::ConfirmAccepted);
    let clear = ticket_for(&effects, |call| call == &ApiCall::ClearDomains);
    let (state, effects) = reply(state, clear, ok_ack());
    assert_eq!(calls(&effects), vec![&ApiCall::GetDomains]);
    assert_eq!(state.view().configuration.domain_count, 0);
}

#[test]
fn external_fetch_needs_a_valid_url() {
    let (state, _, _) = mounted(Route::Configuration);
    let (state, effects) = update(state, Msg::FetchExternalDomainsClicked);
    assert!(effects.is_empty());
    assert!(state.view().configuration.banner.is_some());

    let (state, _) = update(
        state,
        Msg::SettingsEdited(SettingsEdit::DomainsApiUrl(
            "http://lists.example.com/all".to_string(),
        )),
    );
    let (state, effects) = update(state, Msg::FetchExternalDomainsClicked);
    assert_eq!(
        calls(&effects),
        vec![&ApiCall::FetchExternalDomains {
            url: "http://lists.example.com/all".to_string()
        }]
    );

    let ticket = ticket_for(&effects, |call| {
        matches!(call, ApiCall::FetchExternalDomains { .. })
    });
    let fetched = DomainList::new(vec!["z.com".to_string()]);
    let (_state, effects) = reply(state, ticket, Ok(ApiReply::Domains(fetched)));
    assert_eq!(
        calls(&effects),
        vec![&ApiCall::UploadDomains(vec!["z.com".to_string()])]
    );
}
