use std::path::PathBuf;

use crate::api::{ack, narrow, ApiCall, ApiReply, Purpose, Requests, Ticket};
use crate::domains::{parse_domain_payload, validate_http_url};
use crate::effect::Effect;
use crate::model::{DomainList, Settings};
use crate::notice::Banner;
use crate::resource::{Failure, LoadState, Resource};

/// How many uploaded domains the page lists below the count.
pub const DOMAIN_PREVIEW_LEN: usize = 20;

/// One edited form field. Ports arrive as raw text and are validated on save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsEdit {
    DomainsApiUrl(String),
    GeminiApiKey(String),
    GeminiPrompt(String),
    WebhookUrl(String),
    WebhookToken(String),
    ProxyHost(String),
    ProxyHttpPort(String),
    ProxySocksPort(String),
    ProxyLogin(String),
    ProxyPassword(String),
}

/// Local edit buffer; nothing is sent until Save or Test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsForm {
    pub domains_api_url: String,
    pub gemini_api_key: String,
    pub gemini_prompt: String,
    pub webhook_url: String,
    pub webhook_token: String,
    pub proxy_host: String,
    pub proxy_http_port: String,
    pub proxy_socks_port: String,
    pub proxy_login: String,
    pub proxy_password: String,
}

impl Default for SettingsForm {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl SettingsForm {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            domains_api_url: settings.domains_api_url.clone(),
            gemini_api_key: settings.gemini_api_key.clone(),
            gemini_prompt: settings.gemini_prompt.clone(),
            webhook_url: settings.webhook_url.clone(),
            webhook_token: settings.webhook_token.clone(),
            proxy_host: settings.proxy_host.clone(),
            proxy_http_port: settings.proxy_http_port.to_string(),
            proxy_socks_port: settings.proxy_socks_port.to_string(),
            proxy_login: settings.proxy_login.clone(),
            proxy_password: settings.proxy_password.clone(),
        }
    }

    pub fn apply(&mut self, edit: SettingsEdit) {
        match edit {
            SettingsEdit::DomainsApiUrl(value) => self.domains_api_url = value,
            SettingsEdit::GeminiApiKey(value) => self.gemini_api_key = value,
            SettingsEdit::GeminiPrompt(value) => self.gemini_prompt = value,
            SettingsEdit::WebhookUrl(value) => self.webhook_url = value,
            SettingsEdit::WebhookToken(value) => self.webhook_token = value,
            SettingsEdit::ProxyHost(value) => self.proxy_host = value,
            SettingsEdit::ProxyHttpPort(value) => self.proxy_http_port = value,
            SettingsEdit::ProxySocksPort(value) => self.proxy_socks_port = value,
            SettingsEdit::ProxyLogin(value) => self.proxy_login = value,
            SettingsEdit::ProxyPassword(value) => self.proxy_password = value,
        }
    }

    pub fn to_settings(&self) -> Result<Settings, Failure> {
        Ok(Settings {
            domains_api_url: self.domains_api_url.trim().to_string(),
            gemini_api_key: self.gemini_api_key.clone(),
            gemini_prompt: self.gemini_prompt.clone(),
            webhook_url: self.webhook_url.trim().to_string(),
            webhook_token: self.webhook_token.clone(),
            proxy_host: self.proxy_host.trim().to_string(),
            proxy_http_port: parse_port("HTTP proxy port", &self.proxy_http_port)?,
            proxy_socks_port: parse_port("SOCKS proxy port", &self.proxy_socks_port)?,
            proxy_login: self.proxy_login.clone(),
            proxy_password: self.proxy_password.clone(),
        })
    }
}

pub fn parse_port(label: &str, raw: &str) -> Result<u16, Failure> {
    match raw.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(Failure::validation(format!(
            "{label} must be a number between 1 and 65535"
        ))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DomainTransfer {
    ReadingFile,
    FetchingExternal,
    Uploading,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigurationPage {
    settings: Resource<Settings>,
    form: SettingsForm,
    domains: Resource<DomainList>,
    domain_file_path: String,
    saving: bool,
    testing: bool,
    resetting: bool,
    clearing: bool,
    transfer: Option<DomainTransfer>,
    banner: Option<Banner>,
}

impl ConfigurationPage {
    pub(crate) fn mount(&mut self, requests: &mut Requests) -> Vec<Effect> {
        self.settings = Resource::default();
        self.domains = Resource::default();
        // An external fetch is a read and was dropped when the page unmounted.
        if self.transfer == Some(DomainTransfer::FetchingExternal) {
            self.transfer = None;
        }
        let mut effects = self.load_settings(requests);
        effects.extend(self.load_domains(requests));
        effects
    }

    fn load_settings(&mut self, requests: &mut Requests) -> Vec<Effect> {
        let (seq, effect) = requests.issue(Purpose::LoadSettings, ApiCall::GetSettings);
        self.settings.begin(seq);
        vec![effect]
    }

    fn load_domains(&mut self, requests: &mut Requests) -> Vec<Effect> {
        let (seq, effect) = requests.issue(Purpose::LoadDomains, ApiCall::GetDomains);
        self.domains.begin(seq);
        vec![effect]
    }

    pub(crate) fn edit(&mut self, edit: SettingsEdit) {
        self.form.apply(edit);
    }

    pub(crate) fn save(&mut self, requests: &mut Requests) -> Vec<Effect> {
        if self.saving {
            return Vec::new();
        }
        match self.form.to_settings() {
            Ok(settings) => {
                self.saving = true;
                let (_, effect) =
                    requests.issue(Purpose::SaveSettings, ApiCall::UpdateSettings(settings));
                vec![effect]
            }
            Err(failure) => {
                self.banner = Some(Banner::error(failure.message));
                Vec::new()
            }
        }
    }

    pub(crate) fn test(&mut self, requests: &mut Requests) -> Vec<Effect> {
        if self.testing {
            return Vec::new();
        }
        match self.form.to_settings() {
            Ok(settings) => {
                self.testing = true;
                let (_, effect) =
                    requests.issue(Purpose::TestSettings, ApiCall::TestSettings(settings));
                vec![effect]
            }
            Err(failure) => {
                self.banner = Some(Banner::error(failure.message));
                Vec::new()
            }
        }
    }

    /// Runs after the reset confirmation was accepted.
    pub(crate) fn reset(&mut self, requests: &mut Requests) -> Vec<Effect> {
        self.resetting = true;
        let (_, effect) = requests.issue(Purpose::ResetSettings, ApiCall::ResetSettings);
        vec![effect]
    }

    /// Runs after the clear confirmation was accepted.
    pub(crate) fn clear_domains(&mut self, requests: &mut Requests) -> Vec<Effect> {
        self.clearing = true;
        let (_, effect) = requests.issue(Purpose::ClearDomains, ApiCall::ClearDomains);
        vec![effect]
    }

    pub(crate) fn set_domain_file_path(&mut self, path: String) {
        self.domain_file_path = path;
    }

    pub(crate) fn upload_file(&mut self) -> Vec<Effect> {
        if self.transfer.is_some() {
            return Vec::new();
        }
        let path = std::mem::take(&mut self.domain_file_path);
        let path = path.trim();
        if path.is_empty() {
            self.banner = Some(Banner::error("Choose a domain file first"));
            return Vec::new();
        }
        self.transfer = Some(DomainTransfer::ReadingFile);
        vec![Effect::ReadDomainFile {
            path: PathBuf::from(path),
        }]
    }

    pub(crate) fn file_loaded(
        &mut self,
        requests: &mut Requests,
        path: PathBuf,
        result: Result<String, Failure>,
    ) -> Vec<Effect> {
        if self.transfer != Some(DomainTransfer::ReadingFile) {
            return Vec::new();
        }
        let parsed = result.and_then(|raw| parse_domain_payload(&raw).map_err(Failure::from));
        match parsed {
            Ok(list) => self.upload(requests, list.domains),
            Err(failure) => {
                self.transfer = None;
                self.banner = Some(Banner::error(format!(
                    "Could not use {}: {failure}",
                    path.display()
                )));
                Vec::new()
            }
        }
    }

    pub(crate) fn fetch_external(&mut self, requests: &mut Requests) -> Vec<Effect> {
        if self.transfer.is_some() {
            return Vec::new();
        }
        match validate_http_url(&self.form.domains_api_url) {
            Ok(url) => {
                self.transfer = Some(DomainTransfer::FetchingExternal);
                let (_, effect) = requests.issue(
                    Purpose::ExternalDomains,
                    ApiCall::FetchExternalDomains {
                        url: url.to_string(),
                    },
                );
                vec![effect]
            }
            Err(failure) => {
                self.banner = Some(Banner::error(format!("Domains API URL: {failure}")));
                Vec::new()
            }
        }
    }

    fn upload(&mut self, requests: &mut Requests, domains: Vec<String>) -> Vec<Effect> {
        self.transfer = Some(DomainTransfer::Uploading);
        let (_, effect) = requests.issue(Purpose::UploadDomains, ApiCall::UploadDomains(domains));
        vec![effect]
    }

    pub(crate) fn on_reply(
        &mut self,
        requests: &mut Requests,
        ticket: Ticket,
        result: Result<ApiReply, Failure>,
    ) -> Vec<Effect> {
        match ticket.purpose {
            Purpose::LoadSettings => {
                let settings = narrow(result, |reply| match reply {
                    ApiReply::Settings(settings) => Some(settings),
                    _ => None,
                });
                if self.settings.apply(ticket.seq, settings) {
                    if let Some(settings) = self.settings.data() {
                        self.form = SettingsForm::from_settings(settings);
                    }
                }
                Vec::new()
            }
            Purpose::LoadDomains => {
                let domains = narrow(result, |reply| match reply {
                    ApiReply::Domains(list) => Some(list),
                    _ => None,
                });
                self.domains.apply(ticket.seq, domains);
                Vec::new()
            }
            Purpose::SaveSettings => {
                self.saving = false;
                match ack(result) {
                    Ok(_) => {
                        if let Ok(settings) = self.form.to_settings() {
                            self.settings.replace(ticket.seq, settings);
                        }
                        self.banner = Some(Banner::success("Configuration saved"));
                    }
                    Err(failure) => self.banner = Some(Banner::failed("Saving", &failure)),
                }
                Vec::new()
            }
            Purpose::TestSettings => {
                self.testing = false;
                match ack(result) {
                    Ok(ack) => {
                        let text = ack
                            .message
                            .unwrap_or_else(|| "Settings test passed".to_string());
                        self.banner = Some(Banner::success(text));
                    }
                    Err(failure) => self.banner = Some(Banner::failed("Settings test", &failure)),
                }
                Vec::new()
            }
            Purpose::ResetSettings => {
                self.resetting = false;
                match ack(result) {
                    Ok(_) => {
                        self.banner = Some(Banner::success("Settings reset to defaults"));
                        self.load_settings(requests)
                    }
                    Err(failure) => {
                        self.banner = Some(Banner::failed("Reset", &failure));
                        Vec::new()
                    }
                }
            }
            Purpose::ExternalDomains => {
                if self.transfer != Some(DomainTransfer::FetchingExternal) {
                    return Vec::new();
                }
                let fetched = narrow(result, |reply| match reply {
                    ApiReply::Domains(list) => Some(list),
                    _ => None,
                });
                match fetched {
                    Ok(list) if list.domains.is_empty() => {
                        self.transfer = None;
                        self.banner = Some(Banner::error("The domains API returned no domains"));
                        Vec::new()
                    }
                    Ok(list) => self.upload(requests, list.domains),
                    Err(failure) => {
                        self.transfer = None;
                        self.banner = Some(Banner::failed("Fetching domains", &failure));
                        Vec::new()
                    }
                }
            }
            Purpose::UploadDomains => {
                self.transfer = None;
                let uploaded = narrow(result, |reply| match reply {
                    ApiReply::Uploaded(outcome) => Some(outcome),
                    _ => None,
                });
                match uploaded {
                    Ok(outcome) => {
                        self.banner = Some(Banner::success(format!(
                            "Uploaded {} domains",
                            outcome.count
                        )));
                        self.load_domains(requests)
                    }
                    Err(failure) => {
                        self.banner = Some(Banner::failed("Upload", &failure));
                        Vec::new()
                    }
                }
            }
            Purpose::ClearDomains => {
                self.clearing = false;
                match ack(result) {
                    Ok(_) => {
                        self.domains.replace(ticket.seq, DomainList::default());
                        self.banner = Some(Banner::success("All domains deleted"));
                        self.load_domains(requests)
                    }
                    Err(failure) => {
                        self.banner = Some(Banner::failed("Clearing domains", &failure));
                        Vec::new()
                    }
                }
            }
            _ => Vec::new(),
        }
    }

    pub(crate) fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    pub fn view(&self) -> ConfigurationView {
        let domains = self.domains.data();
        ConfigurationView {
            settings_state: self.settings.state(),
            settings_error: self.settings.error().map(ToString::to_string),
            form: self.form.clone(),
            domains_state: self.domains.state(),
            domains_error: self.domains.error().map(ToString::to_string),
            domain_count: domains.map_or(0, |list| list.count.max(list.domains.len())),
            domain_preview: domains
                .map(|list| list.domains.iter().take(DOMAIN_PREVIEW_LEN).cloned().collect())
                .unwrap_or_default(),
            domain_file_path: self.domain_file_path.clone(),
            saving: self.saving,
            testing: self.testing,
            busy_with_domains: self.transfer.is_some() || self.clearing,
            resetting: self.resetting,
            banner: self.banner.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationView {
    pub settings_state: LoadState,
    pub settings_error: Option<String>,
    pub form: SettingsForm,
    pub domains_state: LoadState,
    pub domains_error: Option<String>,
    pub domain_count: usize,
    pub domain_preview: Vec<String>,
    pub domain_file_path: String,
    pub saving: bool,
    pub testing: bool,
    pub busy_with_domains: bool,
    pub resetting: bool,
    pub banner: Option<Banner>,
}
