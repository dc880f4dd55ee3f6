use chrono::{DateTime, Utc};

use crate::api::{ack, narrow, ApiCall, ApiReply, Purpose, Requests, Ticket};
use crate::domains::{parse_manual_domains, validate_http_url};
use crate::effect::Effect;
use crate::model::{CreateJobRequest, Diagnostics, DomainList, JobType, SchedulerStatus};
use crate::notice::Banner;
use crate::resource::{Failure, LoadState, Resource};

pub const DEFAULT_BATCH_SIZE: u32 = 500;
pub const DEFAULT_CRON: &str = "0 */6 * * *";

/// Cron presets offered next to the expression field, as (label, expression).
pub const CRON_PRESETS: [(&str, &str); 6] = [
    ("Every 5 minutes", "*/5 * * * *"),
    ("Every 30 minutes", "*/30 * * * *"),
    ("Every 2 hours", "0 */2 * * *"),
    ("Every 6 hours", "0 */6 * * *"),
    ("Daily at 00:00", "0 0 * * *"),
    ("Daily at 09:00", "0 9 * * *"),
];

/// Where a new job takes its domains from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DomainSource {
    /// The list previously uploaded on the configuration page.
    #[default]
    Uploaded,
    /// Fetched now from an arbitrary external URL.
    ExternalApi,
    /// Newline-separated text typed into the form.
    Manual,
}

impl DomainSource {
    pub const ALL: [DomainSource; 3] = [
        DomainSource::Uploaded,
        DomainSource::ExternalApi,
        DomainSource::Manual,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DomainSource::Uploaded => "Uploaded list",
            DomainSource::ExternalApi => "External API",
            DomainSource::Manual => "Manual",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobFormEdit {
    JobId(String),
    Cron(String),
    JobType(JobType),
    BatchSize(String),
    Source(DomainSource),
    ExternalUrl(String),
    ManualDomains(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobForm {
    pub job_id: String,
    pub cron_expression: String,
    pub job_type: JobType,
    pub batch_size: String,
    pub source: DomainSource,
    pub external_url: String,
    pub manual_domains: String,
}

impl Default for JobForm {
    fn default() -> Self {
        Self {
            job_id: String::new(),
            cron_expression: DEFAULT_CRON.to_string(),
            job_type: JobType::FullScraping,
            batch_size: DEFAULT_BATCH_SIZE.to_string(),
            source: DomainSource::Uploaded,
            external_url: String::new(),
            manual_domains: String::new(),
        }
    }
}

/// Domains for a validated job, either ready or still to be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedSource {
    Ready(Vec<String>),
    Uploaded,
    External(String),
}

/// A job that passed client-side validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDraft {
    pub job_id: String,
    pub cron_expression: String,
    pub job_type: JobType,
    pub batch_size: Option<u32>,
    pub source: ResolvedSource,
}

impl JobDraft {
    pub fn into_request(self, domains: Vec<String>) -> CreateJobRequest {
        CreateJobRequest {
            job_id: self.job_id,
            cron_expression: self.cron_expression,
            job_type: self.job_type,
            domains,
            batch_size: self.batch_size,
        }
    }
}

impl JobForm {
    pub fn apply(&mut self, edit: JobFormEdit) {
        match edit {
            JobFormEdit::JobId(value) => self.job_id = value,
            JobFormEdit::Cron(value) => self.cron_expression = value,
            JobFormEdit::JobType(value) => self.job_type = value,
            JobFormEdit::BatchSize(value) => self.batch_size = value,
            JobFormEdit::Source(value) => self.source = value,
            JobFormEdit::ExternalUrl(value) => self.external_url = value,
            JobFormEdit::ManualDomains(value) => self.manual_domains = value,
        }
    }

    /// Every check that can run without the network. `now` only feeds the
    /// generated job id.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<JobDraft, Failure> {
        let cron_expression = self.cron_expression.trim();
        if cron_expression.is_empty() {
            return Err(Failure::validation("Cron expression is required"));
        }
        let batch_size = match self.job_type {
            JobType::FullScraping => None,
            JobType::PartialScraping => Some(parse_job_batch_size(&self.batch_size)?),
        };
        let source = match self.source {
            DomainSource::Manual => {
                let domains = parse_manual_domains(&self.manual_domains);
                if domains.is_empty() {
                    return Err(Failure::validation("Enter at least one domain"));
                }
                ResolvedSource::Ready(domains)
            }
            DomainSource::ExternalApi => {
                let url = validate_http_url(&self.external_url)?;
                ResolvedSource::External(url.to_string())
            }
            DomainSource::Uploaded => ResolvedSource::Uploaded,
        };
        let job_id = match self.job_id.trim() {
            "" => generated_job_id(now),
            id => id.to_string(),
        };
        Ok(JobDraft {
            job_id,
            cron_expression: cron_expression.to_string(),
            job_type: self.job_type,
            batch_size,
            source,
        })
    }
}

pub fn generated_job_id(now: DateTime<Utc>) -> String {
    format!("job_{}", now.timestamp_millis())
}

fn parse_job_batch_size(raw: &str) -> Result<u32, Failure> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(DEFAULT_BATCH_SIZE);
    }
    match raw.parse::<u32>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(Failure::validation(
            "Batch size must be a positive whole number",
        )),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Recovery {
    Purging,
    Resyncing,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchedulerPage {
    status: Resource<SchedulerStatus>,
    diagnostics: Resource<Diagnostics>,
    uploaded: Resource<DomainList>,
    form_open: bool,
    form: JobForm,
    pending_job: Option<JobDraft>,
    submitting: bool,
    toggling: bool,
    recovery: Option<Recovery>,
    banner: Option<Banner>,
}

impl SchedulerPage {
    pub(crate) fn mount(&mut self, requests: &mut Requests) -> Vec<Effect> {
        self.status = Resource::default();
        self.diagnostics = Resource::default();
        self.uploaded = Resource::default();
        // Domain resolution is a read and was dropped when the page unmounted.
        if self.pending_job.take().is_some() {
            self.submitting = false;
        }
        let mut effects = self.poll(requests);
        let (seq, effect) = requests.issue(Purpose::UploadedDomainCount, ApiCall::GetDomains);
        self.uploaded.begin(seq);
        effects.push(effect);
        effects
    }

    pub(crate) fn poll(&mut self, requests: &mut Requests) -> Vec<Effect> {
        let (status_seq, status) = requests.issue(Purpose::SchedulerStatus, ApiCall::SchedulerStatus);
        self.status.begin(status_seq);
        let (diag_seq, diagnostics) =
            requests.issue(Purpose::SchedulerDiagnostics, ApiCall::SchedulerDiagnostics);
        self.diagnostics.begin(diag_seq);
        vec![status, diagnostics]
    }

    pub(crate) fn toggle_form(&mut self) {
        self.form_open = !self.form_open;
    }

    pub(crate) fn edit_form(&mut self, edit: JobFormEdit) {
        self.form.apply(edit);
    }

    pub(crate) fn submit(&mut self, requests: &mut Requests, now: DateTime<Utc>) -> Vec<Effect> {
        if self.submitting {
            return Vec::new();
        }
        let draft = match self.form.validate(now) {
            Ok(draft) => draft,
            Err(failure) => {
                self.banner = Some(Banner::error(failure.message));
                return Vec::new();
            }
        };
        self.submitting = true;
        let resolve = match &draft.source {
            ResolvedSource::Ready(domains) => {
                let request = draft.clone().into_request(domains.clone());
                let (_, effect) = requests.issue(Purpose::CreateJob, ApiCall::CreateJob(request));
                return vec![effect];
            }
            ResolvedSource::Uploaded => ApiCall::GetDomains,
            ResolvedSource::External(url) => ApiCall::FetchExternalDomains { url: url.clone() },
        };
        self.pending_job = Some(draft);
        let (_, effect) = requests.issue(Purpose::ResolveJobDomains, resolve);
        vec![effect]
    }

    pub(crate) fn toggle_scheduler(&mut self, requests: &mut Requests) -> Vec<Effect> {
        if self.toggling {
            return Vec::new();
        }
        let Some(status) = self.status.data() else {
            return Vec::new();
        };
        let call = if status.is_running {
            ApiCall::StopScheduler { wait: true }
        } else {
            ApiCall::StartScheduler
        };
        self.toggling = true;
        let (_, effect) = requests.issue(Purpose::ToggleScheduler, call);
        vec![effect]
    }

    pub(crate) fn pause_job(&mut self, requests: &mut Requests, id: String) -> Vec<Effect> {
        let (_, effect) = requests.issue(Purpose::JobAction, ApiCall::PauseJob(id));
        vec![effect]
    }

    pub(crate) fn resume_job(&mut self, requests: &mut Requests, id: String) -> Vec<Effect> {
        let (_, effect) = requests.issue(Purpose::JobAction, ApiCall::ResumeJob(id));
        vec![effect]
    }

    /// Runs after the delete confirmation was accepted.
    pub(crate) fn delete_job(&mut self, requests: &mut Requests, id: String) -> Vec<Effect> {
        let (_, effect) = requests.issue(Purpose::JobAction, ApiCall::DeleteJob(id));
        vec![effect]
    }

    /// Runs after the recovery confirmation was accepted. The resync only
    /// follows a successful purge.
    pub(crate) fn clear_stuck_session(&mut self, requests: &mut Requests) -> Vec<Effect> {
        if self.recovery.is_some() {
            return Vec::new();
        }
        self.recovery = Some(Recovery::Purging);
        let (_, effect) = requests.issue(Purpose::PurgeQueue, ApiCall::PurgeQueue);
        vec![effect]
    }

    pub(crate) fn on_reply(
        &mut self,
        requests: &mut Requests,
        ticket: Ticket,
        result: Result<ApiReply, Failure>,
    ) -> Vec<Effect> {
        match ticket.purpose {
            Purpose::SchedulerStatus => {
                let status = narrow(result, |reply| match reply {
                    ApiReply::Scheduler(status) => Some(status),
                    _ => None,
                });
                self.status.apply(ticket.seq, status);
                Vec::new()
            }
            Purpose::SchedulerDiagnostics => {
                let diagnostics = narrow(result, |reply| match reply {
                    ApiReply::Diagnostics(diagnostics) => Some(diagnostics),
                    _ => None,
                });
                self.diagnostics.apply(ticket.seq, diagnostics);
                Vec::new()
            }
            Purpose::UploadedDomainCount => {
                let uploaded = narrow(result, |reply| match reply {
                    ApiReply::Domains(list) => Some(list),
                    _ => None,
                });
                self.uploaded.apply(ticket.seq, uploaded);
                Vec::new()
            }
            Purpose::ResolveJobDomains => self.on_domains_resolved(requests, result),
            Purpose::CreateJob => {
                self.submitting = false;
                match ack(result) {
                    Ok(_) => {
                        self.form = JobForm::default();
                        self.form_open = false;
                        self.banner = Some(Banner::success("Job created"));
                        self.poll(requests)
                    }
                    Err(failure) => {
                        self.banner = Some(Banner::failed("Creating the job", &failure));
                        Vec::new()
                    }
                }
            }
            Purpose::ToggleScheduler => {
                self.toggling = false;
                self.after_action("Scheduler", requests, result)
            }
            Purpose::JobAction => self.after_action("Job action", requests, result),
            Purpose::PurgeQueue => match ack(result) {
                Ok(_) => {
                    self.recovery = Some(Recovery::Resyncing);
                    let (_, effect) = requests.issue(Purpose::ResyncState, ApiCall::ResyncState);
                    vec![effect]
                }
                Err(failure) => {
                    self.recovery = None;
                    self.banner = Some(Banner::failed("Purging the queue", &failure));
                    Vec::new()
                }
            },
            Purpose::ResyncState => {
                self.recovery = None;
                match ack(result) {
                    Ok(_) => {
                        self.banner = Some(Banner::success("Stuck session cleared"));
                        self.poll(requests)
                    }
                    Err(failure) => {
                        self.banner = Some(Banner::failed("Resynchronising state", &failure));
                        Vec::new()
                    }
                }
            }
            _ => Vec::new(),
        }
    }

    fn on_domains_resolved(
        &mut self,
        requests: &mut Requests,
        result: Result<ApiReply, Failure>,
    ) -> Vec<Effect> {
        let Some(draft) = self.pending_job.take() else {
            return Vec::new();
        };
        let resolved = narrow(result, |reply| match reply {
            ApiReply::Domains(list) => Some(list),
            _ => None,
        });
        match resolved {
            Ok(list) if list.domains.is_empty() => {
                self.submitting = false;
                let text = match draft.source {
                    ResolvedSource::External(_) => "The external API returned no domains",
                    _ => "No uploaded domains; upload a list on the Configuration page first",
                };
                self.banner = Some(Banner::error(text));
                Vec::new()
            }
            Ok(list) => {
                let request = draft.into_request(list.domains);
                let (_, effect) = requests.issue(Purpose::CreateJob, ApiCall::CreateJob(request));
                vec![effect]
            }
            Err(failure) => {
                self.submitting = false;
                self.banner = Some(Banner::failed("Loading the job's domains", &failure));
                Vec::new()
            }
        }
    }

    fn after_action(
        &mut self,
        action: &str,
        requests: &mut Requests,
        result: Result<ApiReply, Failure>,
    ) -> Vec<Effect> {
        match ack(result) {
            Ok(ack) => {
                let text = ack.message.unwrap_or_else(|| format!("{action}: done"));
                self.banner = Some(Banner::success(text));
                self.poll(requests)
            }
            Err(failure) => {
                self.banner = Some(Banner::failed(action, &failure));
                Vec::new()
            }
        }
    }

    pub(crate) fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    pub fn view(&self) -> SchedulerView {
        let status = self.status.data();
        SchedulerView {
            load_state: self.status.state(),
            error: self.status.error().map(ToString::to_string),
            is_running: status.is_some_and(|status| status.is_running),
            jobs: status.map(|status| status.jobs.clone()).unwrap_or_default(),
            diagnostics: self.diagnostics.data().cloned(),
            diagnostics_error: self.diagnostics.error().map(ToString::to_string),
            uploaded_domains: self.uploaded.data().map(|list| list.count.max(list.domains.len())),
            form_open: self.form_open,
            form: self.form.clone(),
            submitting: self.submitting,
            toggling: self.toggling,
            recovering: self.recovery.is_some(),
            banner: self.banner.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerView {
    pub load_state: LoadState,
    pub error: Option<String>,
    pub is_running: bool,
    pub jobs: Vec<crate::model::Job>,
    pub diagnostics: Option<Diagnostics>,
    pub diagnostics_error: Option<String>,
    pub uploaded_domains: Option<usize>,
    pub form_open: bool,
    pub form: JobForm,
    pub submitting: bool,
    pub toggling: bool,
    pub recovering: bool,
    pub banner: Option<Banner>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_123).unwrap()
    }

    #[test]
    fn blank_job_id_is_generated_from_the_clock() {
        let form = JobForm {
            source: DomainSource::Manual,
            manual_domains: "a.com".to_string(),
            ..JobForm::default()
        };
        let draft = form.validate(now()).unwrap();
        assert_eq!(draft.job_id, "job_1700000000123");
    }

    #[test]
    fn batch_size_only_applies_to_partial_jobs() {
        let mut form = JobForm {
            source: DomainSource::Uploaded,
            batch_size: "50".to_string(),
            ..JobForm::default()
        };
        assert_eq!(form.validate(now()).unwrap().batch_size, None);

        form.job_type = JobType::PartialScraping;
        assert_eq!(form.validate(now()).unwrap().batch_size, Some(50));

        form.batch_size = String::new();
        assert_eq!(
            form.validate(now()).unwrap().batch_size,
            Some(DEFAULT_BATCH_SIZE)
        );
    }

    #[test]
    fn external_source_needs_an_http_url() {
        let form = JobForm {
            source: DomainSource::ExternalApi,
            external_url: "ftp://example.com/list.json".to_string(),
            ..JobForm::default()
        };
        assert!(form.validate(now()).is_err());
    }
}
