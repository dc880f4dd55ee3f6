use serde::Deserialize;
use url::Url;

use crate::model::DomainList;
use crate::resource::Failure;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainFileError {
    #[error("file is not valid JSON: {0}")]
    MalformedJson(String),
    #[error("expected an object with a `data` or `domains` array of strings")]
    UnexpectedShape,
    #[error("the file contains no domains")]
    Empty,
}

impl From<DomainFileError> for Failure {
    fn from(err: DomainFileError) -> Self {
        Failure::validation(err.to_string())
    }
}

/// The two accepted upload shapes: `{status, data: [...]}` and `{domains: [...]}`.
#[derive(Deserialize)]
struct DomainFile {
    #[serde(default)]
    data: Option<Vec<String>>,
    #[serde(default)]
    domains: Option<Vec<String>>,
}

/// Parse a domain file body. Entries are trimmed and blank entries dropped;
/// order is preserved.
pub fn parse_domain_payload(raw: &str) -> Result<DomainList, DomainFileError> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|err| DomainFileError::MalformedJson(err.to_string()))?;
    if !value.is_object() {
        return Err(DomainFileError::UnexpectedShape);
    }
    let file: DomainFile =
        serde_json::from_value(value).map_err(|_| DomainFileError::UnexpectedShape)?;
    let entries = file
        .data
        .or(file.domains)
        .ok_or(DomainFileError::UnexpectedShape)?;

    let domains = clean_entries(entries.iter().map(String::as_str));
    if domains.is_empty() {
        return Err(DomainFileError::Empty);
    }
    Ok(DomainList::new(domains))
}

/// Split newline-separated text into domains.
pub fn parse_manual_domains(raw: &str) -> Vec<String> {
    clean_entries(raw.lines())
}

fn clean_entries<'a>(entries: impl Iterator<Item = &'a str>) -> Vec<String> {
    entries
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Accept only absolute http(s) URLs.
pub fn validate_http_url(raw: &str) -> Result<Url, Failure> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Failure::validation("A URL is required"));
    }
    let url = Url::parse(raw).map_err(|err| Failure::validation(format!("Invalid URL: {err}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Failure::validation(format!(
            "Unsupported URL scheme '{other}', expected http or https"
        ))),
    }
}
