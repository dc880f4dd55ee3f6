use bytes::BytesMut;
use dashboard_core::{parse_domain_payload, Ack, DomainList};
use engine_logging::{engine_debug, engine_error};
use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::api::{ConfigApi, HealthApi, LogsApi, ParsingApi, ReportsApi, SchedulerApi};
use crate::error::ApiError;
use crate::settings::ClientSettings;

/// Query parameters as sent on the wire.
pub(crate) type Query<'a> = &'a [(&'static str, String)];

/// HTTP client for the scraper backend. Every request goes through `send`,
/// which logs it and turns error statuses into `ApiError::Server`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    settings: ClientSettings,
}

impl ApiClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(ApiError::from_reqwest)?;
        Ok(Self { http, settings })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub fn parsing(&self) -> ParsingApi<'_> {
        ParsingApi::new(self)
    }

    pub fn config(&self) -> ConfigApi<'_> {
        ConfigApi::new(self)
    }

    pub fn scheduler(&self) -> SchedulerApi<'_> {
        SchedulerApi::new(self)
    }

    pub fn reports(&self) -> ReportsApi<'_> {
        ReportsApi::new(self)
    }

    pub fn logs(&self) -> LogsApi<'_> {
        LogsApi::new(self)
    }

    pub fn health(&self) -> HealthApi<'_> {
        HealthApi::new(self)
    }

    /// GET an arbitrary URL serving a domain file and parse it client-side.
    pub async fn fetch_external_domains(&self, url: &str) -> Result<DomainList, ApiError> {
        let url = Url::parse(url).map_err(|err| ApiError::InvalidUrl(err.to_string()))?;
        let response = self.send(Method::GET, &url, self.http.get(url.clone())).await?;
        let body = response.text().await.map_err(ApiError::from_reqwest)?;
        Ok(parse_domain_payload(&body)?)
    }

    pub(crate) fn endpoint(&self, path: &str, query: Query<'_>) -> Result<Url, ApiError> {
        let mut url = Url::parse(&format!("{}{}", self.settings.base_url, path))
            .map_err(|err| ApiError::InvalidUrl(err.to_string()))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(key, value)| (*key, value.as_str())));
        }
        Ok(url)
    }

    /// `path` followed by raw segments, each percent-encoded as one path
    /// segment so user-typed ids cannot change the route.
    pub(crate) fn segment_endpoint(&self, path: &str, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.endpoint(path, &[])?;
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(format!("{path} cannot take path segments")))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Query<'_>,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path, query)?;
        self.get_url(url).await
    }

    pub(crate) async fn get_url<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let response = self.send(Method::GET, &url, self.http.get(url.clone())).await?;
        decode(&url, response).await
    }

    pub(crate) async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        query: Query<'_>,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path, query)?;
        let mut request = self.http.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = self.send(method, &url, request).await?;
        decode(&url, response).await
    }

    /// A mutating call answered by a `{success, message}` acknowledgement.
    pub(crate) async fn ack<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: Query<'_>,
        body: Option<&B>,
    ) -> Result<Ack, ApiError> {
        let url = self.endpoint(path, query)?;
        self.ack_url(method, url, body).await
    }

    pub(crate) async fn ack_url<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<Ack, ApiError> {
        let mut request = self.http.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = self.send(method, &url, request).await?;
        let bytes = response.bytes().await.map_err(ApiError::from_reqwest)?;
        let ack = decode_ack(&bytes);
        if ack.is_rejected() {
            let reason = ack
                .error
                .or(ack.message)
                .unwrap_or_else(|| "request rejected by the server".to_string());
            engine_error!("API error: {url} rejected: {reason}");
            return Err(ApiError::Rejected(reason));
        }
        Ok(ack)
    }

    /// Stream a binary body, failing once it grows past `max_export_bytes`.
    pub(crate) async fn download(&self, path: &str, query: Query<'_>) -> Result<Vec<u8>, ApiError> {
        let url = self.endpoint(path, query)?;
        let max_bytes = self.settings.max_export_bytes;
        let response = self.send(Method::GET, &url, self.http.get(url.clone())).await?;
        if response.content_length().is_some_and(|len| len > max_bytes) {
            return Err(ApiError::TooLarge { max_bytes });
        }

        let mut buffer = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(ApiError::from_reqwest)?;
            if buffer.len() as u64 + chunk.len() as u64 > max_bytes {
                engine_error!("API error: {url} exceeded {max_bytes} bytes");
                return Err(ApiError::TooLarge { max_bytes });
            }
            buffer.extend_from_slice(&chunk);
        }
        engine_debug!("downloaded {} bytes from {url}", buffer.len());
        Ok(buffer.to_vec())
    }

    async fn send(
        &self,
        method: Method,
        url: &Url,
        request: RequestBuilder,
    ) -> Result<Response, ApiError> {
        engine_debug!("{method} {url}");
        let response = request.send().await.map_err(|err| {
            let err = ApiError::from_reqwest(err);
            engine_error!("Network error: {method} {url}: {err}");
            err
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let detail = error_detail(status, &body);
        engine_error!("API error: {method} {url} -> {}: {detail}", status.as_u16());
        Err(ApiError::Server {
            status: status.as_u16(),
            detail,
        })
    }
}

async fn decode<T: DeserializeOwned>(url: &Url, response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await.map_err(ApiError::from_reqwest)?;
    serde_json::from_slice(&bytes).map_err(|err| {
        engine_error!("API error: {url} returned an unexpected body: {err}");
        ApiError::Decode(err.to_string())
    })
}

/// Acks are lenient: an empty body or an unrelated JSON object still counts
/// as success; only an explicit `success: false` is a rejection.
fn decode_ack(bytes: &[u8]) -> Ack {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ack::default();
    }
    serde_json::from_slice(bytes).unwrap_or_default()
}

/// Pull the FastAPI `detail` field out of an error body.
fn error_detail(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        match value.get("detail").or_else(|| value.get("message")) {
            Some(serde_json::Value::String(detail)) => return detail.clone(),
            Some(other) => return other.to_string(),
            None => {}
        }
    }
    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.chars().take(200).collect()
    }
}
