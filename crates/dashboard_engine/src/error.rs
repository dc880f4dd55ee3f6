use dashboard_core::{DomainFileError, Failure, FailureKind};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{0}")]
    Network(String),
    #[error("{0}")]
    Timeout(String),
    #[error("HTTP {status}: {detail}")]
    Server { status: u16, detail: String },
    #[error("{0}")]
    Decode(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("response exceeds {max_bytes} bytes")]
    TooLarge { max_bytes: u64 },
    /// A 2xx reply whose body says `success: false`.
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    DomainFile(#[from] DomainFileError),
}

impl ApiError {
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout(err.to_string())
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<ApiError> for Failure {
    fn from(err: ApiError) -> Self {
        let kind = match &err {
            ApiError::Network(_) | ApiError::InvalidUrl(_) => FailureKind::Network,
            ApiError::Timeout(_) => FailureKind::Timeout,
            ApiError::Server { status, .. } => FailureKind::Server { status: *status },
            ApiError::Rejected(_) => FailureKind::Server { status: 200 },
            ApiError::Decode(_) | ApiError::TooLarge { .. } => FailureKind::Decode,
            ApiError::DomainFile(_) => FailureKind::Validation,
        };
        let message = match err {
            ApiError::Server { detail, .. } => detail,
            other => other.to_string(),
        };
        Failure::new(kind, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_detail_becomes_the_failure_message() {
        let failure = Failure::from(ApiError::Server {
            status: 409,
            detail: "Parsing already running".to_string(),
        });
        assert_eq!(failure.kind, FailureKind::Server { status: 409 });
        assert_eq!(failure.message, "Parsing already running");
    }
}
