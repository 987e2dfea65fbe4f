/// Error types for the translation module
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MtError {
    /// The request is missing text or a target language
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// A language code contains characters no provider accepts
    #[error("Invalid locale: {0}")]
    InvalidLocale(String),
    /// Provider or service configuration is unusable
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Transport failure (connection refused, timeout, TLS, ...)
    #[error("Network error: {0}")]
    NetworkError(String),
    /// Upstream answered with a non-2xx status
    #[error("{provider} returned HTTP {status}")]
    HttpStatus { provider: String, status: u16 },
    /// Upstream answered 2xx but without the expected success signal
    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },
    /// Language detection is not configured
    #[error("Language detection is not configured")]
    DetectionUnavailable,
    /// Every provider in the cascade failed
    #[error("All translation providers failed")]
    AllProvidersFailed,
}

impl MtError {
    pub(crate) fn invalid_response(provider: &str, reason: impl Into<String>) -> Self {
        MtError::InvalidResponse {
            provider: provider.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for MtError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            MtError::NetworkError(format!("request timed out: {}", error))
        } else {
            MtError::NetworkError(error.to_string())
        }
    }
}

/// Result type for translation operations
pub type MtResult<T> = Result<T, MtError>;
