use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    Config(String),
    Payload(String),
    Network(String),
    Server(u16),
    MalformedResponse(String),
}

impl AnalysisError {
    /// Whether sending the same image again may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AnalysisError::Network(_) | AnalysisError::Server(_) | AnalysisError::MalformedResponse(_)
        )
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::Config(msg) => write!(f, "invalid configuration: {msg}"),
            AnalysisError::Payload(msg) => write!(f, "invalid image payload: {msg}"),
            AnalysisError::Network(msg) => write!(f, "network error: {msg}"),
            AnalysisError::Server(status) => write!(f, "server error: HTTP {status}"),
            AnalysisError::MalformedResponse(msg) => write!(f, "malformed response: {msg}"),
        }
    }
}

impl std::error::Error for AnalysisError {}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            AnalysisError::Server(status.as_u16())
        } else if err.is_decode() {
            AnalysisError::MalformedResponse(err.to_string())
        } else if err.is_builder() {
            AnalysisError::Config(err.to_string())
        } else {
            AnalysisError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        AnalysisError::MalformedResponse(err.to_string())
    }
}
