use std::time::Duration;

/// Prediction endpoint of the hosted acne detection model.
pub const DEFAULT_ENDPOINT: &str = "https://api-acne-detection-model.vercel.app/predict";

/// Multipart field carrying the image.
pub const IMAGE_FIELD: &str = "image";

/// Configuration for the analysis client.
#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    endpoint: String,
    timeout: Option<Duration>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: None,
        }
    }
}

impl AnalysisConfig {
    /// Set the full prediction URL (including `/predict`).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set a whole-request timeout. Requests never time out by default.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}
