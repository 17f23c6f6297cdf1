use {
    crate::*,
    base64::{Engine, engine::general_purpose::STANDARD},
    reqwest::multipart::{Form, Part},
};

// `data:<type>;base64,<payload>` images are decoded here, without a request
fn decode_data_url(url: &str) -> Option<Result<Vec<u8>, AnalysisError>> {
    let rest = url.strip_prefix("data:")?;
    let decoded = match rest.split_once(',') {
        Some((header, payload)) if header.ends_with(";base64") => STANDARD
            .decode(payload.trim())
            .map_err(|e| AnalysisError::MalformedResponse(format!("data URL: {e}"))),
        _ => Err(AnalysisError::MalformedResponse(
            "only base64 data URLs are supported".to_string(),
        )),
    };
    Some(decoded)
}

/// Submits images to the prediction endpoint.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone, Debug)]
pub struct AnalysisClient {
    http: reqwest::Client,
    endpoint: reqwest::Url,
}

impl AnalysisClient {
    /// Build a client for `config`.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::Config` if the endpoint is not an absolute
    /// http(s) URL or the HTTP client cannot be built.
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        let endpoint = reqwest::Url::parse(config.endpoint())
            .map_err(|e| AnalysisError::Config(format!("endpoint {}: {}", config.endpoint(), e)))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(AnalysisError::Config(format!(
                "endpoint {} must be http or https",
                endpoint
            )));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| AnalysisError::Config(e.to_string()))?;

        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    fn form(image: &CapturedImage) -> Result<Form, AnalysisError> {
        let mut part = Part::bytes(image.bytes.clone())
            .mime_str(&image.media_type)
            .map_err(|e| AnalysisError::Payload(format!("media type {}: {}", image.media_type, e)))?;
        if let Some(file_name) = &image.file_name {
            part = part.file_name(file_name.clone());
        }
        Ok(Form::new().part(IMAGE_FIELD, part))
    }

    async fn try_submit(&self, image: &CapturedImage) -> Result<AnalysisResult, AnalysisError> {
        let form = Self::form(image)?;
        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::Server(status.as_u16()));
        }

        let body = response.bytes().await?;
        AnalysisResult::from_json(&body)
    }

    /// Post `image` and parse the prediction.
    ///
    /// Failures are logged here; the caller decides what to show.
    pub async fn submit(&self, image: &CapturedImage) -> Result<AnalysisResult, AnalysisError> {
        log::debug!("submitting {} to {}", image, self.endpoint);
        let result = self.try_submit(image).await;
        match &result {
            Ok(analysis) => log::info!(
                "analysis received: {} lesions, severity {}",
                analysis.acne_count,
                analysis.severity
            ),
            Err(error) => log::error!("Error sending image to backend: {}", error),
        }
        result
    }

    /// Download the annotated image a result points at.
    ///
    /// Relative URLs resolve against the endpoint. Base64 `data:` URLs are
    /// decoded in place.
    pub async fn fetch_annotated_image(&self, result: &AnalysisResult) -> Result<Vec<u8>, AnalysisError> {
        if let Some(decoded) = decode_data_url(&result.annotated_image_url) {
            return decoded;
        }
        let url = reqwest::Url::parse(&result.annotated_image_url)
            .or_else(|_| self.endpoint.join(&result.annotated_image_url))
            .map_err(|e| {
                AnalysisError::MalformedResponse(format!(
                    "image_url {}: {}",
                    result.annotated_image_url, e
                ))
            })?;

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::Server(status.as_u16()));
        }
        Ok(response.bytes().await?.to_vec())
    }
}
