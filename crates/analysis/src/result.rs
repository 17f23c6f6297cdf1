use {
    crate::AnalysisError,
    serde::{Deserialize, Deserializer, de::Error as _},
    std::fmt,
};

/// Coarse severity reported by the service.
///
/// Known Indonesian levels are recognised case-insensitively; anything else
/// is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
    Other(String),
}

impl Severity {
    pub fn parse(text: &str) -> Self {
        match text.trim().to_lowercase().as_str() {
            "ringan" => Severity::Mild,
            "sedang" => Severity::Moderate,
            "berat" => Severity::Severe,
            _ => Severity::Other(text.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Severity::Mild => "ringan",
            Severity::Moderate => "sedang",
            Severity::Severe => "berat",
            Severity::Other(text) => text,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Severity::Other(_))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub annotated_image_url: String,
    pub acne_count: u32,
    pub severity: Severity,
    pub analysis_text: String,
}

// body of a 200 answer from /predict
#[derive(Deserialize)]
struct Prediction {
    image_url: String,
    #[serde(deserialize_with = "count")]
    jumlah_jerawat: u32,
    tingkat_keparahan: String,
    analisa: String,
}

// a non-negative integer, also when sent as an integral float (3.0)
fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(n) = number.as_u64() {
        return u32::try_from(n).map_err(|_| D::Error::custom(format!("count out of range: {n}")));
    }
    match number.as_f64() {
        Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 => Ok(f as u32),
        _ => Err(D::Error::custom(format!("not a count: {number}"))),
    }
}

impl From<Prediction> for AnalysisResult {
    fn from(prediction: Prediction) -> Self {
        Self {
            annotated_image_url: prediction.image_url,
            acne_count: prediction.jumlah_jerawat,
            severity: Severity::parse(&prediction.tingkat_keparahan),
            analysis_text: prediction.analisa,
        }
    }
}

impl AnalysisResult {
    /// Parse a prediction body. Missing or mistyped fields are
    /// `MalformedResponse`.
    pub fn from_json(body: &[u8]) -> Result<Self, AnalysisError> {
        let prediction: Prediction = serde_json::from_slice(body)?;
        Ok(prediction.into())
    }
}
