//! Client for the remote acne prediction service.
//!
//! `AnalysisClient::submit` posts one image as `multipart/form-data` under
//! the field `image` and maps the JSON answer into an `AnalysisResult`.

pub mod client;
pub mod config;
pub mod error;
pub mod payload;
pub mod result;

#[cfg(feature = "mock")]
pub mod mock;

pub use client::AnalysisClient;
pub use config::{AnalysisConfig, DEFAULT_ENDPOINT, IMAGE_FIELD};
pub use error::AnalysisError;
pub use payload::{CAPTURE_FILE_NAME, CapturedImage, ImageSource};
pub use result::{AnalysisResult, Severity};
