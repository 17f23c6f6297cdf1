use std::fmt;

/// File name sent for live-feed snapshots.
pub const CAPTURE_FILE_NAME: &str = "capture.jpg";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    LiveFeed,
    File,
}

/// An image ready for submission.
#[derive(Clone, PartialEq)]
pub struct CapturedImage {
    pub source: ImageSource,
    pub bytes: Vec<u8>,
    pub media_type: String,
    pub file_name: Option<String>,
}

impl CapturedImage {
    /// A JPEG snapshot from the live feed, always named `capture.jpg`.
    pub fn from_capture(jpeg: Vec<u8>) -> Self {
        Self {
            source: ImageSource::LiveFeed,
            bytes: jpeg,
            media_type: "image/jpeg".to_string(),
            file_name: Some(CAPTURE_FILE_NAME.to_string()),
        }
    }

    /// A user-chosen file, passed through as-is.
    pub fn from_file(bytes: Vec<u8>, media_type: impl Into<String>, file_name: Option<String>) -> Self {
        Self {
            source: ImageSource::File,
            bytes,
            media_type: media_type.into(),
            file_name,
        }
    }

    pub fn is_raw_file(&self) -> bool {
        self.source == ImageSource::File
    }
}

// keep image bytes out of debug logs
impl fmt::Debug for CapturedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapturedImage")
            .field("source", &self.source)
            .field("bytes", &self.bytes.len())
            .field("media_type", &self.media_type)
            .field("file_name", &self.file_name)
            .finish()
    }
}

impl fmt::Display for CapturedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {} bytes)",
            self.file_name.as_deref().unwrap_or("<unnamed>"),
            self.media_type,
            self.bytes.len()
        )
    }
}
