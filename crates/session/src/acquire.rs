use {
    analysis::CapturedImage,
    image::DEFAULT_JPEG_QUALITY,
    std::{fmt, path::Path},
    video::{LiveFeed, VideoFrame},
};

/// How live-feed snapshots are encoded.
#[derive(Clone, Debug)]
pub struct CaptureOptions {
    quality: u8,
    mirrored: bool,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            quality: DEFAULT_JPEG_QUALITY,
            mirrored: true,
        }
    }
}

impl CaptureOptions {
    /// Set the JPEG quality (clamped to 1-100).
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    /// Flip snapshots horizontally, like the mirrored preview.
    pub fn with_mirrored(mut self, mirrored: bool) -> Self {
        self.mirrored = mirrored;
        self
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    pub fn mirrored(&self) -> bool {
        self.mirrored
    }
}

#[derive(Debug)]
pub enum AcquireError {
    Io(std::io::Error),
    NotAnImage(String),
}

impl fmt::Display for AcquireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcquireError::Io(err) => write!(f, "io error: {err}"),
            AcquireError::NotAnImage(path) => write!(f, "not an image file: {path}"),
        }
    }
}

impl std::error::Error for AcquireError {}

impl From<std::io::Error> for AcquireError {
    fn from(err: std::io::Error) -> Self {
        AcquireError::Io(err)
    }
}

/// Encode one frame as the `capture.jpg` payload.
pub async fn snapshot(frame: VideoFrame, options: &CaptureOptions) -> Option<CapturedImage> {
    match image::encode_jpeg(frame.image, options.quality, options.mirrored).await {
        Ok(jpeg) => Some(CapturedImage::from_capture(jpeg)),
        Err(e) => {
            log::error!("failed to encode frame {}: {}", frame.index, e);
            None
        }
    }
}

/// Snapshot the bound device's current frame.
///
/// A no-op (`None`) when nothing is bound or no frame has arrived yet.
pub async fn capture_from_live_feed(
    feed: Option<&LiveFeed>,
    options: &CaptureOptions,
) -> Option<CapturedImage> {
    let Some(feed) = feed else {
        log::debug!("capture ignored: no video device bound");
        return None;
    };
    let Some(frame) = feed.latest() else {
        log::debug!("capture ignored: {} has not delivered a frame", feed.device().id);
        return None;
    };
    snapshot(frame, options).await
}

/// Read a user-chosen image file without touching its contents.
///
/// The media type is whatever `image/*` type the extension claims. Only files
/// without an extension are sniffed. Nothing else is validated.
pub async fn acquire_from_file(path: &Path) -> Result<CapturedImage, AcquireError> {
    let bytes = tokio::fs::read(path).await?;

    let media_type = match path.extension() {
        Some(_) => image::media_type_for_path(path),
        None => image::sniff_media_type(&bytes),
    }
    .ok_or_else(|| AcquireError::NotAnImage(path.display().to_string()))?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());

    Ok(CapturedImage::from_file(bytes, media_type, file_name))
}
