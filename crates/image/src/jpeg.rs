use {crate::*, base::Vec2, crates_image::ImageEncoder};

/// Quality used for snapshots when nothing else is configured.
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

pub fn rgb_to_jpeg(size: Vec2<usize>, data: &[u8], quality: u8) -> Result<Vec<u8>, ImageError> {
    let mut buffer = Vec::new();
    let encoder = crates_image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .write_image(
            data,
            size.x as u32,
            size.y as u32,
            crates_image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| ImageError::Encode(e.to_string()))?;
    Ok(buffer)
}

fn encode_jpeg_inner(image: &Image, quality: u8, mirrored: bool) -> Result<Vec<u8>, ImageError> {
    // MJPEG frames that need no flip go out untouched
    if image.format == PixelFormat::Jpeg && !mirrored {
        image.validate()?;
        return Ok(image.data.clone());
    }

    let mut rgb = to_rgb(image)?;
    if mirrored {
        mirror_rgb(rgb.size, &mut rgb.data);
    }
    rgb_to_jpeg(rgb.size, &rgb.data, quality)
}

/// Encodes a frame as JPEG bytes, optionally mirrored horizontally.
///
/// `quality` runs 1-100. Runs on tokio's blocking thread pool.
///
/// # Errors
///
/// Returns `ImageError::Size` if the frame buffer does not match its size,
/// `ImageError::Decode` for an unreadable MJPEG frame and
/// `ImageError::Encode` if the encoder fails.
pub async fn encode_jpeg(image: Image, quality: u8, mirrored: bool) -> Result<Vec<u8>, ImageError> {
    tokio::task::spawn_blocking(move || encode_jpeg_inner(&image, quality, mirrored))
        .await
        .map_err(|e| ImageError::Encode(e.to_string()))?
}
