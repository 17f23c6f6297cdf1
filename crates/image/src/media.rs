use std::path::Path;

/// Image media type claimed by a file's extension.
///
/// Covers every `image/*` type `mime_guess` knows (HEIC, SVG, ...), not only
/// the formats this crate can decode. Non-image extensions give `None`.
pub fn media_type_for_path(path: &Path) -> Option<&'static str> {
    mime_guess::from_path(path)
        .first_raw()
        .filter(|media_type| is_image_media_type(media_type))
}

/// Media type sniffed from the leading bytes of an encoded image.
pub fn sniff_media_type(data: &[u8]) -> Option<&'static str> {
    crates_image::guess_format(data)
        .ok()
        .map(|format| format.to_mime_type())
}

pub fn is_image_media_type(media_type: &str) -> bool {
    media_type.starts_with("image/")
}
