use {crate::*, base::Vec2};

/// One raw frame or still, tagged with its pixel layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub size: Vec2<usize>,
    pub data: Vec<u8>,
    pub format: PixelFormat,
}

impl Image {
    pub fn new(size: Vec2<usize>, data: Vec<u8>, format: PixelFormat) -> Self {
        Self { size, data, format }
    }

    /// Check that the buffer length matches size and format.
    ///
    /// JPEG data is compressed, so only a non-empty buffer is required.
    pub fn validate(&self) -> Result<(), ImageError> {
        match self.format.bytes_per_pixel() {
            Some(bpp) => {
                let expected = self.size.area() * bpp;
                if self.data.len() != expected {
                    return Err(ImageError::Size {
                        expected,
                        actual: self.data.len(),
                    });
                }
                Ok(())
            }
            None if self.data.is_empty() => Err(ImageError::Decode("empty JPEG frame".to_string())),
            None => Ok(()),
        }
    }
}
