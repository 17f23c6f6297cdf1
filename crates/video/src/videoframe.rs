use image::Image;

#[derive(Debug, Clone, PartialEq)]
pub struct VideoFrame {
    pub image: Image,
    // frames since the device was bound, starting at 1
    pub index: u64,
}
