use {
    crate::*,
    base::Vec2,
    image::{Image, PixelFormat},
    std::path::PathBuf,
    v4l::{
        Device, Format, FourCC, buffer::Type, capability::Flags, io::mmap::Stream as MmapStream,
        io::traits::CaptureStream, video::Capture,
    },
};

// number of mmap buffers per stream
const BUFFER_COUNT: u32 = 4;

/// Preferred capture settings. `None` keeps what the driver reports.
#[derive(Debug, Clone, Default)]
pub struct V4l2Config {
    pub size: Option<Vec2<usize>>,
    pub format: Option<PixelFormat>,
    pub frame_rate: Option<u32>,
}

/// Enumerates `/dev/video*` nodes that can capture video.
#[derive(Debug, Clone, Default)]
pub struct V4l2Backend {
    config: V4l2Config,
}

impl V4l2Backend {
    pub fn new(config: V4l2Config) -> Self {
        Self { config }
    }
}

impl VideoBackend for V4l2Backend {
    fn enumerate(&self) -> Result<Vec<VideoDevice>, VideoError> {
        let mut nodes = v4l::context::enum_devices();
        nodes.sort_by_key(|node| node.index());

        let mut devices = Vec::new();
        let mut denied = None;
        for node in nodes {
            let path = node.path().to_path_buf();
            let caps = match Device::with_path(&path).and_then(|device| device.query_caps()) {
                Ok(caps) => caps,
                Err(e) => {
                    log::debug!("skipping {}: {}", path.display(), e);
                    if e.kind() == std::io::ErrorKind::PermissionDenied {
                        denied = Some(VideoError::from(e));
                    }
                    continue;
                }
            };
            // metadata nodes share the driver but cannot stream frames
            if !caps.capabilities.contains(Flags::VIDEO_CAPTURE) {
                continue;
            }
            devices.push(VideoDevice::new(path.display().to_string(), caps.card));
        }

        if devices.is_empty() {
            return Err(denied.unwrap_or(VideoError::NoDevices));
        }
        Ok(devices)
    }

    fn create(&self, device: &VideoDevice) -> Result<Box<dyn VideoInDevice>, VideoError> {
        Ok(Box::new(V4l2::new(PathBuf::from(&device.id), self.config.clone())))
    }
}

pub(crate) struct V4l2 {
    stream: Option<MmapStream<'static>>,
    path: PathBuf,
    config: V4l2Config,
    size: Vec2<usize>,
    format: PixelFormat,
}

impl V4l2 {
    pub fn new(path: PathBuf, config: V4l2Config) -> Self {
        Self {
            stream: None,
            path,
            config,
            size: Vec2::new(0, 0),
            format: PixelFormat::Yuyv,
        }
    }
}

impl VideoInDevice for V4l2 {
    fn open(&mut self) -> Result<(), VideoError> {
        // close stream
        self.stream.take();

        let device = Device::with_path(&self.path)?;
        let device_format = Capture::format(&device)?;

        // build size
        let desired_size = match self.config.size {
            Some(size) => size,
            None => Vec2::new(device_format.width as usize, device_format.height as usize),
        };

        // build pixel format
        let desired_fourcc = match self.config.format {
            Some(format) => FourCC::new(&format.as_fourcc().to_le_bytes()),
            None => device_format.fourcc,
        };

        // set the format and get the actual format back
        let actual_format = Capture::set_format(
            &device,
            &Format::new(desired_size.x as u32, desired_size.y as u32, desired_fourcc),
        )?;

        self.size = Vec2::new(actual_format.width as usize, actual_format.height as usize);
        self.format = PixelFormat::from_fourcc(u32::from_le_bytes(actual_format.fourcc.repr))
            .ok_or_else(|| {
                VideoError::Device(format!("Unsupported pixel format: {}", actual_format.fourcc))
            })?;

        if let Some(frame_rate) = self.config.frame_rate {
            Capture::set_params(&device, &v4l::video::capture::Parameters::with_fps(frame_rate))?;
        }

        self.stream = match MmapStream::with_buffers(&device, Type::VideoCapture, BUFFER_COUNT) {
            Ok(stream) => Some(stream),
            Err(error) => {
                return Err(VideoError::Stream(error.to_string()));
            }
        };

        log::debug!(
            "opened {} at {} {:?}",
            self.path.display(),
            self.size,
            self.format
        );
        Ok(())
    }

    fn close(&mut self) {
        self.stream.take();
    }

    fn blocking_capture(&mut self) -> Result<Image, VideoError> {
        let Some(stream) = self.stream.as_mut() else {
            return Err(VideoError::Stream("No stream".to_string()));
        };
        let (frame_data, metadata) =
            CaptureStream::next(stream).map_err(|e| VideoError::Stream(e.to_string()))?;

        // drivers may pad raw buffers past the payload
        let used = match self.format.bytes_per_pixel() {
            Some(bpp) => self.size.area() * bpp,
            None => metadata.bytesused as usize,
        };
        let used = used.min(frame_data.len());

        Ok(Image::new(self.size, frame_data[..used].to_vec(), self.format))
    }
}
