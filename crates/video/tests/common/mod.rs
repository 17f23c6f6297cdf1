#![allow(dead_code)]

use base::Vec2;
use image::{Image, PixelFormat};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use video::{VideoBackend, VideoDevice, VideoError, VideoInDevice};

/// Counters shared between a mock device and the test body.
#[derive(Default)]
pub struct DeviceStats {
    pub opened: AtomicUsize,
    pub closed: AtomicUsize,
    pub captured: AtomicUsize,
}

impl DeviceStats {
    pub fn is_open(&self) -> bool {
        self.opened.load(Ordering::SeqCst) > self.closed.load(Ordering::SeqCst)
    }
}

pub struct MockDevice {
    stats: Arc<DeviceStats>,
    fail_open: bool,
    fail_after: Option<usize>,
    open: bool,
}

impl VideoInDevice for MockDevice {
    fn open(&mut self) -> Result<(), VideoError> {
        if self.fail_open {
            return Err(VideoError::Device("cannot open".to_string()));
        }
        self.open = true;
        self.stats.opened.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn close(&mut self) {
        if self.open {
            self.open = false;
            self.stats.closed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn blocking_capture(&mut self) -> Result<Image, VideoError> {
        std::thread::sleep(std::time::Duration::from_millis(2));
        if self
            .fail_after
            .is_some_and(|limit| self.stats.captured.load(Ordering::SeqCst) >= limit)
        {
            return Err(VideoError::Stream("unplugged".to_string()));
        }
        self.stats.captured.fetch_add(1, Ordering::SeqCst);
        Ok(Image::new(Vec2::new(2, 1), vec![128; 4], PixelFormat::Yuyv))
    }
}

pub struct MockBackend {
    pub devices: Mutex<Result<Vec<VideoDevice>, VideoError>>,
    pub stats: Mutex<Vec<(String, Arc<DeviceStats>)>>,
    pub fail_open: bool,
    /// Every capture after this many frames fails.
    pub fail_after: Option<usize>,
}

impl MockBackend {
    pub fn with_devices(devices: Vec<VideoDevice>) -> Self {
        Self {
            devices: Mutex::new(Ok(devices)),
            stats: Mutex::new(Vec::new()),
            fail_open: false,
            fail_after: None,
        }
    }

    pub fn failing(error: VideoError) -> Self {
        Self {
            devices: Mutex::new(Err(error)),
            stats: Mutex::new(Vec::new()),
            fail_open: false,
            fail_after: None,
        }
    }

    /// Stats of every handle created for `id`, oldest first.
    pub fn stats_for(&self, id: &str) -> Vec<Arc<DeviceStats>> {
        self.stats
            .lock()
            .unwrap()
            .iter()
            .filter(|(device, _)| device == id)
            .map(|(_, stats)| Arc::clone(stats))
            .collect()
    }
}

impl VideoBackend for MockBackend {
    fn enumerate(&self) -> Result<Vec<VideoDevice>, VideoError> {
        self.devices.lock().unwrap().clone()
    }

    fn create(&self, device: &VideoDevice) -> Result<Box<dyn VideoInDevice>, VideoError> {
        let stats = Arc::new(DeviceStats::default());
        self.stats
            .lock()
            .unwrap()
            .push((device.id.clone(), Arc::clone(&stats)));
        Ok(Box::new(MockDevice {
            stats,
            fail_open: self.fail_open,
            fail_after: self.fail_after,
            open: false,
        }))
    }
}

pub fn two_cameras() -> Vec<VideoDevice> {
    vec![
        VideoDevice::new("/dev/video0", "Integrated Camera"),
        VideoDevice::new("/dev/video2", ""),
    ]
}
