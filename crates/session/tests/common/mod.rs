#![allow(dead_code)]

use analysis::AnalysisResult;
use analysis::Severity;
use base::Vec2;
use image::{Image, PixelFormat};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use video::{VideoBackend, VideoDevice, VideoError, VideoInDevice};

pub const PREDICTION: &str =
    r#"{"image_url":"u","jumlah_jerawat":3,"tingkat_keparahan":"sedang","analisa":"x"}"#;

#[derive(Default)]
pub struct DeviceStats {
    pub opened: AtomicUsize,
    pub closed: AtomicUsize,
}

impl DeviceStats {
    pub fn is_open(&self) -> bool {
        self.opened.load(Ordering::SeqCst) > self.closed.load(Ordering::SeqCst)
    }
}

struct FakeCamera {
    stats: Arc<DeviceStats>,
    open: bool,
}

impl VideoInDevice for FakeCamera {
    fn open(&mut self) -> Result<(), VideoError> {
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
        // 4x2 YUYV, mid grey
        Ok(Image::new(Vec2::new(4, 2), vec![128; 16], PixelFormat::Yuyv))
    }
}

/// Backend with a fixed device list that hands out fake cameras.
pub struct FakeBackend {
    devices: Vec<VideoDevice>,
    stats: Mutex<Vec<(String, Arc<DeviceStats>)>>,
}

impl FakeBackend {
    pub fn new(devices: Vec<VideoDevice>) -> Arc<Self> {
        Arc::new(Self {
            devices,
            stats: Mutex::new(Vec::new()),
        })
    }

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

impl VideoBackend for FakeBackend {
    fn enumerate(&self) -> Result<Vec<VideoDevice>, VideoError> {
        if self.devices.is_empty() {
            return Err(VideoError::NoDevices);
        }
        Ok(self.devices.clone())
    }

    fn create(&self, device: &VideoDevice) -> Result<Box<dyn VideoInDevice>, VideoError> {
        let stats = Arc::new(DeviceStats::default());
        self.stats
            .lock()
            .unwrap()
            .push((device.id.clone(), Arc::clone(&stats)));
        Ok(Box::new(FakeCamera { stats, open: false }))
    }
}

pub fn two_cameras() -> Vec<VideoDevice> {
    vec![
        VideoDevice::new("/dev/video0", "Integrated Camera"),
        VideoDevice::new("/dev/video2", ""),
    ]
}

pub fn result(url: &str, count: u32, severity: &str, text: &str) -> AnalysisResult {
    AnalysisResult {
        annotated_image_url: url.to_string(),
        acne_count: count,
        severity: Severity::parse(severity),
        analysis_text: text.to_string(),
    }
}

pub fn png_bytes() -> Vec<u8> {
    vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0xFF, 0x00, 0xFE, 0x42]
}

/// Write `bytes` to a fresh file under the temp dir.
pub fn temp_file(name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("jerawat-session-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}
