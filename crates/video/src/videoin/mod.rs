use {
    crate::*,
    image::Image,
    std::sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    tokio::{
        sync::watch,
        task::{JoinHandle, spawn_blocking},
    },
};

// delay before reconnecting after failure
const WAIT_BEFORE_RECONNECT_MS: u64 = 100;

/// One opened capture device. Every method may block.
pub trait VideoInDevice: Send {
    fn open(&mut self) -> Result<(), VideoError>; // open the device
    fn close(&mut self); // close the device, if open
    fn blocking_capture(&mut self) -> Result<Image, VideoError>; // capture a frame
}

/// A bound device streaming frames on a blocking worker.
///
/// Only the newest frame is kept. The camera is released by `release()`,
/// or, without waiting, when the feed is dropped.
pub struct LiveFeed {
    device: VideoDevice,
    frames: watch::Receiver<Option<VideoFrame>>,
    cancel: Arc<AtomicBool>,
    join_handle: Option<JoinHandle<()>>,
}

impl LiveFeed {
    /// Bind `device`: create its handle, open it on the worker thread and
    /// start pumping frames.
    ///
    /// # Errors
    ///
    /// Whatever the backend reports when creating or opening the device.
    pub async fn bind(device: &VideoDevice, backend: &dyn VideoBackend) -> Result<Self, VideoError> {
        let handle = backend.create(device)?;
        let (sender, frames) = watch::channel(None);
        let cancel = Arc::new(AtomicBool::new(false));

        let join_handle = Self::spawn_worker(handle, sender, Arc::clone(&cancel)).await?;
        log::info!("bound video device {}", device.id);

        Ok(Self {
            device: device.clone(),
            frames,
            cancel,
            join_handle: Some(join_handle),
        })
    }

    async fn spawn_worker(
        mut device: Box<dyn VideoInDevice>,
        sender: watch::Sender<Option<VideoFrame>>,
        cancel: Arc<AtomicBool>,
    ) -> Result<JoinHandle<()>, VideoError> {
        // open() runs on the capture thread, some drivers care
        let (init_tx, init_rx) = tokio::sync::oneshot::channel::<Result<(), VideoError>>();

        let join_handle = spawn_blocking(move || {
            match device.open() {
                Ok(()) => {
                    let _ = init_tx.send(Ok(()));
                }
                Err(e) => {
                    let _ = init_tx.send(Err(e));
                    return;
                }
            }

            let mut index = 0u64;
            while !cancel.load(Ordering::Relaxed) {
                // keep pumping frames until capturing fails
                while !cancel.load(Ordering::Relaxed) {
                    match device.blocking_capture() {
                        Ok(image) => {
                            index += 1;
                            if sender.send(Some(VideoFrame { image, index })).is_err() {
                                // every receiver is gone
                                device.close();
                                return;
                            }
                        }
                        Err(e) => {
                            log::error!("video worker: capture failed: {}", e);
                            // no frame to snapshot while the device is gone
                            sender.send_replace(None);
                            break;
                        }
                    }
                }

                // close, wait, and reopen the device
                while !cancel.load(Ordering::Relaxed) {
                    log::info!("video worker: reconnecting...");
                    device.close();
                    std::thread::sleep(std::time::Duration::from_millis(WAIT_BEFORE_RECONNECT_MS));
                    if device.open().is_ok() {
                        break;
                    }
                }
            }
            device.close();
        });

        init_rx
            .await
            .map_err(|_| VideoError::Device("Worker thread died during init".to_string()))??;

        Ok(join_handle)
    }

    pub fn device(&self) -> &VideoDevice {
        &self.device
    }

    /// Newest frame, `None` until the first one arrives.
    pub fn latest(&self) -> Option<VideoFrame> {
        self.frames.borrow().clone()
    }

    pub fn has_frame(&self) -> bool {
        self.frames.borrow().is_some()
    }

    /// Receiver for preview loops that want to wait on new frames.
    pub fn subscribe(&self) -> watch::Receiver<Option<VideoFrame>> {
        self.frames.clone()
    }

    /// Stop the worker and wait until the device is closed.
    pub async fn release(mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        if let Some(join_handle) = self.join_handle.take() {
            if let Err(e) = join_handle.await {
                log::error!("video worker for {} ended abnormally: {}", self.device.id, e);
            }
        }
        log::info!("released video device {}", self.device.id);
    }
}

impl Drop for LiveFeed {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}

#[cfg(feature = "v4l2")]
mod v4l2;

#[cfg(feature = "v4l2")]
pub use v4l2::{V4l2Backend, V4l2Config};
