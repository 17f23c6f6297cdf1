use {
    crate::*,
    analysis::{AnalysisClient, CapturedImage},
    base::Stamped,
    std::{path::Path, sync::Arc},
    tokio::{sync::watch, task::JoinHandle},
    video::{DeviceRegistry, LiveFeed, VideoBackend, VideoError},
};

/// Capture-and-analyze workflow for one user.
///
/// Acquisitions are submitted immediately on a spawned task. Submissions are
/// never cancelled; the `ResultStore` drops answers to superseded requests.
pub struct Session {
    backend: Arc<dyn VideoBackend>,
    registry: DeviceRegistry,
    feed: Option<LiveFeed>,
    client: AnalysisClient,
    store: ResultStore,
    options: CaptureOptions,
    last_capture: Option<CapturedImage>,
}

impl Session {
    pub fn new(backend: Arc<dyn VideoBackend>, client: AnalysisClient, options: CaptureOptions) -> Self {
        Self {
            backend,
            registry: DeviceRegistry::new(),
            feed: None,
            client,
            store: ResultStore::new(),
            options,
            last_capture: None,
        }
    }

    /// Enumerate devices and bind the selected one.
    pub async fn start(&mut self) {
        self.refresh_devices().await;
    }

    /// Re-enumerate devices; rebinds if the selection changed.
    pub async fn refresh_devices(&mut self) {
        let before = self.registry.selected_id().map(str::to_string);
        self.registry.refresh(Arc::clone(&self.backend)).await;
        log::info!("{} video device(s) available", self.registry.devices().len());

        let bound = self.feed.as_ref().map(|feed| feed.device().id.clone());
        let selected = self.registry.selected_id().map(str::to_string);
        if before != selected || bound != selected {
            self.rebind().await;
        }
    }

    /// Switch to another device. The previous camera is released first.
    pub async fn select_device(&mut self, id: &str) -> Result<(), VideoError> {
        let already_bound = self
            .feed
            .as_ref()
            .is_some_and(|feed| feed.device().id == id);
        self.registry.select(id)?;
        if !already_bound {
            self.rebind().await;
        }
        Ok(())
    }

    async fn rebind(&mut self) {
        if let Some(feed) = self.feed.take() {
            feed.release().await;
        }
        let Some(device) = self.registry.selected().cloned() else {
            return;
        };
        match LiveFeed::bind(&device, self.backend.as_ref()).await {
            Ok(feed) => self.feed = Some(feed),
            Err(e) => log::warn!("cannot bind {}: {}", device.id, e),
        }
    }

    /// Snapshot the live feed and submit it.
    ///
    /// `None` when there is nothing to capture.
    pub async fn capture(&mut self) -> Option<JoinHandle<()>> {
        let image = capture_from_live_feed(self.feed.as_ref(), &self.options).await?;
        Some(self.submit(image))
    }

    /// Submit a user-chosen image file as-is.
    pub async fn upload(&mut self, path: &Path) -> Result<JoinHandle<()>, AcquireError> {
        let image = acquire_from_file(path).await?;
        Ok(self.submit(image))
    }

    /// Send the last image again after a retryable failure.
    pub fn retry(&mut self) -> Option<JoinHandle<()>> {
        if !self.store.with(ResultState::can_retry) {
            return None;
        }
        let image = self.last_capture.clone()?;
        log::info!("retrying {}", image);
        Some(self.submit(image))
    }

    fn submit(&mut self, image: CapturedImage) -> JoinHandle<()> {
        self.last_capture = Some(image.clone());
        let number = self.store.begin();
        log::debug!("request #{}: {}", number, image);

        let client = self.client.clone();
        let store = self.store.clone();
        tokio::spawn(async move {
            let result = client.submit(&image).await;
            if !store.complete(Stamped::new(number, result)) {
                log::info!("request #{} superseded, response ignored", number);
            }
        })
    }

    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    pub fn feed(&self) -> Option<&LiveFeed> {
        self.feed.as_ref()
    }

    pub fn client(&self) -> &AnalysisClient {
        &self.client
    }

    pub fn options(&self) -> &CaptureOptions {
        &self.options
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    pub fn subscribe(&self) -> watch::Receiver<ResultState> {
        self.store.subscribe()
    }

    pub fn last_capture(&self) -> Option<&CapturedImage> {
        self.last_capture.as_ref()
    }

    pub fn feed_status(&self) -> FeedStatus {
        FeedStatus {
            bound: self.feed.as_ref().map(|feed| feed.device().id.clone()),
            has_frame: self.feed.as_ref().is_some_and(LiveFeed::has_frame),
            last_capture: self.last_capture.as_ref().map(|image| image.to_string()),
        }
    }

    pub fn view(&self) -> View {
        self.store
            .with(|state| compose(&self.registry, &self.feed_status(), state))
    }

    /// Release the camera.
    pub async fn shutdown(&mut self) {
        if let Some(feed) = self.feed.take() {
            feed.release().await;
        }
    }
}
