use {
    crate::*,
    std::sync::Arc,
};

/// One video capture device as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDevice {
    /// Stable for the session (the device node path on V4L2).
    pub id: String,
    /// Driver-reported name, may be empty.
    pub label: String,
}

impl VideoDevice {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Host platform access to video devices.
pub trait VideoBackend: Send + Sync {
    /// List capture-capable devices. May block.
    fn enumerate(&self) -> Result<Vec<VideoDevice>, VideoError>;

    /// Create an unopened handle for `device`. The handle is opened on the
    /// capture worker thread.
    fn create(&self, device: &VideoDevice) -> Result<Box<dyn VideoInDevice>, VideoError>;
}

/// The enumerated devices plus the current selection.
///
/// Invariant: a selected id always names a device from the last
/// enumeration.
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    devices: Vec<VideoDevice>,
    selected: Option<String>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-enumerate devices on the blocking pool.
    ///
    /// Enumeration failures (permission denied, no devices) leave an empty
    /// list and are only logged.
    pub async fn refresh(&mut self, backend: Arc<dyn VideoBackend>) -> &[VideoDevice] {
        let result = tokio::task::spawn_blocking(move || backend.enumerate())
            .await
            .unwrap_or_else(|e| Err(VideoError::Device(format!("enumeration task failed: {e}"))));
        self.apply(result)
    }

    /// Install an enumeration result and reconcile the selection.
    pub fn apply(&mut self, result: Result<Vec<VideoDevice>, VideoError>) -> &[VideoDevice] {
        self.devices = match result {
            Ok(devices) => devices,
            Err(error) => {
                log::warn!("device enumeration failed: {}", error);
                Vec::new()
            }
        };
        if self.devices.is_empty() {
            log::warn!("{}", VideoError::NoDevices);
        }

        let still_present = self
            .selected
            .as_deref()
            .is_some_and(|id| self.devices.iter().any(|d| d.id == id));
        if !still_present {
            self.selected = self.devices.first().map(|d| d.id.clone());
        }
        &self.devices
    }

    pub fn select(&mut self, id: &str) -> Result<&VideoDevice, VideoError> {
        let device = self
            .devices
            .iter()
            .find(|d| d.id == id)
            .ok_or_else(|| VideoError::UnknownDevice(id.to_string()))?;
        self.selected = Some(device.id.clone());
        Ok(device)
    }

    pub fn devices(&self) -> &[VideoDevice] {
        &self.devices
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected(&self) -> Option<&VideoDevice> {
        let id = self.selected.as_deref()?;
        self.devices.iter().find(|d| d.id == id)
    }

    /// Id of the device after the selected one, wrapping around.
    pub fn next_id(&self) -> Option<&str> {
        let current = self
            .selected
            .as_deref()
            .and_then(|id| self.devices.iter().position(|d| d.id == id));
        let next = match current {
            Some(index) => (index + 1) % self.devices.len(),
            None => 0,
        };
        self.devices.get(next).map(|d| d.id.as_str())
    }

    /// Label shown in the picker: the driver label, or "Kamera N" when empty.
    pub fn display_label(&self, index: usize) -> Option<String> {
        let device = self.devices.get(index)?;
        if device.label.trim().is_empty() {
            Some(format!("Kamera {}", index + 1))
        } else {
            Some(device.label.clone())
        }
    }
}
