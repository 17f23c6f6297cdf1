use {
    crate::{RequestState, ResultState},
    analysis::AnalysisResult,
    std::fmt,
    video::DeviceRegistry,
};

pub const PICKER_HEADING: &str = "Pilih Kamera:";
pub const PREVIEW_HEADING: &str = "Kamera";
pub const RESULTS_HEADING: &str = "Hasil Deteksi";
pub const ANALYSIS_HEADING: &str = "Analisa Jerawat";
pub const PROCESSING_MESSAGE: &str = "Memproses gambar...";
pub const PLACEHOLDER_MESSAGE: &str = "Belum ada gambar.";

/// What the session knows about the live feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedStatus {
    /// Id of the bound device, if any.
    pub bound: Option<String>,
    pub has_frame: bool,
    /// Description of the image last sent for analysis.
    pub last_capture: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeviceOption {
    pub id: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DevicePicker {
    pub options: Vec<DeviceOption>,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PreviewStatus {
    Blank,
    Starting { device: String },
    Live { device: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewPane {
    pub status: PreviewStatus,
    pub capture_enabled: bool,
    pub upload_enabled: bool,
    pub last_capture: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResultBody {
    Processing,
    Annotated { image_url: String },
    Failed { message: String, retry: bool },
    Placeholder,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisFields {
    pub acne_count: u32,
    pub severity: String,
    pub analysis_text: String,
    /// Left over from an earlier request (shown next to a failure).
    pub previous: bool,
}

impl AnalysisFields {
    fn from_result(result: &AnalysisResult, previous: bool) -> Self {
        Self {
            acne_count: result.acne_count,
            severity: result.severity.to_string(),
            analysis_text: result.analysis_text.clone(),
            previous,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultsPane {
    pub body: ResultBody,
    pub analysis: Option<AnalysisFields>,
}

/// The three panes, derived entirely from current state.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub device_picker: DevicePicker,
    pub preview: PreviewPane,
    pub results: ResultsPane,
}

pub fn compose_picker(registry: &DeviceRegistry) -> DevicePicker {
    let selected = registry.selected_id();
    let options = registry
        .devices()
        .iter()
        .enumerate()
        .map(|(index, device)| DeviceOption {
            id: device.id.clone(),
            label: registry.display_label(index).unwrap_or_default(),
            selected: selected == Some(device.id.as_str()),
        })
        .collect::<Vec<_>>();
    DevicePicker {
        enabled: !options.is_empty(),
        options,
    }
}

fn compose_preview(registry: &DeviceRegistry, feed: &FeedStatus) -> PreviewPane {
    let status = match &feed.bound {
        None => PreviewStatus::Blank,
        Some(id) => {
            let device = registry
                .devices()
                .iter()
                .position(|d| &d.id == id)
                .and_then(|index| registry.display_label(index))
                .unwrap_or_else(|| id.clone());
            if feed.has_frame {
                PreviewStatus::Live { device }
            } else {
                PreviewStatus::Starting { device }
            }
        }
    };
    PreviewPane {
        capture_enabled: matches!(status, PreviewStatus::Live { .. }),
        status,
        upload_enabled: true,
        last_capture: feed.last_capture.clone(),
    }
}

fn compose_results(state: &ResultState) -> ResultsPane {
    match state.request() {
        RequestState::Loading => ResultsPane {
            body: ResultBody::Processing,
            analysis: None,
        },
        RequestState::Succeeded(result) => ResultsPane {
            body: ResultBody::Annotated {
                image_url: result.annotated_image_url.clone(),
            },
            analysis: Some(AnalysisFields::from_result(result, false)),
        },
        RequestState::Failed(error) => ResultsPane {
            body: ResultBody::Failed {
                message: error.to_string(),
                retry: state.can_retry(),
            },
            analysis: state
                .last_result()
                .map(|result| AnalysisFields::from_result(result, true)),
        },
        RequestState::Idle => ResultsPane {
            body: ResultBody::Placeholder,
            analysis: None,
        },
    }
}

/// Project registry, feed and result state into a `View`.
pub fn compose(registry: &DeviceRegistry, feed: &FeedStatus, state: &ResultState) -> View {
    View {
        device_picker: compose_picker(registry),
        preview: compose_preview(registry, feed),
        results: compose_results(state),
    }
}

impl fmt::Display for DevicePicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", PICKER_HEADING)?;
        if !self.enabled {
            return writeln!(f, "  (tidak ada kamera)");
        }
        for option in &self.options {
            let mark = if option.selected { "*" } else { " " };
            writeln!(f, "  [{}] {} ({})", mark, option.label, option.id)?;
        }
        Ok(())
    }
}

impl fmt::Display for PreviewPane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", PREVIEW_HEADING)?;
        match &self.status {
            PreviewStatus::Blank => writeln!(f, "  -")?,
            PreviewStatus::Starting { device } => writeln!(f, "  {} (menunggu gambar)", device)?,
            PreviewStatus::Live { device } => writeln!(f, "  {} (langsung)", device)?,
        }
        let capture = if self.capture_enabled { "Ambil Gambar" } else { "Ambil Gambar (nonaktif)" };
        writeln!(f, "  [{}] [Unggah Gambar]", capture)?;
        if let Some(last) = &self.last_capture {
            writeln!(f, "  Gambar: {}", last)?;
        }
        Ok(())
    }
}

impl fmt::Display for ResultsPane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", RESULTS_HEADING)?;
        match &self.body {
            ResultBody::Processing => writeln!(f, "  {}", PROCESSING_MESSAGE)?,
            ResultBody::Annotated { image_url } => writeln!(f, "  Gambar hasil: {}", image_url)?,
            ResultBody::Failed { message, retry } => {
                writeln!(f, "  Gagal memproses gambar: {}", message)?;
                if *retry {
                    writeln!(f, "  Coba lagi untuk mengirim ulang gambar terakhir.")?;
                }
            }
            ResultBody::Placeholder => writeln!(f, "  {}", PLACEHOLDER_MESSAGE)?,
        }
        if let Some(analysis) = &self.analysis {
            if analysis.previous {
                writeln!(f, "{} (sebelumnya)", ANALYSIS_HEADING)?;
            } else {
                writeln!(f, "{}", ANALYSIS_HEADING)?;
            }
            writeln!(f, "  Jumlah Jerawat: {}", analysis.acne_count)?;
            writeln!(f, "  Tingkat Keparahan: {}", analysis.severity)?;
            writeln!(f, "  Analisa: {}", analysis.analysis_text)?;
        }
        Ok(())
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.device_picker)?;
        writeln!(f)?;
        write!(f, "{}", self.preview)?;
        writeln!(f)?;
        write!(f, "{}", self.results)
    }
}
