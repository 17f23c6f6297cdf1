use {
    analysis::{AnalysisClient, AnalysisConfig, DEFAULT_ENDPOINT},
    clap::{Parser, Subcommand},
    image::DEFAULT_JPEG_QUALITY,
    session::{CaptureOptions, Session, view::compose_picker},
    std::{path::PathBuf, sync::Arc, time::Duration},
    video::{DeviceRegistry, V4l2Backend, V4l2Config, VideoBackend},
};

mod live;

#[derive(Parser, Debug)]
#[command(author, version, about = "Photograph a face and ask the acne service to analyze it")]
struct Cli {
    /// Prediction endpoint of the analysis service.
    #[arg(long, global = true, env = "JERAWAT_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Give up on a request after this many seconds (no limit by default).
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Write logs to date-named files in this directory instead of stdout.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// JPEG quality of camera snapshots.
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_JPEG_QUALITY,
        value_parser = clap::value_parser!(u8).range(1..=100)
    )]
    quality: u8,

    /// Send snapshots unflipped.
    #[arg(long, global = true)]
    no_mirror: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the video capture devices.
    Devices,
    /// Send an image file for analysis and print the result.
    Analyze {
        file: PathBuf,
        /// Download the annotated image to this path.
        #[arg(long)]
        save_annotated: Option<PathBuf>,
    },
    /// Preview a camera. Space captures, Tab switches camera, R retries, Esc quits.
    Live {
        /// Device to start with, e.g. /dev/video2.
        #[arg(long)]
        device: Option<String>,
    },
}

impl Cli {
    fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig::default()
            .with_endpoint(self.endpoint.clone())
            .with_timeout(self.timeout_secs.map(Duration::from_secs))
    }

    fn capture_options(&self) -> CaptureOptions {
        CaptureOptions::default()
            .with_quality(self.quality)
            .with_mirrored(!self.no_mirror)
    }
}

async fn list_devices(backend: Arc<dyn VideoBackend>) {
    let mut registry = DeviceRegistry::new();
    registry.refresh(backend).await;
    print!("{}", compose_picker(&registry));
}

async fn analyze(
    mut session: Session,
    file: PathBuf,
    save_annotated: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    session.upload(&file).await?.await?;

    let state = session.store().snapshot();
    print!("{}", session.view().results);

    if let Some(error) = state.error() {
        return Err(error.clone().into());
    }
    if let (Some(path), Some(result)) = (save_annotated, state.current()) {
        let bytes = session.client().fetch_annotated_image(result).await?;
        tokio::fs::write(&path, bytes).await?;
        println!("Gambar hasil disimpan ke {}", path.display());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match &cli.log_dir {
        Some(dir) => base::init_file_logger(dir)?,
        None => base::init_stdout_logger(),
    }

    let backend: Arc<dyn VideoBackend> = Arc::new(V4l2Backend::new(V4l2Config::default()));
    let client = AnalysisClient::new(cli.analysis_config())?;
    log::info!("analysis endpoint {}", client.endpoint());
    let session = Session::new(Arc::clone(&backend), client, cli.capture_options());

    match cli.command {
        Command::Devices => list_devices(backend).await,
        Command::Analyze {
            file,
            save_annotated,
        } => analyze(session, file, save_annotated).await?,
        Command::Live { device } => live::run(session, device).await?,
    }

    Ok(())
}
