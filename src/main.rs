use clap::Parser;
use mood_light::camera::CameraManager;
use mood_light::config::AppArgs;
use mood_light::emotion::EmotionAnalyzer;
use mood_light::error::{MoodLightError, Result};
use mood_light::mood_table::MoodTable;
use mood_light::pipeline::MoodPipeline;
use mood_light::session::MoodSession;
use mood_light::ui::MoodLightApp;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes file logging; `RUST_LOG` overrides the default `info` level
fn init_logging(log_file: &Path) -> Result<()> {
    let log_file = std::fs::File::create(log_file).map_err(MoodLightError::Io)?;

    let file_layer = fmt::layer()
        .with_writer(Arc::new(log_file))
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(file_layer)
        .init();

    Ok(())
}

fn run(args: AppArgs) -> Result<()> {
    let table = Arc::new(MoodTable::load(&args.mapping)?);

    let analyzer = EmotionAnalyzer::new(&args.cascade, &args.model, args.min_confidence)?;

    let camera = CameraManager::open(args.camera_index).inspect_err(|_| {
        match CameraManager::list_devices() {
            Ok(devices) => warn!("Available cameras: {:?}", devices),
            Err(e) => warn!("Could not list cameras: {}", e),
        }
    })?;
    let (width, height) = camera.resolution();
    info!("Capturing at {}x{}", width, height);

    let pipeline = MoodPipeline::new(table, args.window);
    let session = MoodSession::new(camera, analyzer, pipeline, !args.no_mirror);

    info!("Starting Mood Light (window of {} frames)", args.window);
    info!("Press 'q' to quit");

    eframe::run_native(
        "Mood Light",
        eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1280.0, 960.0])
                .with_title("Mood Light"),
            ..Default::default()
        },
        Box::new(move |_cc| Ok(Box::new(MoodLightApp::new(session)))),
    )
    .map_err(|e| MoodLightError::Display(e.to_string()))
}

fn main() -> Result<()> {
    let args = AppArgs::parse();
    init_logging(&args.log_file)?;

    run(args).inspect_err(|e| {
        error!("{}", e);
        eprintln!("{}", e.report());
    })
}
