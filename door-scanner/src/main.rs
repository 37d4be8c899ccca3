#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use door_inference::{DoorClassifySession, DoorDetector};
use door_media::capture::{FrameSource, RawVideoSource};
use door_media::display::{FrameDisplay, HeadlessDisplay};
use door_media::FrameSize;
use door_motion::{MotionActuator, RoombaActuator, SerialTransport};
use door_scanner::{DoorScanner, NavigationPolicy, ScannerConfig};
use log::info;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use tracing_subscriber::EnvFilter;

/// Scan for a doorway with a door/not-door classifier and drive a Roomba through it.
///
/// Needs access to the serial device, which usually means running as root.
#[derive(Debug, Parser)]
#[command(name = "door-scanner", version)]
struct Cli {
    /// Path to the trained door classifier (ONNX).
    #[arg(short, long)]
    model: PathBuf,

    /// TOML configuration file; built-in defaults are used for anything it leaves out.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serial device of the robot base, overriding the configuration.
    #[arg(long)]
    port: Option<String>,

    /// Camera index to capture from.
    #[arg(long, default_value_t = 0)]
    camera: i32,

    /// Replay a recorded video instead of the live camera.
    #[arg(long, conflicts_with = "raw")]
    video: Option<PathBuf>,

    /// Read packed bgr24 frames of WIDTHxHEIGHT from stdin instead of a camera.
    #[arg(long, value_name = "WIDTHxHEIGHT")]
    raw: Option<FrameSize>,

    /// Do not open a preview window.
    #[arg(long)]
    headless: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("door_scanner=info,door_inference=info,door_media=info,door_motion=info,ort=warn")
            }),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ScannerConfig::load(path)?,
        None => ScannerConfig::default(),
    };
    if let Some(port) = &cli.port {
        config.serial.port = port.clone();
    }
    config.validate()?;
    info!("Configuration: {config:?}");

    let transport = SerialTransport::open(&config.serial.port, config.serial.baud_rate)
        .with_context(|| format!("Failed to open motor link {}", config.serial.port))?;
    // From here on, dropping the actuator stops the robot.
    let mut actuator = RoombaActuator::new(transport, config.timing.motion_timing());

    let source = open_source(&cli)?;

    info!("Loading network...");
    let classifier = DoorClassifySession::new(&cli.model, config.detector.intra_threads)
        .with_context(|| format!("Failed to load classifier {}", cli.model.display()))?;
    let detector = DoorDetector::new(classifier, config.detector.clone());

    let display = open_display(&cli)?;

    actuator.wake()?;

    let scanner = DoorScanner::new(
        source,
        display,
        detector,
        NavigationPolicy::new(config.navigation),
        actuator,
    );

    let shutdown = scanner.shutdown_handle();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        shutdown.store(true, Ordering::Relaxed);
    })
    .context("Failed to install Ctrl-C handler")?;

    let summary = scanner.run()?;
    info!("Done: {:?} after {} frames", summary.exit, summary.frames);

    Ok(())
}

fn open_source(cli: &Cli) -> Result<Box<dyn FrameSource>> {
    if let Some(size) = cli.raw {
        info!("Reading {size} bgr24 frames from stdin");
        return Ok(Box::new(RawVideoSource::new(std::io::stdin().lock(), size)));
    }

    #[cfg(feature = "opencv")]
    {
        use door_media::capture::OpenCvCapture;

        match &cli.video {
            Some(path) => Ok(Box::new(OpenCvCapture::open_file(path)?)),
            None => Ok(Box::new(OpenCvCapture::open_camera(cli.camera)?)),
        }
    }

    #[cfg(not(feature = "opencv"))]
    {
        anyhow::bail!(
            "camera {} / video {:?} need the `opencv` feature; use --raw WIDTHxHEIGHT to read frames from stdin",
            cli.camera,
            cli.video
        )
    }
}

fn open_display(cli: &Cli) -> Result<Box<dyn FrameDisplay>> {
    if cli.headless {
        return Ok(Box::new(HeadlessDisplay::new()));
    }

    #[cfg(feature = "opencv")]
    {
        Ok(Box::new(door_media::display::OpenCvDisplay::new("Output")?))
    }

    #[cfg(not(feature = "opencv"))]
    {
        log::warn!("Built without the `opencv` feature, running headless");
        Ok(Box::new(HeadlessDisplay::new()))
    }
}
