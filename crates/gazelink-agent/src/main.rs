//! gazelink agent: entry point.
//!
//! Starts whichever ingestion channels the command line asks for, prints every
//! status line to stdout, and shuts everything down on Ctrl+C.
//!
//! # Usage
//!
//! ```text
//! gazelink-agent [OPTIONS]
//!
//! Options:
//!   --port <NAME>       Serial port to read commands from (e.g. COM8, /dev/ttyACM0)
//!   --baud <RATE>       Serial baud rate [default: from config, 9600]
//!   --camera [INDEX]    Camera to decode ArUco markers from (needs `opencv`)
//!                       [default: `video.device_index` from config]
//!   --random            Move the pointer randomly until Ctrl+C
//!   --list-ports        Print the available serial ports and exit
//!   --list-cameras      Print the camera indices that deliver frames and exit
//!   --config <PATH>     Use this config file instead of the platform default
//!   --init-config       Write the effective configuration to the config file and exit
//!   --headless          Drive a virtual pointer instead of the real cursor
//! ```
//!
//! Log output (`tracing`) goes to stderr and is filtered by `RUST_LOG`, or by
//! `agent.log_level` from the config file when `RUST_LOG` is unset.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gazelink_agent::application::actuate_pointer::{PointerActuator, PointerDriver, RandomMovement};
use gazelink_agent::application::command_actions::{CalibrationIndicator, PointerActions};
use gazelink_agent::application::serial_ingest::SerialIngest;
use gazelink_agent::application::status::{drain, Severity, StatusMessage, StatusSink};
use gazelink_agent::application::video_ingest::VideoIngest;
use gazelink_agent::infrastructure::calibration::ConsoleIndicator;
use gazelink_agent::infrastructure::pointer::{native_driver, VirtualPointer};
use gazelink_agent::infrastructure::serial::{list_ports, SerialPortOpener};
use gazelink_agent::infrastructure::storage::config::{
    config_file_path, load_config, load_config_from, save_config_to, AgentConfig,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Drives the pointer from a serial sensor or a marker camera.
#[derive(Debug, Parser)]
#[command(name = "gazelink-agent", version)]
struct Cli {
    /// Serial port to connect to.  Falls back to `serial.port` in the config.
    #[arg(long, env = "GAZELINK_PORT")]
    port: Option<String>,

    /// Serial baud rate.  Falls back to `serial.baud_rate` in the config.
    #[arg(long)]
    baud: Option<u32>,

    /// Camera index to start the video channel on.  Without a value the
    /// index comes from `video.device_index` in the config.
    #[arg(long, value_name = "INDEX", num_args = 0..=1)]
    camera: Option<Option<u32>>,

    /// Move the pointer to random positions until Ctrl+C.
    #[arg(long)]
    random: bool,

    /// List serial ports and exit.
    #[arg(long)]
    list_ports: bool,

    /// List working camera indices and exit.
    #[arg(long)]
    list_cameras: bool,

    /// Path to an alternate config file.
    #[arg(long, value_name = "PATH", env = "GAZELINK_CONFIG")]
    config: Option<PathBuf>,

    /// Write the effective configuration to the config file and exit.
    #[arg(long)]
    init_config: bool,

    /// Use a virtual pointer (and no preview window).
    #[arg(long)]
    headless: bool,
}

impl Cli {
    /// The camera to start, if `--camera` was given.
    fn camera_index(&self, config: &AgentConfig) -> Option<u32> {
        self.camera
            .map(|index| index.unwrap_or(config.video.device_index))
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => load_config().context("failed to load config")?,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.agent.log_level)),
        )
        .init();

    if cli.list_ports {
        print_ports();
        return Ok(());
    }
    if cli.list_cameras {
        return list_cameras(&config);
    }
    if cli.init_config {
        let path = match &cli.config {
            Some(path) => path.clone(),
            None => config_file_path().context("failed to locate the config file")?,
        };
        return write_config(&config, &path);
    }

    info!("gazelink agent starting");

    // ── Wiring ────────────────────────────────────────────────────────────────
    let driver: Arc<dyn PointerDriver> = if cli.headless {
        Arc::new(VirtualPointer::new(config.pointer.virtual_screen()))
    } else {
        native_driver().context("no usable pointer driver (try --headless)")?
    };
    let actuator =
        Arc::new(PointerActuator::new(driver).with_speeds(config.pointer.speed_tiers()));
    let indicator = Arc::new(ConsoleIndicator::new());
    let (status, mut rx) = StatusSink::channel();

    let serial = SerialIngest::new(
        Arc::new(SerialPortOpener),
        Arc::new(PointerActions::new(
            Arc::clone(&actuator),
            Arc::clone(&indicator) as Arc<dyn CalibrationIndicator>,
        )),
        status.clone(),
    )
    .with_poll_interval(config.serial.poll_interval());

    if let Some(port) = cli.port.clone().or_else(|| config.serial.port.clone()) {
        let baud = cli.baud.unwrap_or(config.serial.baud_rate);
        if let Err(e) = serial.connect(&port, baud) {
            warn!("serial channel not started: {e}");
        }
    }

    let video = match cli.camera_index(&config) {
        Some(index) => Some(start_video(index, &config, cli.headless, &actuator, &status)?),
        None => None,
    };

    let random = Arc::new(RandomMovement::new());
    if cli.random {
        let random = Arc::clone(&random);
        let actuator = Arc::clone(&actuator);
        std::thread::Builder::new()
            .name("random-movement".to_string())
            .spawn(move || random.run(&actuator))
            .context("failed to start random movement")?;
    }

    // Everything published so far (e.g. "Failed to connect: …").
    for message in drain(&mut rx) {
        print_status(&message);
    }
    if !serial.is_connected() && video.is_none() && !cli.random {
        anyhow::bail!("nothing to run: pass --port, --camera or --random");
    }

    // ── Status loop ───────────────────────────────────────────────────────────
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            result = &mut shutdown => {
                result.context("failed to listen for Ctrl+C")?;
                info!("shutdown signal received");
                break;
            }
            Some(message) = rx.recv() => print_status(&message),
        }
    }

    random.stop();
    serial.disconnect();
    if let Some(video) = &video {
        video.stop();
    }
    indicator.hide();
    for message in drain(&mut rx) {
        print_status(&message);
    }

    info!("gazelink agent stopped");
    Ok(())
}

fn print_status(message: &StatusMessage) {
    let label = match message.severity {
        Severity::Info => "INFO",
        Severity::Warn => "WARN",
        Severity::Error => "ERROR",
    };
    println!("{label:<5} {}", message.text);
}

fn print_ports() {
    let ports = list_ports();
    if ports.is_empty() {
        println!("No Ports Available");
    }
    for port in ports {
        println!("{port}");
    }
}

fn write_config(config: &AgentConfig, path: &Path) -> anyhow::Result<()> {
    save_config_to(config, path)
        .with_context(|| format!("failed to write config to {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

// ── Video wiring ──────────────────────────────────────────────────────────────

#[cfg(feature = "opencv")]
fn list_cameras(config: &AgentConfig) -> anyhow::Result<()> {
    use gazelink_agent::application::video_ingest::probe_devices;
    use gazelink_agent::infrastructure::video::capture::OpenCvOpener;
    use gazelink_agent::infrastructure::video::MAX_PROBED_DEVICES;

    let found = probe_devices(&OpenCvOpener, MAX_PROBED_DEVICES, config.video.resolution());
    if found.is_empty() {
        println!("No Cameras Available");
    }
    for index in found {
        println!("{index}");
    }
    Ok(())
}

#[cfg(not(feature = "opencv"))]
fn list_cameras(_config: &AgentConfig) -> anyhow::Result<()> {
    anyhow::bail!("camera support needs a build with the `opencv` feature")
}

#[cfg(feature = "opencv")]
fn start_video(
    index: u32,
    config: &AgentConfig,
    headless: bool,
    actuator: &Arc<PointerActuator>,
    status: &StatusSink,
) -> anyhow::Result<VideoIngest> {
    use gazelink_agent::application::video_ingest::{FrameSink, VideoSettings};
    use gazelink_agent::infrastructure::video::capture::{OpenCvOpener, PreviewWindow};
    use gazelink_agent::infrastructure::video::HeadlessFrameSink;
    use gazelink_agent::infrastructure::vision::aruco::ArucoMarkerDetector;
    use gazelink_core::MarkerDecoder;

    let detector = ArucoMarkerDetector::new(config.video.dictionary)
        .context("failed to build the ArUco detector")?;
    let sink: Arc<dyn FrameSink> = if headless {
        Arc::new(HeadlessFrameSink::new())
    } else {
        Arc::new(PreviewWindow::new("gazelink"))
    };
    let video = VideoIngest::new(
        Arc::new(OpenCvOpener),
        Arc::new(MarkerDecoder::new(Arc::new(detector))),
        Arc::clone(actuator),
        sink,
        status.clone(),
    )
    .with_settings(VideoSettings {
        resolution: config.video.resolution(),
        frame_interval: config.video.frame_interval(),
    });
    video
        .start(index)
        .with_context(|| format!("failed to start video device {index}"))?;
    Ok(video)
}

#[cfg(not(feature = "opencv"))]
fn start_video(
    _index: u32,
    _config: &AgentConfig,
    _headless: bool,
    _actuator: &Arc<PointerActuator>,
    _status: &StatusSink,
) -> anyhow::Result<VideoIngest> {
    anyhow::bail!("--camera needs a build with the `opencv` feature")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
