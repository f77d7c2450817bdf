//! Driver Drowsiness Monitor - Main Entry Point

use camera_capture::{FrameScript, SyntheticSource};
use drowsiness::DrowsinessPipeline;
use monitor::{init_logging, ControlSurface, MonitorConfig, MonitoringLoop};
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    info!("=== Driver Drowsiness Monitor v{} ===", env!("CARGO_PKG_VERSION"));
    let config = MonitorConfig::load()?;

    // Detector construction is the startup-fatal step: a missing face model
    // must prevent monitoring from starting.
    let pipeline = DrowsinessPipeline::new(&config.detector)?;

    let control = ControlSurface::new(config.settings);
    control.start_monitoring();

    // The physical capture device and UI are external collaborators; the
    // synthetic source and log display stand in for them here.
    let source = SyntheticSource::new(
        config.camera.width,
        config.camera.height,
        config.camera.fps,
        FrameScript::default(),
    );

    MonitoringLoop::new(
        pipeline,
        source,
        monitor::LogDisplay::new(),
        alerting::LogAlerter::new(),
        control,
    )
    .with_tick_interval(Duration::from_millis(config.tick_interval_ms))
    .run()
    .await?;

    Ok(())
}
