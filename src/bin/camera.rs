//! Habitat camera loop: one still per interval into hourly folders.

use anyhow::{Context, Result};
use log::info;

use habitat::adapters::camera::CommandCamera;
use habitat::adapters::config_file::JsonConfigFile;
use habitat::adapters::log_sink::LogEventSink;
use habitat::adapters::time::LocalClock;
use habitat::adapters::volume::StatvfsVolume;
use habitat::app::capture::CaptureService;
use habitat::app::housekeeping::Housekeeper;
use habitat::app::ports::ConfigPort;
use habitat::app::runtime::CameraRuntime;
use habitat::scheduler::{PollLoop, ThreadSleeper};
use habitat::storage::StorageCategory;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("habitat-camera v{} starting", env!("CARGO_PKG_VERSION"));

    let config_file = JsonConfigFile::from_env();
    let config = config_file
        .load()
        .with_context(|| format!("loading {}", config_file.path().display()))?;
    let camera_cfg = &config.camera;
    info!("capture directory: {}", config.volume.captures_root().display());
    info!("capture interval: {} s", camera_cfg.capture_interval_secs);
    info!("capture hours to clear: {}", config.storage.capture_hours_to_clear);
    info!("resolution: {}x{}", camera_cfg.width, camera_cfg.height);

    let capture = CaptureService::new(camera_cfg, CommandCamera::new(camera_cfg));
    let housekeeper = Housekeeper::new(&config, StorageCategory::images(&config), StatvfsVolume);
    let mut runtime = CameraRuntime::new(capture, housekeeper, LocalClock);
    let mut sink = LogEventSink::new();

    runtime
        .prepare(&mut sink)
        .with_context(|| format!("preparing {}", config.volume.data_root.display()))?;

    let mut poll = PollLoop::after_prepare(
        camera_cfg.capture_interval(),
        camera_cfg.maintenance_every,
        ThreadSleeper,
    );
    loop {
        poll.pause();
        let tick = poll.next_tick();
        runtime.iterate(tick, &mut sink);
    }
}
