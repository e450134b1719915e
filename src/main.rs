//! Habitat climate loop: main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  IioDht / DeadlineSensor   SysfsPwm   SysfsPin   StatvfsVolume │
//! │  JsonConfigFile            LogEventSink          LocalClock    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │         ClimateService (monitors · hysteresis)         │    │
//! │  │         Housekeeper (layout · reclaim logs)            │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  PollLoop (pause → tick → iterate)                             │
//! └────────────────────────────────────────────────────────────────┘
//! ```

use anyhow::{Context, Result};
use log::info;

use habitat::adapters::config_file::JsonConfigFile;
use habitat::adapters::hardware::build_climate_service;
use habitat::adapters::log_sink::LogEventSink;
use habitat::adapters::time::LocalClock;
use habitat::adapters::volume::StatvfsVolume;
use habitat::app::housekeeping::Housekeeper;
use habitat::app::ports::ConfigPort;
use habitat::app::runtime::ClimateRuntime;
use habitat::scheduler::{PollLoop, ThreadSleeper};
use habitat::storage::StorageCategory;

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("habitat v{} starting", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    let config_file = JsonConfigFile::from_env();
    let config = config_file
        .load()
        .with_context(|| format!("loading {}", config_file.path().display()))?;
    info!("data volume: {}", config.volume.data_root.display());
    info!("log directory: {}", config.volume.logs_root().display());
    info!("poll interval: {} s", config.climate.poll_interval_secs);
    info!("log days to clear: {}", config.storage.log_days_to_clear);

    // ── 3. Hardware and services ──────────────────────────────
    let service = build_climate_service(&config).context("bringing up peripherals")?;
    let housekeeper = Housekeeper::new(&config, StorageCategory::logs(&config), StatvfsVolume);
    let mut runtime = ClimateRuntime::new(service, housekeeper, LocalClock);
    let mut sink = LogEventSink::new();

    // ── 4. First initialisation (missing volume is fatal here) ─
    runtime
        .prepare(&mut sink)
        .with_context(|| format!("preparing {}", config.volume.data_root.display()))?;

    // ── 5. Main loop ──────────────────────────────────────────
    let mut poll = PollLoop::after_prepare(
        config.climate.poll_interval(),
        config.climate.maintenance_every,
        ThreadSleeper,
    );
    loop {
        poll.pause();
        let tick = poll.next_tick();
        runtime.iterate(tick, &mut sink);
    }
}
