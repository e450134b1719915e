//! Loop-level tests: maintenance cadence, reading log files and capture
//! folders on a temporary data volume.

use std::fs;
use std::path::Path;
use std::time::Duration;

use habitat::app::capture::CaptureService;
use habitat::app::events::AppEvent;
use habitat::app::housekeeping::Housekeeper;
use habitat::app::ports::ExposureMode;
use habitat::app::runtime::{CameraRuntime, ClimateRuntime};
use habitat::app::service::ClimateService;
use habitat::config::SystemConfig;
use habitat::error::{CaptureFault, Error, InitFault, SensorFault, TransientKind};
use habitat::scheduler::{LoopTick, PollLoop, Sleeper};
use habitat::sensors::sim::SimulatedSensor;
use habitat::storage::StorageCategory;
use habitat::storage::reading_log::LogLine;

use crate::mock_hw::{
    CountingDelay, ManualClock, MockActuator, MockCamera, MockIndicators, MockVolume,
    RecordingSink, datetime,
};

type Climate = ClimateRuntime<
    SimulatedSensor,
    MockActuator,
    MockActuator,
    MockIndicators,
    CountingDelay,
    MockVolume,
    ManualClock,
>;

const PLENTY_KB: u64 = 1_000_000;

struct NoSleep;

impl Sleeper for NoSleep {
    fn sleep(&mut self, _duration: Duration) {}
}

fn config_on(root: &Path) -> SystemConfig {
    let mut cfg = SystemConfig::default();
    cfg.volume.data_root = root.to_path_buf();
    cfg
}

fn climate(cfg: &SystemConfig, volume: MockVolume, clock: ManualClock) -> Climate {
    let mut service = ClimateService::new(
        &cfg.climate,
        MockActuator::default(),
        None,
        MockIndicators::default(),
        CountingDelay::default(),
    );
    service
        .add_sensor(1, SimulatedSensor::steady(80.0, 25.0))
        .unwrap();
    service
        .add_sensor(
            2,
            SimulatedSensor::failing(SensorFault::Transient(TransientKind::NotReady)),
        )
        .unwrap();
    let housekeeper = Housekeeper::new(cfg, StorageCategory::logs(cfg), volume);
    ClimateRuntime::new(service, housekeeper, clock)
}

fn tick(iteration: u64, maintenance: bool) -> LoopTick {
    LoopTick {
        iteration,
        maintenance,
    }
}

fn lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_owned)
        .collect()
}

fn sorted_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    names
}

// ── Climate loop ──────────────────────────────────────────────

#[test]
fn prepare_fails_without_volume() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = config_on(&tmp.path().join("HERMITCRAB"));
    let clock = ManualClock::at(datetime(2024, 1, 31, 14, 0, 0));
    let mut rt = climate(&cfg, MockVolume::with_free_kb(PLENTY_KB), clock);
    let mut sink = RecordingSink::default();

    assert_eq!(rt.prepare(&mut sink), Err(Error::Init(InitFault::VolumeMissing)));
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::MaintenanceFailed { fault: InitFault::VolumeMissing, .. })),
        1
    );
}

#[test]
fn writes_one_line_per_cycle_to_the_day_file() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = config_on(tmp.path());
    let clock = ManualClock::at(datetime(2024, 1, 31, 14, 5, 7));
    let mut rt = climate(&cfg, MockVolume::with_free_kb(PLENTY_KB), clock.clone());
    let mut sink = RecordingSink::default();

    rt.prepare(&mut sink).unwrap();
    let mut poll = PollLoop::after_prepare(Duration::from_secs(2), 10, NoSleep);
    for _ in 0..3 {
        poll.pause();
        assert!(rt.iterate(poll.next_tick(), &mut sink).is_some());
    }

    let log_path = tmp.path().join("temp-humid-logs/20240131.txt");
    let written = lines(&log_path);
    assert_eq!(written.len(), 3);
    assert_eq!(written[0], "2024-01-31-14:05:07, 80.0, 77.0, err, err, off, off");
    let parsed = LogLine::parse(&written[2]).unwrap();
    assert_eq!(parsed.sensors.len(), 2);
    assert!(parsed.sensors[1].is_none());
    assert_eq!(sink.count(|e| matches!(e, AppEvent::Started { sensors: 2, .. })), 1);
}

#[test]
fn maintenance_rolls_over_to_a_new_day() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = config_on(tmp.path());
    let clock = ManualClock::at(datetime(2024, 1, 31, 23, 59, 58));
    let mut rt = climate(&cfg, MockVolume::with_free_kb(PLENTY_KB), clock.clone());
    let mut sink = RecordingSink::default();
    rt.prepare(&mut sink).unwrap();

    rt.iterate(tick(1, false), &mut sink);
    clock.set(datetime(2024, 2, 1, 0, 0, 10));
    // Until the next maintenance tick the old file stays open.
    rt.iterate(tick(2, false), &mut sink);
    rt.iterate(tick(3, true), &mut sink);

    let logs = tmp.path().join("temp-humid-logs");
    assert_eq!(sorted_names(&logs), ["20240131.txt", "20240201.txt"]);
    assert_eq!(lines(&logs.join("20240131.txt")).len(), 2);
    assert_eq!(lines(&logs.join("20240201.txt")).len(), 1);
    assert_eq!(rt.log().unwrap().day(), datetime(2024, 2, 1, 0, 0, 0).date());
}

#[test]
fn lost_volume_skips_cycles_until_it_returns() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("vol");
    fs::create_dir(&root).unwrap();
    let cfg = config_on(&root);
    let clock = ManualClock::at(datetime(2024, 1, 31, 14, 0, 0));
    let mut rt = climate(&cfg, MockVolume::with_free_kb(PLENTY_KB), clock);
    let mut sink = RecordingSink::default();
    rt.prepare(&mut sink).unwrap();

    fs::remove_dir_all(&root).unwrap();
    assert!(rt.iterate(tick(1, true), &mut sink).is_none());
    assert_eq!(rt.service().cycle(), 0);

    fs::create_dir(&root).unwrap();
    assert!(rt.iterate(tick(2, true), &mut sink).is_some());
    assert_eq!(lines(&root.join("temp-humid-logs/20240131.txt")).len(), 1);
}

#[test]
fn low_space_evicts_the_oldest_log_day() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = config_on(tmp.path());
    let logs = tmp.path().join("temp-humid-logs");
    fs::create_dir(&logs).unwrap();
    for day in ["20240129.txt", "20240127.txt", "20240128.txt"] {
        fs::write(logs.join(day), "old\n").unwrap();
    }
    let volume = MockVolume::with_free_kb(PLENTY_KB);
    let clock = ManualClock::at(datetime(2024, 1, 31, 14, 0, 0));
    let mut rt = climate(&cfg, volume.clone(), clock);
    let mut sink = RecordingSink::default();
    rt.prepare(&mut sink).unwrap();
    assert_eq!(sorted_names(&logs).len(), 4);

    volume.set_free_kb(Some(5_000));
    rt.iterate(tick(11, true), &mut sink);
    assert_eq!(
        sorted_names(&logs),
        ["20240128.txt", "20240129.txt", "20240131.txt"]
    );
    let report = rt.housekeeper().last_report().unwrap();
    assert_eq!(report.free_kb, Some(5_000));
    assert_eq!(report.removed, [logs.join("20240127.txt")]);
}

#[test]
fn cold_start_on_a_full_volume_evicts_one_day_per_period() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = config_on(tmp.path());
    let logs = tmp.path().join("temp-humid-logs");
    fs::create_dir(&logs).unwrap();
    for day in ["20240126.txt", "20240127.txt", "20240128.txt"] {
        fs::write(logs.join(day), "old\n").unwrap();
    }
    let clock = ManualClock::at(datetime(2024, 1, 31, 14, 0, 0));
    let mut rt = climate(&cfg, MockVolume::with_free_kb(10), clock);
    let mut sink = RecordingSink::default();

    rt.prepare(&mut sink).unwrap();
    let mut poll = PollLoop::after_prepare(Duration::from_secs(2), 10, NoSleep);
    for _ in 0..9 {
        poll.pause();
        let tick = poll.next_tick();
        assert!(!tick.maintenance);
        rt.iterate(tick, &mut sink);
    }
    assert_eq!(
        sorted_names(&logs),
        ["20240127.txt", "20240128.txt", "20240131.txt"]
    );
    assert_eq!(sink.count(|e| matches!(e, AppEvent::SpaceReclaimed { .. })), 1);

    poll.pause();
    let tenth = poll.next_tick();
    assert!(tenth.maintenance);
    rt.iterate(tenth, &mut sink);
    assert_eq!(sorted_names(&logs), ["20240128.txt", "20240131.txt"]);
}

// ── Camera loop ───────────────────────────────────────────────

fn camera(
    cfg: &SystemConfig,
    volume: MockVolume,
    clock: ManualClock,
    cam: MockCamera,
) -> CameraRuntime<MockCamera, MockVolume, ManualClock> {
    let capture = CaptureService::new(&cfg.camera, cam);
    let housekeeper = Housekeeper::new(cfg, StorageCategory::images(cfg), volume);
    CameraRuntime::new(capture, housekeeper, clock)
}

#[test]
fn captures_land_in_the_hour_folder() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = config_on(tmp.path());
    let clock = ManualClock::at(datetime(2024, 1, 31, 12, 5, 7));
    let mut rt = camera(
        &cfg,
        MockVolume::with_free_kb(PLENTY_KB),
        clock.clone(),
        MockCamera::default(),
    );
    let mut sink = RecordingSink::default();
    rt.prepare(&mut sink).unwrap();

    assert_eq!(rt.iterate(tick(1, true), &mut sink).as_deref(), Some("image_0507.jpg"));
    assert!(tmp.path().join("captures/2024013112/image_0507.jpg").is_file());
    assert_eq!(rt.capture().camera().modes, [ExposureMode::Auto]);

    // New hour: the folder only moves at the next maintenance tick.
    clock.set(datetime(2024, 1, 31, 13, 0, 2));
    rt.iterate(tick(2, false), &mut sink);
    assert!(tmp.path().join("captures/2024013112/image_0002.jpg").is_file());
    rt.iterate(tick(3, true), &mut sink);
    assert!(tmp.path().join("captures/2024013113/image_0002.jpg").is_file());
}

#[test]
fn night_exposure_after_eight_pm() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = config_on(tmp.path());
    let clock = ManualClock::at(datetime(2024, 1, 31, 19, 59, 0));
    let mut rt = camera(
        &cfg,
        MockVolume::with_free_kb(PLENTY_KB),
        clock.clone(),
        MockCamera::default(),
    );
    let mut sink = RecordingSink::default();
    rt.prepare(&mut sink).unwrap();

    rt.iterate(tick(1, false), &mut sink);
    clock.set(datetime(2024, 1, 31, 20, 1, 0));
    rt.iterate(tick(2, false), &mut sink);
    rt.iterate(tick(3, false), &mut sink);
    assert_eq!(
        rt.capture().camera().modes,
        [ExposureMode::Auto, ExposureMode::Night]
    );
}

#[test]
fn low_space_evicts_two_oldest_hour_folders() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = config_on(tmp.path());
    let captures = tmp.path().join("captures");
    for hour in ["2024013108", "2024013110", "2024013109", "2024013111"] {
        fs::create_dir_all(captures.join(hour)).unwrap();
    }
    let clock = ManualClock::at(datetime(2024, 1, 31, 12, 0, 0));
    let mut rt = camera(&cfg, MockVolume::with_free_kb(10), clock, MockCamera::default());
    let mut sink = RecordingSink::default();

    rt.prepare(&mut sink).unwrap();
    assert_eq!(
        sorted_names(&captures),
        ["2024013110", "2024013111", "2024013112"]
    );

    // The first loop iteration does not run a second pass.
    let mut poll = PollLoop::after_prepare(Duration::from_secs(2), 10, NoSleep);
    rt.iterate(poll.next_tick(), &mut sink);
    assert_eq!(
        sorted_names(&captures),
        ["2024013110", "2024013111", "2024013112"]
    );
}

#[test]
fn capture_fault_is_reported_and_the_loop_continues() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = config_on(tmp.path());
    let clock = ManualClock::at(datetime(2024, 1, 31, 12, 0, 0));
    let cam = MockCamera {
        fault: Some(CaptureFault::CommandFailed),
        ..MockCamera::default()
    };
    let mut rt = camera(&cfg, MockVolume::with_free_kb(PLENTY_KB), clock, cam);
    let mut sink = RecordingSink::default();
    rt.prepare(&mut sink).unwrap();

    assert!(rt.iterate(tick(1, false), &mut sink).is_none());
    assert!(rt.iterate(tick(2, false), &mut sink).is_none());
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::CaptureFailed(CaptureFault::CommandFailed))),
        2
    );
}
