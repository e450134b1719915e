//! Property tests for the pieces whose behaviour must hold for any input:
//! sensor health tracking, hysteresis, averaging and eviction order.

use std::path::Path;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use habitat::app::ports::{ActuatorPort, VolumePort};
use habitat::config::ClimateConfig;
use habitat::control::hysteresis::{ActuatorController, ActuatorState};
use habitat::error::{ActuatorFault, SensorFault, StorageFault, TransientKind};
use habitat::sensors::sim::SimulatedSensor;
use habitat::sensors::{HealthStatus, SensorMonitor, aggregate, celsius_to_fahrenheit};
use habitat::storage::naming::NamingScheme;
use habitat::storage::{CategoryKind, StorageCategory, StorageJanitor};
use proptest::prelude::*;

const FAIL: Result<(f32, f32), SensorFault> = Err(SensorFault::Transient(TransientKind::Timeout));
const THRESHOLD: u32 = 50;

// ── Sensor health ─────────────────────────────────────────────

proptest! {
    /// After any sequence of outcomes the monitor is offline exactly when
    /// the trailing run of failures reaches the threshold.
    #[test]
    fn offline_iff_trailing_failures_reach_threshold(
        outcomes in proptest::collection::vec(proptest::bool::weighted(0.9), 1..160),
    ) {
        let mut monitor = SensorMonitor::new(1, SimulatedSensor::scripted([]), THRESHOLD);
        let mut trailing = 0u32;
        for failed in &outcomes {
            monitor.driver_mut().push(if *failed { FAIL } else { Ok((60.0, 24.0)) });
            let _ = monitor.sample();
            trailing = if *failed { trailing + 1 } else { 0 };

            prop_assert_eq!(monitor.consecutive_failures(), trailing);
            let expected = match trailing {
                0 => HealthStatus::Healthy,
                n if n >= THRESHOLD => HealthStatus::Offline,
                _ => HealthStatus::Degraded,
            };
            prop_assert_eq!(monitor.health(), expected);
        }
    }

    /// A single good read clears any failure history.
    #[test]
    fn one_success_resets_the_count(failures in 0usize..200) {
        let mut script = vec![FAIL; failures];
        script.push(Ok((55.0, 20.0)));
        let mut monitor = SensorMonitor::new(3, SimulatedSensor::scripted(script), THRESHOLD);
        for _ in 0..=failures {
            let _ = monitor.sample();
        }
        prop_assert_eq!(monitor.consecutive_failures(), 0);
        prop_assert_eq!(monitor.health(), HealthStatus::Healthy);
        prop_assert!(monitor.current_reading().is_some());
    }
}

// ── Hysteresis ────────────────────────────────────────────────

#[derive(Default)]
struct Recorder(Vec<ActuatorState>);

impl ActuatorPort for Recorder {
    fn command(&mut self, target: ActuatorState) -> Result<(), ActuatorFault> {
        self.0.push(target);
        Ok(())
    }
}

proptest! {
    /// Readings inside the band never move the heat lamp, whatever state
    /// it started in.
    #[test]
    fn heat_lamp_holds_inside_band(
        start_cold in any::<bool>(),
        temps in proptest::collection::vec(72.0f32..=79.0, 1..100),
    ) {
        let cfg = ClimateConfig::default();
        let mut lamp = ActuatorController::heating(&cfg, Recorder::default());
        if start_cold {
            lamp.update(60.0);
        }
        let before = lamp.state();
        let commands = lamp.actuator().0.len();
        for t in temps {
            prop_assert_eq!(lamp.update(t), before);
        }
        prop_assert_eq!(lamp.actuator().0.len(), commands);
    }

    /// The fan only turns on above the upper limit and only off below the
    /// lower one, and every change is exactly one command.
    #[test]
    fn fan_switches_only_outside_band(
        humidity in proptest::collection::vec(50.0f32..100.0, 1..200),
    ) {
        let cfg = ClimateConfig::default();
        let mut fan = ActuatorController::ventilation(&cfg, Recorder::default());
        let mut changes = 0;
        for h in humidity {
            let before = fan.state();
            let after = fan.update(h);
            if after != before {
                changes += 1;
                match after {
                    ActuatorState::On => prop_assert!(h > cfg.humidity_upper),
                    ActuatorState::Off => prop_assert!(h < cfg.humidity_lower),
                }
            }
        }
        prop_assert_eq!(fan.actuator().0.len(), changes);
    }
}

// ── Aggregation ───────────────────────────────────────────────

proptest! {
    /// The aggregate is the mean over healthy sensors only.
    #[test]
    fn aggregate_is_mean_of_healthy_sensors(
        sensors in proptest::collection::vec(
            proptest::option::of((0.0f32..=100.0, -20.0f32..50.0)),
            1..=4,
        ),
    ) {
        let mut monitors: Vec<_> = sensors
            .iter()
            .zip(1u8..)
            .map(|(s, id)| {
                let driver = match s {
                    Some((h, c)) => SimulatedSensor::steady(*h, *c),
                    None => SimulatedSensor::scripted([FAIL]),
                };
                SensorMonitor::new(id, driver, THRESHOLD)
            })
            .collect();
        for m in &mut monitors {
            let _ = m.sample();
        }

        let healthy: Vec<(f32, f32)> = sensors.iter().flatten().copied().collect();
        match aggregate(&monitors) {
            None => prop_assert!(healthy.is_empty()),
            Some(agg) => {
                let n = healthy.len() as f32;
                let humidity = healthy.iter().map(|(h, _)| h).sum::<f32>() / n;
                let temp_f = healthy.iter().map(|(_, c)| celsius_to_fahrenheit(*c)).sum::<f32>() / n;
                prop_assert_eq!(agg.count, healthy.len());
                prop_assert!((agg.humidity - humidity).abs() < 1e-3);
                prop_assert!((agg.temperature_f - temp_f).abs() < 1e-3);
            }
        }
    }
}

// ── Eviction order ────────────────────────────────────────────

struct FixedVolume(u64);

impl VolumePort for FixedVolume {
    fn free_kb(&self, _path: &Path) -> Result<u64, StorageFault> {
        Ok(self.0)
    }
}

fn hour(offset: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| t + Duration::hours(i64::from(offset)))
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Whatever order folders were created in, a low-space pass removes
    /// the oldest hours by name.
    #[test]
    fn janitor_evicts_oldest_hours(
        offsets in proptest::collection::hash_set(0u32..5_000, 1..12),
        evict in 0usize..5,
    ) {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("captures");
        let scheme = NamingScheme::V1;
        let mut names: Vec<String> = Vec::new();
        for off in &offsets {
            let name = scheme.capture_dir_name(hour(*off));
            std::fs::create_dir_all(root.join(&name)).unwrap();
            names.push(name);
        }
        names.sort();

        let category = StorageCategory {
            kind: CategoryKind::Images,
            root: root.clone(),
            evict_count: evict,
            scheme,
        };
        let mut janitor = StorageJanitor::new(FixedVolume(1), tmp.path(), 10_000);
        let report = janitor.reclaim(&category);

        let expected: Vec<_> = names.iter().take(evict).map(|n| root.join(n)).collect();
        prop_assert!(report.is_clean());
        prop_assert_eq!(&report.removed, &expected);
        for n in names.iter().skip(evict) {
            prop_assert!(root.join(n).is_dir());
        }
    }
}
