//! Integration tests for [`ClimateService`] against mock adapters.

use habitat::app::events::AppEvent;
use habitat::app::ports::IndicatorChannel;
use habitat::app::service::ClimateService;
use habitat::config::ClimateConfig;
use habitat::control::hysteresis::ActuatorState;
use habitat::control::indicator::Comfort;
use habitat::error::{SensorFault, TransientKind};
use habitat::sensors::HealthStatus;
use habitat::sensors::sim::SimulatedSensor;

use crate::mock_hw::{CountingDelay, MockActuator, MockIndicators, RecordingSink};

type Service = ClimateService<SimulatedSensor, MockActuator, MockActuator, MockIndicators, CountingDelay>;

const CHECKSUM: SensorFault = SensorFault::Transient(TransientKind::Checksum);

/// °C that reads as exactly 75 °F after conversion.
const C_FOR_75F: f32 = (75.0 - 32.0) * 5.0 / 9.0;

fn service(config: &ClimateConfig, heat: Option<MockActuator>) -> Service {
    ClimateService::new(
        config,
        MockActuator::default(),
        heat,
        MockIndicators::default(),
        CountingDelay::default(),
    )
}

fn two_sensor_service(a: SimulatedSensor, b: SimulatedSensor) -> Service {
    let mut svc = service(&ClimateConfig::default(), None);
    svc.add_sensor(1, a).unwrap();
    svc.add_sensor(2, b).unwrap();
    svc
}

// ── End-to-end cycle ──────────────────────────────────────────

#[test]
fn one_failing_one_humid_sensor() {
    let mut svc = two_sensor_service(
        SimulatedSensor::failing(CHECKSUM),
        SimulatedSensor::steady(90.0, C_FOR_75F),
    );
    let mut sink = RecordingSink::default();

    let report = svc.tick(&mut sink).expect("one healthy sensor");

    assert_eq!(report.aggregate.count, 1);
    assert_eq!(report.aggregate.humidity, 90.0);
    assert!((report.aggregate.temperature_f - 75.0).abs() < 1e-3);
    assert_eq!(report.fan, ActuatorState::On);
    assert_eq!(report.heat_lamp, ActuatorState::Off);
    assert_eq!(report.indicators.temperature, Comfort::InRange);
    assert_eq!(report.indicators.humidity, Comfort::High);

    assert_eq!(svc.fan().actuator().commands, [ActuatorState::On]);
    assert_eq!(
        svc.indicators().port().writes,
        [
            (IndicatorChannel::Humidity, true),
            (IndicatorChannel::Temperature, true),
            (IndicatorChannel::Humidity, false),
        ]
    );

    assert_eq!(svc.monitors()[0].health(), HealthStatus::Degraded);
    assert!(report.samples[0].is_none());
    assert!(report.samples[1].is_some());
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::ActuatorChanged { actuator: "fan", .. })),
        1
    );
    assert_eq!(sink.count(|e| matches!(e, AppEvent::Cycle(_))), 1);
}

#[test]
fn log_line_marks_failed_sensor() {
    let mut svc = two_sensor_service(
        SimulatedSensor::failing(CHECKSUM),
        SimulatedSensor::steady(80.0, 25.0),
    );
    let report = svc.tick(&mut RecordingSink::default()).unwrap();
    let now = crate::mock_hw::datetime(2024, 1, 31, 14, 5, 7);
    assert_eq!(
        report.log_line(now).to_string(),
        "2024-01-31-14:05:07, err, err, 80.0, 77.0, off, off"
    );
}

// ── No healthy sensors ────────────────────────────────────────

#[test]
fn all_sensors_failing_skips_the_cycle() {
    let mut svc = two_sensor_service(
        SimulatedSensor::failing(CHECKSUM),
        SimulatedSensor::failing(SensorFault::Unknown),
    );
    let mut sink = RecordingSink::default();

    assert!(svc.tick(&mut sink).is_none());
    assert!(svc.fan().actuator().commands.is_empty());
    assert!(svc.indicators().port().writes.is_empty());
    assert_eq!(sink.events, [AppEvent::CycleSkipped { cycle: 1 }]);
}

#[test]
fn no_sensors_configured_skips_the_cycle() {
    let mut svc = service(&ClimateConfig::default(), None);
    assert!(svc.tick(&mut RecordingSink::default()).is_none());
}

// ── Health transitions ────────────────────────────────────────

#[test]
fn offline_and_recovery_are_announced_once() {
    let mut script = vec![Err(CHECKSUM); 60];
    script.push(Ok((80.0, 25.0)));
    let mut svc = two_sensor_service(
        SimulatedSensor::scripted(script),
        SimulatedSensor::steady(80.0, 25.0),
    );
    let mut sink = RecordingSink::default();

    for _ in 0..60 {
        svc.tick(&mut sink);
    }
    assert_eq!(svc.monitors()[0].health(), HealthStatus::Offline);
    assert_eq!(svc.monitors()[0].consecutive_failures(), 60);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::SensorOffline { sensor_id: 1, failures: 50 })),
        1
    );

    let report = svc.tick(&mut sink).unwrap();
    assert_eq!(report.aggregate.count, 2);
    assert_eq!(svc.monitors()[0].health(), HealthStatus::Healthy);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::SensorRecovered { sensor_id: 1 })), 1);
}

#[test]
fn capacity_is_bounded() {
    let mut svc = service(&ClimateConfig::default(), None);
    for id in 1..=4 {
        svc.add_sensor(id, SimulatedSensor::steady(80.0, 25.0)).unwrap();
    }
    assert!(svc.add_sensor(5, SimulatedSensor::steady(80.0, 25.0)).is_err());
}

// ── Actuators ─────────────────────────────────────────────────

#[test]
fn fan_follows_humidity_over_cycles() {
    let sensor = SimulatedSensor::scripted([
        Ok((70.0, 25.0)),
        Ok((90.0, 25.0)),
        Ok((80.0, 25.0)),
        Ok((70.0, 25.0)),
    ]);
    let mut svc = service(&ClimateConfig::default(), None);
    svc.add_sensor(1, sensor).unwrap();
    let mut sink = RecordingSink::default();

    let fans: Vec<_> = (0..4).map(|_| svc.tick(&mut sink).unwrap().fan).collect();
    use ActuatorState::{Off, On};
    assert_eq!(fans, [Off, On, On, Off]);
    assert_eq!(svc.fan().actuator().commands, [On, Off]);
}

#[test]
fn heat_lamp_is_ignored_when_not_wired() {
    let mut svc = service(&ClimateConfig::default(), None);
    svc.add_sensor(1, SimulatedSensor::steady(80.0, 10.0)).unwrap();
    let report = svc.tick(&mut RecordingSink::default()).unwrap();
    assert_eq!(report.heat_lamp, ActuatorState::Off);
    assert!(svc.heat_lamp().is_none());
}

#[test]
fn heat_lamp_switches_on_when_cold() {
    let cfg = ClimateConfig {
        heat_lamp_enabled: true,
        ..ClimateConfig::default()
    };
    let mut svc = service(&cfg, Some(MockActuator::default()));
    // 10 °C = 50 °F, below the 72 °F lower limit.
    svc.add_sensor(1, SimulatedSensor::steady(80.0, 10.0)).unwrap();
    let mut sink = RecordingSink::default();

    let report = svc.tick(&mut sink).unwrap();
    assert_eq!(report.heat_lamp, ActuatorState::On);
    assert_eq!(
        svc.heat_lamp().unwrap().actuator().commands,
        [ActuatorState::On]
    );
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::ActuatorChanged { actuator: "heat lamp", .. })),
        1
    );
}

#[test]
fn failed_fan_command_keeps_state_and_stays_quiet() {
    let mut svc: Service = ClimateService::new(
        &ClimateConfig::default(),
        MockActuator::failing(),
        None,
        MockIndicators::default(),
        CountingDelay::default(),
    );
    svc.add_sensor(1, SimulatedSensor::steady(95.0, 25.0)).unwrap();
    let mut sink = RecordingSink::default();

    let report = svc.tick(&mut sink).unwrap();
    assert_eq!(report.fan, ActuatorState::Off);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::ActuatorChanged { .. })),
        0
    );
}
