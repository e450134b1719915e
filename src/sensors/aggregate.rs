//! Multi-sensor averaging with partial-failure tolerance.

use super::{SensorMonitor, SensorReading};

/// Mean of this cycle's healthy readings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregate {
    pub humidity: f32,
    pub temperature_f: f32,
    /// Number of monitors that contributed.
    pub count: usize,
}

/// Average the current readings of every healthy monitor.
///
/// Returns `None` when no monitor is healthy this cycle; callers skip
/// actuation and logging rather than treating that as a zero reading.
/// The divisor is the healthy count, never the configured count.
pub fn aggregate<S>(monitors: &[SensorMonitor<S>]) -> Option<Aggregate> {
    mean(monitors.iter().filter_map(SensorMonitor::current_reading))
}

/// Arithmetic mean of humidity and °F over `readings`.
pub fn mean<I>(readings: I) -> Option<Aggregate>
where
    I: IntoIterator<Item = SensorReading>,
{
    let (humidity, temperature_f, count) = readings
        .into_iter()
        .fold((0.0_f32, 0.0_f32, 0_usize), |(h, t, n), r| {
            (h + r.humidity, t + r.temperature_f, n + 1)
        });
    if count == 0 {
        return None;
    }
    Some(Aggregate {
        humidity: humidity / count as f32,
        temperature_f: temperature_f / count as f32,
        count,
    })
}
