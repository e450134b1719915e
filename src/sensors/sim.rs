//! In-memory sensor driver for bench runs and tests.
//!
//! Plays back a script of outcomes, then repeats the last one forever.

use std::collections::VecDeque;

use crate::app::ports::HumidityTemperatureSensor;
use crate::error::SensorFault;

pub struct SimulatedSensor {
    script: VecDeque<Result<(f32, f32), SensorFault>>,
    last: Result<(f32, f32), SensorFault>,
    reads: u64,
}

impl SimulatedSensor {
    /// Always returns `(humidity, celsius)`.
    pub fn steady(humidity: f32, celsius: f32) -> Self {
        Self::scripted([Ok((humidity, celsius))])
    }

    /// Always fails with `fault`.
    pub fn failing(fault: SensorFault) -> Self {
        Self::scripted([Err(fault)])
    }

    /// Plays `outcomes` in order, then repeats the final one.
    /// An empty script behaves like `failing(SensorFault::Unknown)`.
    pub fn scripted<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = Result<(f32, f32), SensorFault>>,
    {
        Self {
            script: outcomes.into_iter().collect(),
            last: Err(SensorFault::Unknown),
            reads: 0,
        }
    }

    /// Queue more outcomes behind whatever is left.
    pub fn push(&mut self, outcome: Result<(f32, f32), SensorFault>) {
        self.script.push_back(outcome);
    }

    pub fn reads(&self) -> u64 {
        self.reads
    }
}

impl HumidityTemperatureSensor for SimulatedSensor {
    fn read(&mut self) -> Result<(f32, f32), SensorFault> {
        self.reads += 1;
        if let Some(next) = self.script.pop_front() {
            self.last = next;
        }
        self.last
    }
}
