//! Optional read deadline for a blocking sensor driver.
//!
//! The bare drivers block until the kernel gives up, which stalls the
//! whole control loop.  [`DeadlineSensor`] runs the read on a worker
//! thread and reports `Transient(Timeout)` once the deadline elapses.
//!
//! At most one read is ever in flight per sensor.  If a read is still
//! outstanding on the next call, the caller waits on that same read again
//! instead of stacking up another thread, and whatever it eventually
//! returns is used as that call's sample.
//!
//! A driver that panics poisons the shared lock.  The next read logs the
//! panic once, clears the poison and carries on with the same driver.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use log::error;

use crate::app::ports::HumidityTemperatureSensor;
use crate::error::{SensorFault, TransientKind};

type Outcome = Result<(f32, f32), SensorFault>;

pub struct DeadlineSensor<S> {
    inner: Arc<Mutex<S>>,
    deadline: Duration,
    in_flight: Option<Receiver<Outcome>>,
}

impl<S> DeadlineSensor<S>
where
    S: HumidityTemperatureSensor + Send + 'static,
{
    pub fn new(inner: S, deadline: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(inner)),
            deadline,
            in_flight: None,
        }
    }

    fn spawn_read(&self) -> Receiver<Outcome> {
        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        thread::spawn(move || {
            let mut sensor = inner.lock().unwrap_or_else(|poisoned| {
                error!("sensor driver panicked during an earlier read; resuming");
                inner.clear_poison();
                poisoned.into_inner()
            });
            let outcome = sensor.read();
            drop(sensor);
            // Receiver may be gone if the monitor was dropped.
            let _ = tx.send(outcome);
        });
        rx
    }
}

impl<S> HumidityTemperatureSensor for DeadlineSensor<S>
where
    S: HumidityTemperatureSensor + Send + 'static,
{
    fn read(&mut self) -> Outcome {
        let rx = match self.in_flight.take() {
            Some(rx) => rx,
            None => self.spawn_read(),
        };
        match rx.recv_timeout(self.deadline) {
            Ok(outcome) => outcome,
            Err(RecvTimeoutError::Timeout) => {
                self.in_flight = Some(rx);
                Err(SensorFault::Transient(TransientKind::Timeout))
            }
            // Worker panicked inside the driver.
            Err(RecvTimeoutError::Disconnected) => Err(SensorFault::Unknown),
        }
    }
}
