//! Application core: domain orchestration behind port traits.
//!
//! The climate and camera loops are assembled here from the sensor,
//! control and storage layers.  All interaction with hardware and the
//! filesystem's outer edges happens through the **port traits** defined
//! in [`ports`], keeping this layer testable with in-memory fakes.

pub mod capture;
pub mod events;
pub mod housekeeping;
pub mod ports;
pub mod runtime;
pub mod service;
