//! Habitat controller library.
//!
//! Climate control, comfort indicators, reading log and capture storage
//! for a Raspberry Pi terrarium.  The two binaries (`habitat` and
//! `habitat-camera`) are thin shells around [`app::runtime`]; everything
//! else is exposed here for integration testing.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod pins;
pub mod scheduler;
pub mod sensors;
pub mod storage;
