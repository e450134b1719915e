//! Actuator drivers and the peripheral backends they run on.

pub mod delay;
pub mod fan;
pub mod heat_lamp;
pub mod sim;
pub mod status_led;
pub mod sysfs;
