//! Control laws: hysteresis on/off control for the actuators and
//! comfort-band classification for the indicators.

pub mod hysteresis;
pub mod indicator;
