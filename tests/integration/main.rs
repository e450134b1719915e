//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters.  All tests run on the host with no sensors,
//! PWM chip or camera attached.

mod climate_service_tests;
mod mock_hw;
mod runtime_tests;
