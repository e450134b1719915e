//! Unified error types for the habitat controller.
//!
//! Every hardware or filesystem boundary returns one of the fault enums
//! below as a value.  The control loops log them and carry on.  Only
//! startup paths return the top-level [`Error`]; the one fault that ends a
//! process is a missing data volume at startup.
//! All variants are `Copy` so they can be stored in reports and events
//! without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The data volume could not be prepared.
    Init(InitFault),
    /// Configuration or wiring does not fit the controller.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(e) => write!(f, "init: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor faults
// ---------------------------------------------------------------------------

/// The driver's own "try again" class of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransientKind {
    /// Sensor did not answer in time or was busy.
    NotReady,
    /// Frame received but the checksum did not match.
    Checksum,
    /// The optional read deadline elapsed.
    Timeout,
    /// Values decoded but are physically implausible.
    OutOfRange,
}

impl fmt::Display for TransientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotReady => write!(f, "not ready"),
            Self::Checksum => write!(f, "checksum mismatch"),
            Self::Timeout => write!(f, "read deadline elapsed"),
            Self::OutOfRange => write!(f, "reading out of range"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorFault {
    /// Flaky hardware; expected now and then.
    Transient(TransientKind),
    /// Anything else the driver reported.  Same counting policy, kept
    /// apart so diagnostics can tell a software defect from a bad wire.
    Unknown,
}

impl SensorFault {
    pub fn is_transient(self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

impl fmt::Display for SensorFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transient(kind) => write!(f, "transient fault ({kind})"),
            Self::Unknown => write!(f, "other fault"),
        }
    }
}

impl std::error::Error for SensorFault {}


// ---------------------------------------------------------------------------
// Actuator faults
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorFault {
    /// PWM duty-cycle write failed.
    PwmWriteFailed,
    /// GPIO set failed.
    GpioWriteFailed,
}

impl fmt::Display for ActuatorFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PwmWriteFailed => write!(f, "PWM write failed"),
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
        }
    }
}

impl std::error::Error for ActuatorFault {}


// ---------------------------------------------------------------------------
// Storage faults
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageFault {
    /// Category directory could not be listed.
    ListFailure,
    /// An eviction unit could not be removed.
    DeleteFailure,
    /// Free-space query against the data volume failed.
    QueryFailure,
    /// Appending to the reading log failed.
    WriteFailure,
}

impl fmt::Display for StorageFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ListFailure => write!(f, "directory listing failed"),
            Self::DeleteFailure => write!(f, "deletion failed"),
            Self::QueryFailure => write!(f, "free-space query failed"),
            Self::WriteFailure => write!(f, "log write failed"),
        }
    }
}

impl std::error::Error for StorageFault {}


// ---------------------------------------------------------------------------
// Initialisation faults
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitFault {
    /// The removable data volume is not mounted.
    VolumeMissing,
    /// A category or capture-hour directory could not be created.
    CreateDirFailed,
    /// The daily log file could not be opened for appending.
    OpenLogFailed,
}

impl fmt::Display for InitFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VolumeMissing => write!(f, "data volume missing"),
            Self::CreateDirFailed => write!(f, "directory creation failed"),
            Self::OpenLogFailed => write!(f, "log file open failed"),
        }
    }
}

impl std::error::Error for InitFault {}

impl From<InitFault> for Error {
    fn from(e: InitFault) -> Self {
        Self::Init(e)
    }
}

// ---------------------------------------------------------------------------
// Capture faults
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureFault {
    /// The capture tool could not be started.
    Unavailable,
    /// The capture tool ran and reported failure.
    CommandFailed,
    /// No capture directory has been prepared yet.
    NoDirectory,
}

impl fmt::Display for CaptureFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "camera unavailable"),
            Self::CommandFailed => write!(f, "capture command failed"),
            Self::NoDirectory => write!(f, "no capture directory"),
        }
    }
}

impl std::error::Error for CaptureFault {}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
