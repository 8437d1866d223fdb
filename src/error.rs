//! Unified error types for the HomeSec firmware.
//!
//! The zone state machine and the tone controller never fail: calls that
//! make no sense in the current state are no-ops.  Errors only exist at
//! the edges — configuration intake, peripheral bring-up, and panel
//! assembly — and all of them funnel into [`Error`].  Every variant is
//! `Copy` so it can be logged and passed around without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configuration value rejected by validation.
    Config(ConfigError),
    /// A peripheral read or write failed.
    Peripheral(PeripheralError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// A fixed-capacity table is full.
    Capacity(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Peripheral(e) => write!(f, "peripheral: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Capacity(what) => write!(f, "capacity exhausted: {what}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Rejections raised while validating operator-supplied configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Input was empty after trimming.
    Empty,
    /// Input contained something other than ASCII digits.
    NotDigits,
    /// Arm delay above [`MAX_ALARM_DELAY_SECS`](crate::config::MAX_ALARM_DELAY_SECS).
    DelayOutOfRange(u16),
    /// Alarm duration above [`MAX_ALARM_DURATION_SECS`](crate::config::MAX_ALARM_DURATION_SECS).
    DurationOutOfRange(u16),
    /// Alarm tone pulse not below [`MAX_PULSE`](crate::drivers::tone::MAX_PULSE).
    PulseOutOfRange(u32),
    /// The zone clock period must be at least one millisecond.
    ZeroTickPeriod,
    /// Generic bounded number above its maximum.
    ValueOutOfRange { value: u32, max: u32 },
    /// A serialised configuration blob could not be decoded.
    Malformed,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "no value entered"),
            Self::NotDigits => write!(f, "only digits [0-9] are accepted"),
            Self::DelayOutOfRange(v) => write!(
                f,
                "alarm delay {v}s exceeds {}s",
                crate::config::MAX_ALARM_DELAY_SECS
            ),
            Self::DurationOutOfRange(v) => write!(
                f,
                "alarm duration {v}s exceeds {}s",
                crate::config::MAX_ALARM_DURATION_SECS
            ),
            Self::PulseOutOfRange(p) => write!(
                f,
                "alarm pulse {p} must be below {}",
                crate::drivers::tone::MAX_PULSE
            ),
            Self::ZeroTickPeriod => write!(f, "tick period must be at least 1 ms"),
            Self::ValueOutOfRange { value, max } => write!(f, "{value} exceeds {max}"),
            Self::Malformed => write!(f, "malformed configuration blob"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Peripheral errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeripheralError {
    /// PWM compare / duty write failed.
    PwmWriteFailed,
    /// GPIO level read failed.
    GpioReadFailed,
    /// Periodic timer could not be started or stopped.
    TimerFailed,
}

impl fmt::Display for PeripheralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PwmWriteFailed => write!(f, "PWM write failed"),
            Self::GpioReadFailed => write!(f, "GPIO read failed"),
            Self::TimerFailed => write!(f, "timer start/stop failed"),
        }
    }
}

impl From<PeripheralError> for Error {
    fn from(e: PeripheralError) -> Self {
        Self::Peripheral(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
