//! System configuration parameters
//!
//! The operator enters these over the console at boot.  This module owns
//! the limits and the validation; the prompt/UART plumbing only collects
//! text and hands it to [`parse_delay`] / [`parse_duration`].

use serde::{Deserialize, Serialize};

use crate::drivers::tone::{LONG_PULSE, MAX_PULSE};
use crate::error::ConfigError;

/// Longest arm delay an operator may configure (seconds, inclusive).
pub const MAX_ALARM_DELAY_SECS: u8 = 30;
/// Longest alarm sound an operator may configure (seconds, inclusive).
pub const MAX_ALARM_DURATION_SECS: u8 = 60;

/// Per-zone configuration, validated before a zone is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneConfig {
    /// Seconds between detected motion and the alarm (0–30).
    pub delay_secs: u8,
    /// Seconds the alarm sounds before the zone rearms itself (0–60).
    pub alarm_duration_secs: u8,
    /// Tone pulse width used while alarmed (0 – MAX_PULSE-1).
    pub alarm_pulse: u32,
}

impl ZoneConfig {
    /// Build a zone config with the default alarm tone, rejecting
    /// out-of-range timings.
    pub fn new(delay_secs: u8, alarm_duration_secs: u8) -> Result<Self, ConfigError> {
        let cfg = Self {
            delay_secs,
            alarm_duration_secs,
            alarm_pulse: LONG_PULSE,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Same as [`new`](Self::new) with an explicit alarm tone.
    pub fn with_pulse(
        delay_secs: u8,
        alarm_duration_secs: u8,
        alarm_pulse: u32,
    ) -> Result<Self, ConfigError> {
        let cfg = Self {
            delay_secs,
            alarm_duration_secs,
            alarm_pulse,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.delay_secs > MAX_ALARM_DELAY_SECS {
            return Err(ConfigError::DelayOutOfRange(self.delay_secs as u16));
        }
        if self.alarm_duration_secs > MAX_ALARM_DURATION_SECS {
            return Err(ConfigError::DurationOutOfRange(
                self.alarm_duration_secs as u16,
            ));
        }
        if self.alarm_pulse >= MAX_PULSE {
            return Err(ConfigError::PulseOutOfRange(self.alarm_pulse));
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            delay_secs: 10,
            alarm_duration_secs: 30,
            alarm_pulse: LONG_PULSE,
        }
    }
}

/// Whole-system configuration: an AREA zone (room PIR) and a BARRIER zone
/// (door/window PIR) with independent arm delays and one shared alarm
/// duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Arm delay for the AREA zone (seconds).
    pub area_delay_secs: u8,
    /// Arm delay for the BARRIER zone (seconds).
    pub barrier_delay_secs: u8,
    /// Alarm duration shared by both zones (seconds).
    pub alarm_duration_secs: u8,
    /// Tone pulse width while alarmed.
    pub alarm_pulse: u32,
    /// Countdown tick period (milliseconds).
    pub tick_period_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            area_delay_secs: 10,
            barrier_delay_secs: 5,
            alarm_duration_secs: 30,
            alarm_pulse: LONG_PULSE,
            tick_period_ms: 1000, // 1 Hz
        }
    }
}

impl SystemConfig {
    pub fn area_zone(&self) -> ZoneConfig {
        ZoneConfig {
            delay_secs: self.area_delay_secs,
            alarm_duration_secs: self.alarm_duration_secs,
            alarm_pulse: self.alarm_pulse,
        }
    }

    pub fn barrier_zone(&self) -> ZoneConfig {
        ZoneConfig {
            delay_secs: self.barrier_delay_secs,
            alarm_duration_secs: self.alarm_duration_secs,
            alarm_pulse: self.alarm_pulse,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.area_zone().validate()?;
        self.barrier_zone().validate()?;
        if self.tick_period_ms == 0 {
            return Err(ConfigError::ZeroTickPeriod);
        }
        Ok(())
    }

    /// Decode and validate a JSON configuration blob.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json).map_err(|_| ConfigError::Malformed)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Compact binary form for handing the configuration between tasks.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ConfigError> {
        postcard::to_allocvec(self).map_err(|_| ConfigError::Malformed)
    }

    /// Decode and validate the [`to_bytes`](Self::to_bytes) form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let cfg: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Malformed)?;
        cfg.validate()?;
        Ok(cfg)
    }
}

// ---------------------------------------------------------------------------
// Console number entry
// ---------------------------------------------------------------------------

/// Parse an operator-typed number in `0..=max`.
///
/// Surrounding whitespace (the CR/LF the terminal sends) is ignored; any
/// other non-digit is rejected rather than skipped.
pub fn parse_bounded(input: &str, max: u16) -> Result<u16, ConfigError> {
    let digits = input.trim();
    if digits.is_empty() {
        return Err(ConfigError::Empty);
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ConfigError::NotDigits);
    }

    // Digit-only strings can still overflow u32 if the operator leans on a key.
    let value = digits
        .bytes()
        .try_fold(0u32, |acc, b| acc.checked_mul(10)?.checked_add((b - b'0') as u32))
        .unwrap_or(u32::MAX);

    if value > max as u32 {
        return Err(ConfigError::ValueOutOfRange {
            value,
            max: max as u32,
        });
    }
    Ok(value as u16)
}

/// Parse an arm delay entered at the console.
pub fn parse_delay(input: &str) -> Result<u8, ConfigError> {
    match parse_bounded(input, MAX_ALARM_DELAY_SECS as u16) {
        Ok(v) => Ok(v as u8),
        Err(ConfigError::ValueOutOfRange { value, .. }) => {
            Err(ConfigError::DelayOutOfRange(value.min(u16::MAX as u32) as u16))
        }
        Err(e) => Err(e),
    }
}

/// Parse an alarm duration entered at the console.
pub fn parse_duration(input: &str) -> Result<u8, ConfigError> {
    match parse_bounded(input, MAX_ALARM_DURATION_SECS as u16) {
        Ok(v) => Ok(v as u8),
        Err(ConfigError::ValueOutOfRange { value, .. }) => {
            Err(ConfigError::DurationOutOfRange(value.min(u16::MAX as u32) as u16))
        }
        Err(e) => Err(e),
    }
}
