//! Shared mutable context threaded through every zone handler.
//!
//! `ZoneContext` is the blackboard the state handlers read from and write
//! to: configuration, the two countdowns, and the peripheral commands the
//! monitor applies once the handler returns.  Handlers never touch the
//! line, the clock or the tone generator themselves.

use crate::config::ZoneConfig;

use super::ZoneId;

// ---------------------------------------------------------------------------
// Peripheral commands (written by handlers; applied by ZoneMonitor)
// ---------------------------------------------------------------------------

/// A one-shot request to the shared tone generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneCommand {
    Start(u32),
    Stop,
}

/// Desired peripheral configuration after the current event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ZoneCommands {
    /// Edge interrupt on the sensing line should be enabled.
    pub edge_interrupt: bool,
    /// The 1 Hz tick source should be running.
    pub clock: bool,
    /// Tone request, consumed exactly once by the monitor.
    pub tone: Option<ToneCommand>,
}

impl ZoneCommands {
    /// Everything off, nothing pending.
    pub fn quiescent() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// ZoneContext
// ---------------------------------------------------------------------------

/// The context passed to every zone state handler.
pub struct ZoneContext {
    pub zone: ZoneId,
    pub config: ZoneConfig,

    // -- Countdowns (phase is implied by the current state) --
    /// Seconds left before the alarm fires.  Meaningful while ACTIVE/DELAYED.
    pub delay_remaining: u8,
    /// Seconds left before the alarm stops.  Meaningful while ALARMED.
    pub alarm_remaining: u8,

    // -- Peripheral outputs --
    pub commands: ZoneCommands,
}

impl ZoneContext {
    pub fn new(zone: ZoneId, config: ZoneConfig) -> Self {
        Self {
            zone,
            config,
            delay_remaining: 0,
            alarm_remaining: 0,
            commands: ZoneCommands::quiescent(),
        }
    }

    /// Request a tone change.  A later request in the same event wins.
    pub fn request_tone(&mut self, cmd: ToneCommand) {
        self.commands.tone = Some(cmd);
    }
}
