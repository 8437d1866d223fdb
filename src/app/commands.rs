//! Inbound commands to the panel.
//!
//! These represent actions requested by the outside world (keypad,
//! console, remote link) that the [`AlarmPanel`](super::service::AlarmPanel)
//! interprets and acts upon.

use crate::config::ZoneConfig;
use crate::zone::ZoneId;

/// Commands that external adapters can send into the panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelCommand {
    /// Arm every disarmed zone.
    ArmAll,

    /// Disarm every zone, silencing the tone.
    DisarmAll,

    /// Arm a single zone.
    Arm(ZoneId),

    /// Disarm a single zone.
    Disarm(ZoneId),

    /// Replace a disarmed zone's timing.  Refused while armed.
    Reconfigure(ZoneId, ZoneConfig),
}
