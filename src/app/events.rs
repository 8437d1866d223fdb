//! Outbound application events.
//!
//! The [`AlarmPanel`](super::service::AlarmPanel) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log to serial, drive a status LED,
//! forward to a monitoring station.

use crate::zone::{Transition, ZoneId, ZoneState};

/// Structured events emitted by the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// A zone moved between states.
    ZoneChanged {
        zone: ZoneId,
        from: ZoneState,
        to: ZoneState,
    },

    /// A zone entered ALARMED and started the tone.
    AlarmRaised(ZoneId),

    /// A zone left ALARMED (duration elapsed or disarmed).
    AlarmCleared(ZoneId),

    /// An event or command named a zone the panel does not own.
    UnknownZone(ZoneId),
}

impl From<Transition> for AppEvent {
    fn from(t: Transition) -> Self {
        Self::ZoneChanged {
            zone: t.zone,
            from: t.from,
            to: t.to,
        }
    }
}
