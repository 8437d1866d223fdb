//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured panel events to the
//! ESP-IDF logger (which goes to UART / USB-CDC in production).
//! A monitoring-station uplink would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink {
    emitted: u32,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events logged so far.
    pub fn emitted(&self) -> u32 {
        self.emitted
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        self.emitted = self.emitted.wrapping_add(1);
        match event {
            AppEvent::ZoneChanged { zone, from, to } => {
                info!("ZONE  | {} {:?} -> {:?}", zone, from, to);
            }
            AppEvent::AlarmRaised(zone) => {
                warn!("ALARM | raised by zone {}", zone);
            }
            AppEvent::AlarmCleared(zone) => {
                info!("ALARM | cleared by zone {}", zone);
            }
            AppEvent::UnknownZone(zone) => {
                warn!("PANEL | no such zone {}", zone);
            }
        }
    }
}
