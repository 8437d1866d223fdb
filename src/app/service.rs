//! Panel service — the hexagonal core.
//!
//! [`AlarmPanel`] owns every zone and the single shared tone generator.
//! It is the one consumer of the [`EventQueue`]: each queued edge or tick
//! is routed to its zone, and every resulting transition is reported
//! through the [`EventSink`] port.
//!
//! ```text
//!  EventQueue ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                 │       AlarmPanel        │
//! PanelCommand ──▶│  zones[N] · tone        │──▶ PwmChannel
//!                 └────────────────────────┘
//! ```
//!
//! The tone is shared: whichever zone wrote it last decides whether it
//! sounds.

use heapless::Vec;
use log::{debug, info, warn};

use crate::config::ZoneConfig;
use crate::drivers::tone::ToneController;
use crate::error::{Error, Result};
use crate::events::{EventQueue, ZoneEvent};
use crate::zone::{Transition, ZoneId, ZoneMonitor, ZoneState};

use super::commands::PanelCommand;
use super::events::AppEvent;
use super::ports::{EventSink, InputLine, PwmChannel, TickClock};

// ───────────────────────────────────────────────────────────────
// AlarmPanel
// ───────────────────────────────────────────────────────────────

pub struct AlarmPanel<L: InputLine, C: TickClock, P: PwmChannel, const N: usize> {
    zones: Vec<ZoneMonitor<L, C>, N>,
    tone: ToneController<P>,
}

impl<L: InputLine, C: TickClock, P: PwmChannel, const N: usize> AlarmPanel<L, C, P, N> {
    /// An empty panel driving `output`.  The tone starts silent.
    pub fn new(output: P) -> Self {
        Self {
            zones: Vec::new(),
            tone: ToneController::new(output),
        }
    }

    /// Register a disarmed zone.  Ids are handed out in order from `#0`.
    pub fn add_zone(&mut self, config: ZoneConfig, line: L, clock: C) -> Result<ZoneId> {
        config.validate()?;

        let id = u8::try_from(self.zones.len())
            .map(ZoneId)
            .map_err(|_| Error::Capacity("zone id space exhausted"))?;
        self.zones
            .push(ZoneMonitor::new(id, config, line, clock))
            .map_err(|_| Error::Capacity("zone table full"))?;

        info!(
            "panel: zone {} added (delay={}s, alarm={}s)",
            id, config.delay_secs, config.alarm_duration_secs
        );
        Ok(id)
    }

    // ── Event routing ─────────────────────────────────────────

    /// Deliver one queued event to its zone.
    pub fn dispatch(&mut self, event: ZoneEvent, sink: &mut impl EventSink) {
        let zone_id = event.zone();
        let Some(zone) = self.zones.get_mut(zone_id.0 as usize) else {
            warn!("panel: event for unknown zone {}", zone_id);
            sink.emit(&AppEvent::UnknownZone(zone_id));
            return;
        };

        let t = match event {
            ZoneEvent::Edge { rising, .. } => zone.on_edge(rising, &mut self.tone),
            ZoneEvent::Tick { epoch, .. } => zone.on_queued_tick(epoch, &mut self.tone),
        };
        report(t, sink);
    }

    /// Drain the queue, dispatching in FIFO order.  Returns how many
    /// events were handled.
    pub fn drain(&mut self, queue: &EventQueue, sink: &mut impl EventSink) -> usize {
        queue.drain_events(|event| self.dispatch(event, sink))
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command.  Returns `false` if it was refused
    /// (unknown zone, invalid config, or reconfiguring an armed zone).
    pub fn handle_command(&mut self, cmd: PanelCommand, sink: &mut impl EventSink) -> bool {
        match cmd {
            PanelCommand::ArmAll => {
                for zone in &mut self.zones {
                    report(zone.activate(), sink);
                }
                true
            }
            PanelCommand::DisarmAll => {
                for zone in &mut self.zones {
                    report(zone.deactivate(&mut self.tone), sink);
                }
                true
            }
            PanelCommand::Arm(id) => match self.zones.get_mut(id.0 as usize) {
                Some(zone) => {
                    report(zone.activate(), sink);
                    true
                }
                None => unknown(id, sink),
            },
            PanelCommand::Disarm(id) => match self.zones.get_mut(id.0 as usize) {
                Some(zone) => {
                    report(zone.deactivate(&mut self.tone), sink);
                    true
                }
                None => unknown(id, sink),
            },
            PanelCommand::Reconfigure(id, config) => {
                if let Err(e) = config.validate() {
                    warn!("panel: zone {} reconfigure rejected: {}", id, e);
                    return false;
                }
                match self.zones.get_mut(id.0 as usize) {
                    Some(zone) => zone.reconfigure(config),
                    None => unknown(id, sink),
                }
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn zone(&self, id: ZoneId) -> Option<&ZoneMonitor<L, C>> {
        self.zones.get(id.0 as usize)
    }

    pub fn zone_mut(&mut self, id: ZoneId) -> Option<&mut ZoneMonitor<L, C>> {
        self.zones.get_mut(id.0 as usize)
    }

    pub fn zone_state(&self, id: ZoneId) -> Option<ZoneState> {
        self.zone(id).map(ZoneMonitor::state)
    }

    pub fn zones(&self) -> impl Iterator<Item = &ZoneMonitor<L, C>> {
        self.zones.iter()
    }

    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    /// At least one zone is sounding.
    pub fn any_alarmed(&self) -> bool {
        self.zones.iter().any(|z| z.state() == ZoneState::Alarmed)
    }

    pub fn tone(&self) -> &ToneController<P> {
        &self.tone
    }

    pub fn tone_mut(&mut self) -> &mut ToneController<P> {
        &mut self.tone
    }
}

// ── Internal ──────────────────────────────────────────────────

fn report(t: Option<Transition>, sink: &mut impl EventSink) {
    let Some(t) = t else { return };
    sink.emit(&AppEvent::from(t));
    if t.cleared_alarm() {
        sink.emit(&AppEvent::AlarmCleared(t.zone));
    }
    if t.raised_alarm() {
        sink.emit(&AppEvent::AlarmRaised(t.zone));
    }
}

fn unknown(id: ZoneId, sink: &mut impl EventSink) -> bool {
    debug!("panel: command for unknown zone {}", id);
    sink.emit(&AppEvent::UnknownZone(id));
    false
}
