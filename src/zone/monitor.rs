//! One zone: the state machine bound to its line, clock and tone port.
//!
//! Every entry point takes `&mut self`, so for a given zone the four of
//! them (`activate`, `deactivate`, `on_edge`, `on_tick`) are mutually
//! exclusive by construction.  Interrupt handlers therefore do not call
//! these directly; they enqueue a [`ZoneEvent`](crate::events::ZoneEvent)
//! and the single consumer ([`AlarmPanel`](crate::app::service::AlarmPanel))
//! drains it.  Platforms that prefer to call in from a critical section
//! can use [`handle_edge_interrupt`](ZoneMonitor::handle_edge_interrupt).

use log::{debug, warn};

use crate::app::ports::{InputLine, TickClock, TonePort};
use crate::config::ZoneConfig;

use super::context::{ToneCommand, ZoneContext};
use super::states::build_state_table;
use super::{Transition, ZoneFsm, ZoneId, ZoneState};

pub struct ZoneMonitor<L: InputLine, C: TickClock> {
    id: ZoneId,
    fsm: ZoneFsm,
    ctx: ZoneContext,
    line: L,
    clock: C,
}

impl<L: InputLine, C: TickClock> ZoneMonitor<L, C> {
    /// Create a disarmed zone.  `config` must already be validated.
    pub fn new(id: ZoneId, config: ZoneConfig, line: L, clock: C) -> Self {
        debug_assert!(config.is_valid(), "zone {id}: invalid config {config:?}");

        let mut ctx = ZoneContext::new(id, config);
        let mut fsm = ZoneFsm::new(build_state_table(), ZoneState::Inactive);
        fsm.start(&mut ctx);

        let mut zone = Self {
            id,
            fsm,
            ctx,
            line,
            clock,
        };
        zone.apply_peripherals();
        zone
    }

    // ── Arm / disarm ──────────────────────────────────────────

    /// INACTIVE → ACTIVE.  Enables edge notifications; the clock stays off.
    pub fn activate(&mut self) -> Option<Transition> {
        if self.state() != ZoneState::Inactive {
            debug!("zone {}: activate ignored in {:?}", self.id, self.state());
            return None;
        }
        let t = self.fsm.force_transition(ZoneState::Active, &mut self.ctx);
        self.apply_peripherals();
        self.wrap(t)
    }

    /// Any state → INACTIVE.  Stops the tone if the zone was alarmed.
    pub fn deactivate(&mut self, tone: &mut impl TonePort) -> Option<Transition> {
        // Interrupt sources go quiet before any state is touched, so a
        // pending edge or tick cannot see a half-reset zone.
        self.line.disable_edge_interrupt();
        self.clock.disable();

        let t = self.fsm.force_transition(ZoneState::Inactive, &mut self.ctx);
        self.apply(tone);
        self.wrap(t)
    }

    // ── Asynchronous inputs ───────────────────────────────────

    /// Deliver a line transition.
    pub fn on_edge(&mut self, rising: bool, tone: &mut impl TonePort) -> Option<Transition> {
        let t = self.fsm.edge(&mut self.ctx, rising);
        self.apply(tone);
        self.wrap(t)
    }

    /// Acknowledge the line's interrupt, sample its level, and deliver
    /// the resulting edge.
    pub fn handle_edge_interrupt(&mut self, tone: &mut impl TonePort) -> Option<Transition> {
        self.line.clear_pending();
        let rising = self.line.is_high();
        self.on_edge(rising, tone)
    }

    /// Deliver one 1 Hz tick.
    pub fn on_tick(&mut self, tone: &mut impl TonePort) -> Option<Transition> {
        let t = self.fsm.tick(&mut self.ctx);
        self.apply(tone);
        self.wrap(t)
    }

    /// Deliver a queued tick stamped with the clock period it fired in.
    ///
    /// A tick from a period that has since been stopped (the clock is off,
    /// or was restarted after the tick was queued) is discarded, so it is
    /// never charged to a fresh countdown.
    pub fn on_queued_tick(&mut self, epoch: u32, tone: &mut impl TonePort) -> Option<Transition> {
        if !self.clock.is_enabled() || epoch != self.clock.epoch() {
            debug!(
                "zone {}: stale tick (epoch {}, clock at {})",
                self.id,
                epoch,
                self.clock.epoch()
            );
            return None;
        }
        self.on_tick(tone)
    }

    /// Replace the configuration.  Only allowed while disarmed.
    pub fn reconfigure(&mut self, config: ZoneConfig) -> bool {
        if self.state() != ZoneState::Inactive {
            warn!(
                "zone {}: reconfigure refused while {:?}",
                self.id,
                self.state()
            );
            return false;
        }
        debug_assert!(config.is_valid(), "zone {}: invalid config {config:?}", self.id);
        self.ctx.config = config;
        true
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn id(&self) -> ZoneId {
        self.id
    }

    pub fn state(&self) -> ZoneState {
        self.fsm.current_state()
    }

    /// Seconds left in the current countdown.  Equals the configured
    /// delay while ACTIVE and zero while INACTIVE.
    pub fn remaining(&self) -> u8 {
        match self.state() {
            ZoneState::Alarmed => self.ctx.alarm_remaining,
            _ => self.ctx.delay_remaining,
        }
    }

    pub fn config(&self) -> &ZoneConfig {
        &self.ctx.config
    }

    pub fn line(&self) -> &L {
        &self.line
    }

    pub fn line_mut(&mut self) -> &mut L {
        &mut self.line
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    // ── Internal ──────────────────────────────────────────────

    fn wrap(&self, t: Option<(ZoneState, ZoneState)>) -> Option<Transition> {
        t.map(|(from, to)| Transition {
            zone: self.id,
            from,
            to,
        })
    }

    fn apply_peripherals(&mut self) {
        let cmd = self.ctx.commands;

        if cmd.edge_interrupt != self.line.edge_interrupt_enabled() {
            if cmd.edge_interrupt {
                self.line.enable_edge_interrupt();
            } else {
                self.line.disable_edge_interrupt();
            }
        }

        if cmd.clock != self.clock.is_enabled() {
            if cmd.clock {
                self.clock.enable();
            } else {
                self.clock.disable();
            }
        }
    }

    fn apply(&mut self, tone: &mut impl TonePort) {
        self.apply_peripherals();
        match self.ctx.commands.tone.take() {
            Some(ToneCommand::Start(pulse)) => tone.start(pulse),
            Some(ToneCommand::Stop) => tone.stop(),
            None => {}
        }
    }
}
