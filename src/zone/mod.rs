//! Function-pointer state machine for one intrusion-detection zone.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  StateTable                                                         │
//! │  ┌──────────┬──────────┬──────────┬────────────────┬──────────────┐ │
//! │  │ State    │ on_enter │ on_exit  │ on_edge        │ on_tick      │ │
//! │  ├──────────┼──────────┼──────────┼────────────────┼──────────────┤ │
//! │  │ Inactive │ fn(ctx)  │ -        │ fn(ctx,rising) │ fn(ctx)      │ │
//! │  │ Active   │ fn(ctx)  │ -        │ fn(ctx,rising) │ fn(ctx)      │ │
//! │  │ Delayed  │ fn(ctx)  │ -        │ fn(ctx,rising) │ fn(ctx)      │ │
//! │  │ Alarmed  │ fn(ctx)  │ fn(ctx)  │ fn(ctx,rising) │ fn(ctx)      │ │
//! │  └──────────┴──────────┴──────────┴────────────────┴──────────────┘ │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The two asynchronous inputs — a line edge and a 1 Hz tick — are routed
//! to the current state's `on_edge` / `on_tick`.  If the handler returns
//! `Some(next)`, the engine runs `on_exit` for the current state, then
//! `on_enter` for the next.  All handlers work on a [`ZoneContext`]; the
//! [`ZoneMonitor`] turns the resulting commands into peripheral calls.

pub mod context;
pub mod monitor;
pub mod states;

use core::fmt;

use context::ZoneContext;
use log::info;

pub use monitor::ZoneMonitor;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Index of a zone within its panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ZoneId(pub u8);

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Enumeration of all zone states.
/// Must stay in sync with the table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ZoneState {
    Inactive = 0,
    Active = 1,
    Delayed = 2,
    Alarmed = 3,
}

impl ZoneState {
    /// Total number of states — used to size the table array.
    pub const COUNT: usize = 4;

    /// Convert an index back to `ZoneState`.  Out-of-range indices assert
    /// in debug builds and fall back to `Inactive` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Inactive,
            1 => Self::Active,
            2 => Self::Delayed,
            3 => Self::Alarmed,
            _ => {
                debug_assert!(false, "invalid zone state index: {idx}");
                Self::Inactive
            }
        }
    }

    /// States in which the 1 Hz clock runs.
    pub fn is_counting(self) -> bool {
        matches!(self, Self::Delayed | Self::Alarmed)
    }
}

/// A state change reported by a [`ZoneMonitor`] entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub zone: ZoneId,
    pub from: ZoneState,
    pub to: ZoneState,
}

impl Transition {
    pub fn raised_alarm(&self) -> bool {
        self.to == ZoneState::Alarmed
    }

    pub fn cleared_alarm(&self) -> bool {
        self.from == ZoneState::Alarmed
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// `on_enter` / `on_exit` action.  Runs exactly once per transition.
pub type StateActionFn = fn(&mut ZoneContext);

/// Edge handler.  `rising` is the line level sampled after the interrupt
/// was acknowledged.
pub type EdgeFn = fn(&mut ZoneContext, bool) -> Option<ZoneState>;

/// Tick handler.
pub type TickFn = fn(&mut ZoneContext) -> Option<ZoneState>;

/// Static descriptor for a single zone state.
pub struct StateDescriptor {
    pub id: ZoneState,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_edge: EdgeFn,
    pub on_tick: TickFn,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// The zone state machine engine.
///
/// Owns the state table; the [`ZoneContext`] is threaded through every
/// call so that the caller decides when the resulting commands hit the
/// hardware.
pub struct ZoneFsm {
    table: [StateDescriptor; ZoneState::COUNT],
    current: usize,
}

impl ZoneFsm {
    pub fn new(table: [StateDescriptor; ZoneState::COUNT], initial: ZoneState) -> Self {
        Self {
            table,
            current: initial as usize,
        }
    }

    /// Run the initial `on_enter`.  Call once after construction.
    pub fn start(&mut self, ctx: &mut ZoneContext) {
        info!(
            "zone {}: starting in {}",
            ctx.zone, self.table[self.current].name
        );
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Deliver an edge.  Returns `(from, to)` if the state changed.
    pub fn edge(&mut self, ctx: &mut ZoneContext, rising: bool) -> Option<(ZoneState, ZoneState)> {
        let next = (self.table[self.current].on_edge)(ctx, rising)?;
        self.transition(next, ctx)
    }

    /// Deliver a tick.  Returns `(from, to)` if the state changed.
    pub fn tick(&mut self, ctx: &mut ZoneContext) -> Option<(ZoneState, ZoneState)> {
        let next = (self.table[self.current].on_tick)(ctx)?;
        self.transition(next, ctx)
    }

    /// Jump to `next` regardless of what the handlers would do
    /// (arm / disarm).  No-op if already there.
    pub fn force_transition(
        &mut self,
        next: ZoneState,
        ctx: &mut ZoneContext,
    ) -> Option<(ZoneState, ZoneState)> {
        self.transition(next, ctx)
    }

    pub fn current_state(&self) -> ZoneState {
        ZoneState::from_index(self.current)
    }

    fn transition(
        &mut self,
        next: ZoneState,
        ctx: &mut ZoneContext,
    ) -> Option<(ZoneState, ZoneState)> {
        let next_idx = next as usize;
        if next_idx == self.current {
            return None;
        }
        let from = self.current_state();

        info!(
            "zone {}: {} -> {}",
            ctx.zone, self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }

        Some((from, next))
    }
}

#[cfg(test)]
mod tests {
    use super::context::{ToneCommand, ZoneContext};
    use super::*;
    use crate::config::ZoneConfig;

    fn make_ctx(delay: u8, duration: u8) -> ZoneContext {
        ZoneContext::new(ZoneId(0), ZoneConfig::new(delay, duration).unwrap())
    }

    fn make_fsm(ctx: &mut ZoneContext) -> ZoneFsm {
        let mut fsm = ZoneFsm::new(states::build_state_table(), ZoneState::Inactive);
        fsm.start(ctx);
        fsm
    }

    fn armed(delay: u8, duration: u8) -> (ZoneFsm, ZoneContext) {
        let mut ctx = make_ctx(delay, duration);
        let mut fsm = make_fsm(&mut ctx);
        fsm.force_transition(ZoneState::Active, &mut ctx);
        (fsm, ctx)
    }

    #[test]
    fn starts_inactive_with_everything_off() {
        let mut ctx = make_ctx(5, 10);
        let fsm = make_fsm(&mut ctx);
        assert_eq!(fsm.current_state(), ZoneState::Inactive);
        assert!(!ctx.commands.edge_interrupt);
        assert!(!ctx.commands.clock);
        assert_eq!(ctx.delay_remaining, 0);
    }

    #[test]
    fn arming_enables_edges_and_seeds_delay() {
        let (fsm, ctx) = armed(5, 10);
        assert_eq!(fsm.current_state(), ZoneState::Active);
        assert!(ctx.commands.edge_interrupt);
        assert!(!ctx.commands.clock);
        assert_eq!(ctx.delay_remaining, 5);
    }

    #[test]
    fn rising_edge_starts_delay() {
        let (mut fsm, mut ctx) = armed(5, 10);
        let t = fsm.edge(&mut ctx, true);
        assert_eq!(t, Some((ZoneState::Active, ZoneState::Delayed)));
        assert!(ctx.commands.clock);
        assert_eq!(ctx.delay_remaining, 5);
    }

    #[test]
    fn falling_edge_while_active_is_ignored() {
        let (mut fsm, mut ctx) = armed(5, 10);
        assert_eq!(fsm.edge(&mut ctx, false), None);
        assert_eq!(fsm.current_state(), ZoneState::Active);
    }

    #[test]
    fn delay_elapses_into_alarm() {
        let (mut fsm, mut ctx) = armed(3, 10);
        fsm.edge(&mut ctx, true);
        assert_eq!(fsm.tick(&mut ctx), None);
        assert_eq!(fsm.tick(&mut ctx), None);
        assert_eq!(ctx.commands.tone, None);
        assert_eq!(
            fsm.tick(&mut ctx),
            Some((ZoneState::Delayed, ZoneState::Alarmed))
        );
        assert_eq!(
            ctx.commands.tone,
            Some(ToneCommand::Start(ctx.config.alarm_pulse))
        );
        assert_eq!(ctx.alarm_remaining, 10);
    }

    #[test]
    fn falling_edge_cancels_delay() {
        let (mut fsm, mut ctx) = armed(3, 10);
        fsm.edge(&mut ctx, true);
        fsm.tick(&mut ctx);
        let t = fsm.edge(&mut ctx, false);
        assert_eq!(t, Some((ZoneState::Delayed, ZoneState::Active)));
        assert!(!ctx.commands.clock);
        assert_eq!(ctx.delay_remaining, 3);
    }

    #[test]
    fn rising_edge_while_delayed_does_not_restart_countdown() {
        let (mut fsm, mut ctx) = armed(3, 10);
        fsm.edge(&mut ctx, true);
        fsm.tick(&mut ctx);
        assert_eq!(fsm.edge(&mut ctx, true), None);
        assert_eq!(ctx.delay_remaining, 2);
    }

    #[test]
    fn alarm_runs_for_configured_duration() {
        let (mut fsm, mut ctx) = armed(1, 4);
        fsm.edge(&mut ctx, true);
        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), ZoneState::Alarmed);
        ctx.commands.tone = None;

        for _ in 0..3 {
            assert_eq!(fsm.tick(&mut ctx), None);
        }
        assert_eq!(
            fsm.tick(&mut ctx),
            Some((ZoneState::Alarmed, ZoneState::Active))
        );
        assert_eq!(ctx.commands.tone, Some(ToneCommand::Stop));
        assert!(!ctx.commands.clock);
        assert!(ctx.commands.edge_interrupt);
    }

    #[test]
    fn edges_ignored_while_alarmed() {
        let (mut fsm, mut ctx) = armed(1, 4);
        fsm.edge(&mut ctx, true);
        fsm.tick(&mut ctx);
        ctx.commands.tone = None;
        assert_eq!(fsm.edge(&mut ctx, true), None);
        assert_eq!(fsm.edge(&mut ctx, false), None);
        assert_eq!(ctx.commands.tone, None);
        assert_eq!(ctx.alarm_remaining, 4);
    }

    #[test]
    fn zero_delay_alarms_on_the_edge() {
        let (mut fsm, mut ctx) = armed(0, 4);
        let t = fsm.edge(&mut ctx, true);
        assert_eq!(t, Some((ZoneState::Active, ZoneState::Alarmed)));
        assert!(matches!(ctx.commands.tone, Some(ToneCommand::Start(_))));
    }

    #[test]
    fn zero_duration_suppresses_the_alarm() {
        let (mut fsm, mut ctx) = armed(2, 0);
        fsm.edge(&mut ctx, true);
        fsm.tick(&mut ctx);
        let t = fsm.tick(&mut ctx);
        assert_eq!(t, Some((ZoneState::Delayed, ZoneState::Active)));
        assert_eq!(ctx.commands.tone, None);
        assert!(!ctx.commands.clock);
    }

    #[test]
    fn zero_delay_and_duration_stays_active() {
        let (mut fsm, mut ctx) = armed(0, 0);
        assert_eq!(fsm.edge(&mut ctx, true), None);
        assert_eq!(fsm.current_state(), ZoneState::Active);
        assert_eq!(ctx.commands.tone, None);
    }

    #[test]
    fn force_to_inactive_from_alarm_stops_tone() {
        let (mut fsm, mut ctx) = armed(1, 10);
        fsm.edge(&mut ctx, true);
        fsm.tick(&mut ctx);
        ctx.commands.tone = None;

        let t = fsm.force_transition(ZoneState::Inactive, &mut ctx);
        assert_eq!(t, Some((ZoneState::Alarmed, ZoneState::Inactive)));
        assert_eq!(ctx.commands.tone, Some(ToneCommand::Stop));
        assert!(!ctx.commands.clock);
        assert!(!ctx.commands.edge_interrupt);
        assert_eq!(ctx.alarm_remaining, 0);
    }

    #[test]
    fn force_to_current_state_is_a_no_op() {
        let (mut fsm, mut ctx) = armed(5, 10);
        assert_eq!(fsm.force_transition(ZoneState::Active, &mut ctx), None);
    }

    #[test]
    fn ticks_ignored_outside_countdowns() {
        let mut ctx = make_ctx(5, 10);
        let mut fsm = make_fsm(&mut ctx);
        assert_eq!(fsm.tick(&mut ctx), None);
        fsm.force_transition(ZoneState::Active, &mut ctx);
        assert_eq!(fsm.tick(&mut ctx), None);
        assert_eq!(fsm.current_state(), ZoneState::Active);
        assert_eq!(ctx.delay_remaining, 5);
    }

    #[test]
    fn state_from_index_roundtrip() {
        for i in 0..ZoneState::COUNT {
            assert_eq!(ZoneState::from_index(i) as usize, i);
        }
    }

    #[test]
    fn table_order_matches_discriminants() {
        for (i, row) in states::build_state_table().iter().enumerate() {
            assert_eq!(row.id as usize, i, "row {} out of place", row.name);
        }
    }
}
