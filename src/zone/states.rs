//! Concrete zone state handlers and table builder.
//!
//! Each state is a row of plain `fn` pointers — no closures, no dynamic
//! dispatch, no heap.
//!
//! ```text
//!                 activate()
//!  INACTIVE ─────────────────▶ ACTIVE ◀─────────────────────────┐
//!     ▲                         │   ▲                            │
//!     │                  rising │   │ falling                    │
//!     │                         ▼   │                            │
//!     │                        DELAYED ──[delay elapsed]──▶ ALARMED
//!     │                                                          │
//!     │                                    [alarm duration elapsed]
//!     │
//!  deactivate() from any state
//! ```
//!
//! Zero-length phases are skipped: with `delay_secs == 0` a rising edge
//! alarms immediately, and with `alarm_duration_secs == 0` an elapsed
//! delay returns straight to ACTIVE without sounding.

use super::context::{ToneCommand, ZoneContext};
use super::{StateDescriptor, ZoneState};
use log::{debug, info, warn};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once per zone.
pub fn build_state_table() -> [StateDescriptor; ZoneState::COUNT] {
    [
        // Index 0 — Inactive
        StateDescriptor {
            id: ZoneState::Inactive,
            name: "Inactive",
            on_enter: Some(inactive_enter),
            on_exit: None,
            on_edge: ignore_edge,
            on_tick: ignore_tick,
        },
        // Index 1 — Active
        StateDescriptor {
            id: ZoneState::Active,
            name: "Active",
            on_enter: Some(active_enter),
            on_exit: None,
            on_edge: active_edge,
            on_tick: ignore_tick,
        },
        // Index 2 — Delayed
        StateDescriptor {
            id: ZoneState::Delayed,
            name: "Delayed",
            on_enter: Some(delayed_enter),
            on_exit: None,
            on_edge: delayed_edge,
            on_tick: delayed_tick,
        },
        // Index 3 — Alarmed
        StateDescriptor {
            id: ZoneState::Alarmed,
            name: "Alarmed",
            on_enter: Some(alarmed_enter),
            on_exit: Some(alarmed_exit),
            on_edge: ignore_edge,
            on_tick: alarmed_tick,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  Shared no-op handlers
// ═══════════════════════════════════════════════════════════════════════════

fn ignore_edge(_ctx: &mut ZoneContext, _rising: bool) -> Option<ZoneState> {
    None
}

fn ignore_tick(ctx: &mut ZoneContext) -> Option<ZoneState> {
    // The clock is disabled in these states; a tick here was already in
    // flight when it was stopped.
    debug!("zone {}: stale tick ignored", ctx.zone);
    None
}

/// Where the zone goes once the arm delay has run out.
fn delay_elapsed(ctx: &ZoneContext) -> ZoneState {
    if ctx.config.alarm_duration_secs == 0 {
        warn!(
            "zone {}: alarm duration is 0s, alarm suppressed",
            ctx.zone
        );
        ZoneState::Active
    } else {
        ZoneState::Alarmed
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  INACTIVE — disarmed, line and clock silenced
// ═══════════════════════════════════════════════════════════════════════════

fn inactive_enter(ctx: &mut ZoneContext) {
    ctx.commands.edge_interrupt = false;
    ctx.commands.clock = false;
    ctx.delay_remaining = 0;
    ctx.alarm_remaining = 0;
}

// ═══════════════════════════════════════════════════════════════════════════
//  ACTIVE — armed, watching the line
// ═══════════════════════════════════════════════════════════════════════════

fn active_enter(ctx: &mut ZoneContext) {
    ctx.commands.edge_interrupt = true;
    ctx.commands.clock = false;
    ctx.delay_remaining = ctx.config.delay_secs;
    ctx.alarm_remaining = 0;
}

fn active_edge(ctx: &mut ZoneContext, rising: bool) -> Option<ZoneState> {
    if !rising {
        return None;
    }

    if ctx.config.delay_secs == 0 {
        let next = delay_elapsed(ctx);
        return (next != ZoneState::Active).then_some(next);
    }

    info!(
        "zone {}: motion detected, alarm in {}s",
        ctx.zone, ctx.config.delay_secs
    );
    Some(ZoneState::Delayed)
}

// ═══════════════════════════════════════════════════════════════════════════
//  DELAYED — motion seen, counting down the arm delay
// ═══════════════════════════════════════════════════════════════════════════

fn delayed_enter(ctx: &mut ZoneContext) {
    ctx.commands.edge_interrupt = true;
    ctx.commands.clock = true;
    ctx.delay_remaining = ctx.config.delay_secs;
}

fn delayed_edge(ctx: &mut ZoneContext, rising: bool) -> Option<ZoneState> {
    if rising {
        return None;
    }
    info!(
        "zone {}: motion ended with {}s left, alarm cancelled",
        ctx.zone, ctx.delay_remaining
    );
    Some(ZoneState::Active)
}

fn delayed_tick(ctx: &mut ZoneContext) -> Option<ZoneState> {
    ctx.delay_remaining = ctx.delay_remaining.saturating_sub(1);
    if ctx.delay_remaining == 0 {
        return Some(delay_elapsed(ctx));
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  ALARMED — tone sounding for the configured duration
// ═══════════════════════════════════════════════════════════════════════════

fn alarmed_enter(ctx: &mut ZoneContext) {
    ctx.commands.edge_interrupt = true;
    ctx.commands.clock = true;
    ctx.delay_remaining = 0;
    ctx.alarm_remaining = ctx.config.alarm_duration_secs;
    ctx.request_tone(ToneCommand::Start(ctx.config.alarm_pulse));
    warn!(
        "zone {}: ALARM for {}s",
        ctx.zone, ctx.config.alarm_duration_secs
    );
}

fn alarmed_exit(ctx: &mut ZoneContext) {
    ctx.request_tone(ToneCommand::Stop);
    ctx.alarm_remaining = 0;
}

fn alarmed_tick(ctx: &mut ZoneContext) -> Option<ZoneState> {
    ctx.alarm_remaining = ctx.alarm_remaining.saturating_sub(1);
    if ctx.alarm_remaining == 0 {
        info!("zone {}: alarm period over, rearming", ctx.zone);
        return Some(ZoneState::Active);
    }
    None
}
