//! Port traits — the boundary between zone logic and the outside world.
//!
//! ```text
//!   Platform ──▶ Port trait ──▶ ZoneMonitor / ToneController / AlarmPanel
//! ```
//!
//! The sensing line, the 1 Hz tick source and the PWM channel are all
//! borrowed peripherals: the domain never owns a register, it only drives
//! these traits.  The ESP32 drivers (`drivers::pir`, `drivers::buzzer`,
//! `drivers::hw_timer`), the embedded-hal adapters and the test mocks
//! implement them.

// ───────────────────────────────────────────────────────────────
// Digital input (PIR sensing line)
// ───────────────────────────────────────────────────────────────

/// A digital input that raises an interrupt on every edge.
///
/// The edge interrupt carries no direction; whoever handles it must
/// acknowledge it with [`clear_pending`](Self::clear_pending) and *then*
/// sample [`is_high`](Self::is_high).
pub trait InputLine {
    /// Instantaneous line level.
    fn is_high(&mut self) -> bool;

    /// Acknowledge a pending edge interrupt.
    fn clear_pending(&mut self);

    fn enable_edge_interrupt(&mut self);

    fn disable_edge_interrupt(&mut self);

    fn edge_interrupt_enabled(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Periodic tick source
// ───────────────────────────────────────────────────────────────

/// A 1 Hz periodic source dedicated to one zone.
///
/// Every `enable` that actually starts the clock begins a new period and
/// bumps [`epoch`](Self::epoch).  Queued ticks carry the epoch they fired
/// in, so a tick from a stopped period can be told apart from a fresh one.
pub trait TickClock {
    fn enable(&mut self);

    fn disable(&mut self);

    fn is_enabled(&self) -> bool;

    /// Current period number.  Wraps.
    fn epoch(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// PWM output (buzzer)
// ───────────────────────────────────────────────────────────────

/// One PWM output channel.  Widths are in `0..MAX_PULSE` units.
pub trait PwmChannel {
    /// Update the compare value.  Does not start or stop the output.
    fn set_width(&mut self, pulse: u32);

    fn start(&mut self);

    fn stop(&mut self);

    /// Select one-shot (`true`) or continuous (`false`) generation.
    /// Channels without one-pulse support ignore this.
    fn set_single_pulse(&mut self, _enabled: bool) {}
}

// ───────────────────────────────────────────────────────────────
// Tone port (zone → shared tone generator)
// ───────────────────────────────────────────────────────────────

/// What a zone needs from the shared tone generator.  Last writer wins.
pub trait TonePort {
    /// Start continuous output at `pulse`.
    fn start(&mut self, pulse: u32);

    /// Silence the output.
    fn stop(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / console)
// ───────────────────────────────────────────────────────────────

/// The panel emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
