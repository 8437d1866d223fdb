//! Buzzer tone controller.
//!
//! Drives a variable-duty square wave on one PWM channel.  The integer
//! pulse width (`0..MAX_PULSE`) is the only stored value; the fractional
//! duty cycle is derived from it on demand so the two can never drift.
//!
//! ```text
//!  duty_cycle = pulse / MAX_PULSE        pulse = round(duty_cycle * MAX_PULSE)
//! ```
//!
//! One controller is shared by every zone that can sound an alarm.  There
//! is no queueing: whichever caller wrote last owns the output.
//!
//! ## Ramps
//!
//! [`increase_pulse`](ToneController::increase_pulse) and
//! [`decrease_pulse`](ToneController::decrease_pulse) move the pulse one
//! bounded step per call and clamp at the target, so a caller stepping
//! from a timer gets a monotonic sweep that never overshoots.

use log::debug;

use crate::app::ports::{PwmChannel, TonePort};

/// Full-scale pulse width.  Valid widths are `0..MAX_PULSE`.
pub const MAX_PULSE: u32 = 1000;
/// Short chirp, 10 % duty.
pub const BEEP: u32 = MAX_PULSE / 10;
pub const SHORT_PULSE: u32 = MAX_PULSE * 2 / 10;
pub const MEDIUM_PULSE: u32 = MAX_PULSE * 6 / 10;
pub const LONG_PULSE: u32 = MAX_PULSE * 9 / 10;
/// Largest change a single ramp step may apply.
pub const RAMP_STEP: u32 = 10;

/// Convert a duty cycle in `[0, 1)` to the nearest valid pulse width.
pub fn pulse_of_duty_cycle(duty_cycle: f32) -> u32 {
    if duty_cycle.is_nan() || duty_cycle <= 0.0 {
        return 0;
    }
    let pulse = (duty_cycle * MAX_PULSE as f32).round() as u32;
    pulse.min(MAX_PULSE - 1)
}

/// Convert a pulse width to its duty cycle.
pub fn duty_cycle_of_pulse(pulse: u32) -> f32 {
    pulse as f32 / MAX_PULSE as f32
}

pub struct ToneController<P: PwmChannel> {
    output: P,
    pulse: u32,
    previous_pulse: u32,
    single_pulse_mode: bool,
    playing: bool,
}

impl<P: PwmChannel> ToneController<P> {
    /// Wrap a PWM channel.  The channel is left silent with a zero width.
    pub fn new(mut output: P) -> Self {
        output.set_width(0);
        Self {
            output,
            pulse: 0,
            previous_pulse: 0,
            single_pulse_mode: false,
            playing: false,
        }
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn pulse(&self) -> u32 {
        self.pulse
    }

    pub fn duty_cycle(&self) -> f32 {
        duty_cycle_of_pulse(self.pulse)
    }

    /// Pulse width held immediately before the most recent ramp step.
    pub fn previous_pulse(&self) -> u32 {
        self.previous_pulse
    }

    pub fn is_single_pulse(&self) -> bool {
        self.single_pulse_mode
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn output(&self) -> &P {
        &self.output
    }

    // ── Instant set ───────────────────────────────────────────

    /// Set the width without starting or stopping the output.
    pub fn set_pulse(&mut self, pulse: u32) {
        debug_assert!(pulse < MAX_PULSE, "pulse {pulse} out of range");
        self.pulse = pulse.min(MAX_PULSE - 1);
        self.output.set_width(self.pulse);
    }

    /// Set the width from a duty cycle in `[0, 1)`.
    pub fn set_duty_cycle(&mut self, duty_cycle: f32) {
        debug_assert!(
            (0.0..1.0).contains(&duty_cycle),
            "duty cycle {duty_cycle} out of range"
        );
        self.set_pulse(pulse_of_duty_cycle(duty_cycle));
    }

    /// Write a raw width straight to the channel, bypassing range checks
    /// and ramps.  Calibration use only.
    pub fn change_pulse(&mut self, raw: u16) {
        self.pulse = raw as u32;
        self.output.set_width(self.pulse);
    }

    // ── Playback ──────────────────────────────────────────────

    /// Set the width and start continuous output.
    pub fn play_pulse(&mut self, pulse: u32) {
        self.single_pulse_mode = false;
        self.output.set_single_pulse(false);
        self.set_pulse(pulse);
        self.output.start();
        self.playing = true;
        debug!("tone: playing pulse {}", self.pulse);
    }

    pub fn play_duty_cycle(&mut self, duty_cycle: f32) {
        self.play_pulse(pulse_of_duty_cycle(duty_cycle));
    }

    pub fn play_beep(&mut self) {
        self.play_pulse(BEEP);
    }

    /// Emit a single pulse of the given width instead of a continuous tone.
    pub fn play_single_pulse(&mut self, pulse: u32) {
        self.single_pulse_mode = true;
        self.output.set_single_pulse(true);
        self.set_pulse(pulse);
        self.output.start();
        self.playing = true;
        debug!("tone: single pulse {}", self.pulse);
    }

    /// Zero the width and disable the output.
    pub fn stop(&mut self) {
        self.pulse = 0;
        self.output.set_width(0);
        self.output.stop();
        self.playing = false;
        debug!("tone: stopped");
    }

    // ── Ramps ─────────────────────────────────────────────────

    /// Step the pulse up toward `target`.  Returns `true` once the pulse
    /// is at (or already above) `target`.
    pub fn increase_pulse(&mut self, target: u32) -> bool {
        let target = target.min(MAX_PULSE - 1);
        self.previous_pulse = self.pulse;
        if self.pulse < target {
            let next = (self.pulse + RAMP_STEP).min(target);
            self.set_pulse(next);
        }
        self.pulse >= target
    }

    /// Step the pulse down toward `target`.  Returns `true` once the
    /// pulse is at (or already below) `target`.
    pub fn decrease_pulse(&mut self, target: u32) -> bool {
        let target = target.min(MAX_PULSE - 1);
        self.previous_pulse = self.pulse;
        if self.pulse > target {
            let next = self.pulse.saturating_sub(RAMP_STEP).max(target);
            self.set_pulse(next);
        }
        self.pulse <= target
    }

    /// One ramp step toward `target` in whichever direction applies.
    pub fn ramp_to(&mut self, target: u32) -> bool {
        if target > self.pulse {
            self.increase_pulse(target)
        } else {
            self.decrease_pulse(target)
        }
    }
}

impl<P: PwmChannel> TonePort for ToneController<P> {
    fn start(&mut self, pulse: u32) {
        self.play_pulse(pulse);
    }

    fn stop(&mut self) {
        ToneController::stop(self);
    }
}
