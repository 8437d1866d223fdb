//! embedded-hal adapters.
//!
//! Lets any HAL that implements the embedded-hal 1.0 traits stand in for
//! the ESP32 drivers: a `SetDutyCycle` channel becomes a [`PwmChannel`],
//! an `InputPin` becomes an [`InputLine`].  HAL write/read failures are
//! logged and swallowed; the zone logic never sees them.

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::digital::InputPin;
use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::ports::{InputLine, PwmChannel};
use crate::drivers::tone::MAX_PULSE;
use crate::error::PeripheralError;

// ── PWM ───────────────────────────────────────────────────────

/// [`PwmChannel`] over an embedded-hal duty-cycle channel.  The width maps
/// to the fraction `width / MAX_PULSE` of the channel's full scale.
pub struct HalPwm<P: SetDutyCycle> {
    pwm: P,
    width: u32,
    running: bool,
    failures: u32,
}

impl<P: SetDutyCycle> HalPwm<P> {
    pub fn new(mut pwm: P) -> Self {
        let failures = u32::from(pwm.set_duty_cycle_fully_off().is_err());
        Self {
            pwm,
            width: 0,
            running: false,
            failures,
        }
    }

    pub fn inner(&self) -> &P {
        &self.pwm
    }

    /// Writes the HAL rejected since construction.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    fn write(&mut self) {
        let result = if self.running && self.width > 0 {
            self.pwm
                .set_duty_cycle_fraction(self.width.min(MAX_PULSE) as u16, MAX_PULSE as u16)
        } else {
            self.pwm.set_duty_cycle_fully_off()
        };
        if let Err(e) = result {
            self.failures = self.failures.saturating_add(1);
            warn!("{}: {:?}", PeripheralError::PwmWriteFailed, e);
        }
    }
}

impl<P: SetDutyCycle> PwmChannel for HalPwm<P> {
    fn set_width(&mut self, pulse: u32) {
        self.width = pulse;
        if self.running {
            self.write();
        }
    }

    fn start(&mut self) {
        self.running = true;
        self.write();
    }

    fn stop(&mut self) {
        self.running = false;
        self.write();
    }
}

// ── Digital input ─────────────────────────────────────────────

/// [`InputLine`] over an embedded-hal input pin.
///
/// Plain HAL pins have no interrupt control, so the edge interrupt is a
/// software gate: the platform's pin-change handler checks
/// [`gate_open`](Self::gate_open) before it enqueues anything.
pub struct HalLine<P: InputPin> {
    pin: P,
    gate: AtomicBool,
}

impl<P: InputPin> HalLine<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            gate: AtomicBool::new(false),
        }
    }

    /// Readable from interrupt context through a shared reference.
    pub fn gate_open(&self) -> bool {
        self.gate.load(Ordering::Acquire)
    }

    pub fn inner_mut(&mut self) -> &mut P {
        &mut self.pin
    }
}

impl<P: InputPin> InputLine for HalLine<P> {
    fn is_high(&mut self) -> bool {
        match self.pin.is_high() {
            Ok(level) => level,
            Err(e) => {
                warn!("{}: {:?}", PeripheralError::GpioReadFailed, e);
                false
            }
        }
    }

    fn clear_pending(&mut self) {}

    fn enable_edge_interrupt(&mut self) {
        self.gate.store(true, Ordering::Release);
    }

    fn disable_edge_interrupt(&mut self) {
        self.gate.store(false, Ordering::Release);
    }

    fn edge_interrupt_enabled(&self) -> bool {
        self.gate_open()
    }
}
