//! PIR motion sensor line.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads the GPIO level and masks/unmasks its edge interrupt
//! via hw_init.  On host/test: tracks the interrupt mask in-memory and
//! reads a simulated level.

use crate::app::ports::InputLine;
use crate::drivers::hw_init;

pub struct PirLine {
    gpio: i32,
    irq_enabled: bool,
}

impl PirLine {
    /// A line whose interrupt starts masked.
    pub fn new(gpio: i32) -> Self {
        hw_init::gpio_set_interrupt(gpio, false);
        Self {
            gpio,
            irq_enabled: false,
        }
    }

    /// Borrow-free handle used inside the edge ISR.  Touches no registers
    /// on construction.
    pub fn isr_view(gpio: i32) -> Self {
        Self {
            gpio,
            irq_enabled: true,
        }
    }

    pub fn gpio(&self) -> i32 {
        self.gpio
    }
}

impl InputLine for PirLine {
    fn is_high(&mut self) -> bool {
        hw_init::gpio_read(self.gpio)
    }

    fn clear_pending(&mut self) {
        // The ESP-IDF ISR service clears the GPIO status bit before it
        // calls the per-pin handler.
    }

    fn enable_edge_interrupt(&mut self) {
        hw_init::gpio_set_interrupt(self.gpio, true);
        self.irq_enabled = true;
    }

    fn disable_edge_interrupt(&mut self) {
        hw_init::gpio_set_interrupt(self.gpio, false);
        self.irq_enabled = false;
    }

    fn edge_interrupt_enabled(&self) -> bool {
        self.irq_enabled
    }
}
