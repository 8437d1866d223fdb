//! Passive buzzer on an LEDC channel.
//!
//! Implements [`PwmChannel`] so a [`ToneController`](super::tone::ToneController)
//! can drive it.  The width is held in `0..MAX_PULSE` units and scaled to
//! the LEDC duty resolution on write.
//!
//! On host/test the LEDC write is a no-op and the driver only records state.

use crate::app::ports::PwmChannel;
use crate::drivers::hw_init;
use crate::drivers::tone::MAX_PULSE;
use crate::pins;

const DUTY_MAX: u32 = 1 << pins::BUZZER_PWM_RESOLUTION_BITS;

pub struct LedcBuzzer {
    channel: u32,
    width: u32,
    running: bool,
}

impl LedcBuzzer {
    pub fn new(channel: u32) -> Self {
        hw_init::ledc_set(channel, 0);
        Self {
            channel,
            width: 0,
            running: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// LEDC duty for the current width.
    pub fn hw_duty(&self) -> u32 {
        self.width.min(MAX_PULSE) * DUTY_MAX / MAX_PULSE
    }
}

impl PwmChannel for LedcBuzzer {
    fn set_width(&mut self, pulse: u32) {
        self.width = pulse;
        if self.running {
            hw_init::ledc_set(self.channel, self.hw_duty());
        }
    }

    fn start(&mut self) {
        self.running = true;
        hw_init::ledc_set(self.channel, self.hw_duty());
    }

    fn stop(&mut self) {
        self.running = false;
        hw_init::ledc_set(self.channel, 0);
    }
}
