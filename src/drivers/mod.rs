//! Peripheral drivers and one-shot hardware initialisation.

pub mod buzzer;
pub mod hw_init;
pub mod hw_timer;
pub mod pir;
pub mod tone;
