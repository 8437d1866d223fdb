//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements         | Connects to                     |
//! |------------|--------------------|---------------------------------|
//! | `hal`      | PwmChannel         | any embedded-hal `SetDutyCycle` |
//! |            | InputLine          | any embedded-hal `InputPin`     |
//! | `log_sink` | EventSink          | Serial log output               |
//!
//! The ESP32 peripherals themselves (`PirLine`, `LedcBuzzer`,
//! `ZoneTimer`) implement the ports directly in [`crate::drivers`].

pub mod hal;
pub mod log_sink;
