//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the rules that sit above a single zone: routing
//! queued events to their zone, arming and disarming, and sharing the one
//! tone generator.  All interaction with hardware happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
