//! Fuzz target: console number entry and configuration blobs.
//!
//! Feeds arbitrary bytes to `parse_delay` / `parse_duration` (as text) and
//! to `SystemConfig::from_bytes` / `from_json`, asserting that nothing
//! panics and that every accepted value is within its limits.
//!
//! cargo fuzz run fuzz_config_input

#![no_main]

use homesec::config::{
    parse_delay, parse_duration, SystemConfig, MAX_ALARM_DELAY_SECS, MAX_ALARM_DURATION_SECS,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = core::str::from_utf8(data) {
        if let Ok(d) = parse_delay(text) {
            assert!(d <= MAX_ALARM_DELAY_SECS);
        }
        if let Ok(a) = parse_duration(text) {
            assert!(a <= MAX_ALARM_DURATION_SECS);
        }
        if let Ok(cfg) = SystemConfig::from_json(text) {
            assert!(cfg.validate().is_ok(), "from_json accepted an invalid config");
        }
    }

    if let Ok(cfg) = SystemConfig::from_bytes(data) {
        assert!(cfg.validate().is_ok(), "from_bytes accepted an invalid config");
    }
});
