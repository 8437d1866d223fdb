//! Fuzz target: arbitrary edge / tick / arm / disarm sequences on one zone.
//!
//! The first two bytes pick the delay and duration; every following byte
//! is one input.  Asserts the tone sounds exactly while ALARMED and the
//! clock runs exactly while counting.
//!
//! cargo fuzz run fuzz_zone_events

#![no_main]

use homesec::app::ports::{InputLine, TickClock, TonePort};
use homesec::config::{ZoneConfig, MAX_ALARM_DELAY_SECS, MAX_ALARM_DURATION_SECS};
use homesec::zone::{ZoneId, ZoneMonitor, ZoneState};
use libfuzzer_sys::fuzz_target;

#[derive(Default)]
struct Line(bool);

impl InputLine for Line {
    fn is_high(&mut self) -> bool {
        false
    }
    fn clear_pending(&mut self) {}
    fn enable_edge_interrupt(&mut self) {
        self.0 = true;
    }
    fn disable_edge_interrupt(&mut self) {
        self.0 = false;
    }
    fn edge_interrupt_enabled(&self) -> bool {
        self.0
    }
}

#[derive(Default)]
struct Clock {
    on: bool,
    epoch: u32,
}

impl TickClock for Clock {
    fn enable(&mut self) {
        if !self.on {
            self.epoch = self.epoch.wrapping_add(1);
        }
        self.on = true;
    }
    fn disable(&mut self) {
        self.on = false;
    }
    fn is_enabled(&self) -> bool {
        self.on
    }
    fn epoch(&self) -> u32 {
        self.epoch
    }
}

#[derive(Default)]
struct Tone(bool);

impl TonePort for Tone {
    fn start(&mut self, _pulse: u32) {
        self.0 = true;
    }
    fn stop(&mut self) {
        self.0 = false;
    }
}

fuzz_target!(|data: &[u8]| {
    let [d, a, inputs @ ..] = data else { return };
    let cfg = match ZoneConfig::new(d % (MAX_ALARM_DELAY_SECS + 1), a % (MAX_ALARM_DURATION_SECS + 1)) {
        Ok(cfg) => cfg,
        Err(_) => return,
    };

    let mut zone = ZoneMonitor::new(ZoneId(0), cfg, Line::default(), Clock::default());
    let mut tone = Tone::default();

    for &b in inputs {
        match b % 6 {
            0 => { zone.on_edge(true, &mut tone); }
            1 => { zone.on_edge(false, &mut tone); }
            2 => { zone.activate(); }
            3 => { zone.deactivate(&mut tone); }
            4 => {
                // High bits pick how many periods old the tick is.
                let epoch = zone.clock().epoch().wrapping_sub(u32::from(b >> 4));
                zone.on_queued_tick(epoch, &mut tone);
            }
            _ => { zone.on_tick(&mut tone); }
        }
        let state = zone.state();
        assert_eq!(tone.0, state == ZoneState::Alarmed);
        assert_eq!(zone.clock().is_enabled(), state.is_counting());
    }
});
