//! Timing of a single zone driven tick by tick, without the panel.

use homesec::config::ZoneConfig;
use homesec::drivers::tone::ToneController;
use homesec::zone::{ZoneId, ZoneMonitor, ZoneState};

use crate::mock_hw::{MockClock, MockLine, MockPwm};

fn zone(delay: u8, duration: u8) -> (ZoneMonitor<MockLine, MockClock>, ToneController<MockPwm>) {
    let z = ZoneMonitor::new(
        ZoneId(0),
        ZoneConfig::new(delay, duration).unwrap(),
        MockLine::default(),
        MockClock::default(),
    );
    (z, ToneController::new(MockPwm::default()))
}

#[test]
fn alarm_fires_exactly_after_delay_ticks() {
    for delay in 1..=30u8 {
        let (mut z, mut tone) = zone(delay, 5);
        z.activate();
        z.on_edge(true, &mut tone);
        for _ in 1..delay {
            z.on_tick(&mut tone);
        }
        assert_eq!(z.state(), ZoneState::Delayed, "delay {delay}");
        z.on_tick(&mut tone);
        assert_eq!(z.state(), ZoneState::Alarmed, "delay {delay}");
        assert!(tone.is_playing());
    }
}

#[test]
fn alarm_lasts_exactly_duration_ticks() {
    for duration in 1..=60u8 {
        let (mut z, mut tone) = zone(1, duration);
        z.activate();
        z.on_edge(true, &mut tone);
        z.on_tick(&mut tone);
        for _ in 1..duration {
            z.on_tick(&mut tone);
        }
        assert!(tone.is_playing(), "duration {duration}");
        z.on_tick(&mut tone);
        assert_eq!(z.state(), ZoneState::Active, "duration {duration}");
        assert!(!tone.is_playing());
        assert_eq!(tone.output().stops(), 1);
    }
}

#[test]
fn zero_delay_sounds_on_the_edge() {
    let (mut z, mut tone) = zone(0, 3);
    z.activate();
    let t = z.on_edge(true, &mut tone).unwrap();
    assert!(t.raised_alarm());
    assert!(tone.is_playing());
}

#[test]
fn zero_duration_never_sounds() {
    let (mut z, mut tone) = zone(2, 0);
    z.activate();
    z.on_edge(true, &mut tone);
    z.on_tick(&mut tone);
    z.on_tick(&mut tone);
    assert_eq!(z.state(), ZoneState::Active);
    assert_eq!(tone.output().starts(), 0);
}

#[test]
fn clock_starts_once_per_countdown() {
    let (mut z, mut tone) = zone(2, 2);
    z.activate();
    z.on_edge(true, &mut tone);
    z.on_tick(&mut tone);
    z.on_tick(&mut tone); // → Alarmed, clock stays on
    assert_eq!(z.clock().starts, 1);
    z.on_tick(&mut tone);
    z.on_tick(&mut tone); // → Active
    assert!(!z.clock().on);
}
