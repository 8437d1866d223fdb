//! Mock hardware for integration tests.
//!
//! Records every peripheral call so tests can assert on the full command
//! history without touching real GPIO/PWM/timer registers.

use homesec::app::events::AppEvent;
use homesec::app::ports::{EventSink, InputLine, PwmChannel, TickClock};
use homesec::app::service::AlarmPanel;
use homesec::config::ZoneConfig;
use homesec::zone::ZoneId;

// ── PIR line ──────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MockLine {
    pub level: bool,
    pub irq: bool,
    pub acks: u32,
}

impl InputLine for MockLine {
    fn is_high(&mut self) -> bool {
        self.level
    }

    fn clear_pending(&mut self) {
        self.acks += 1;
    }

    fn enable_edge_interrupt(&mut self) {
        self.irq = true;
    }

    fn disable_edge_interrupt(&mut self) {
        self.irq = false;
    }

    fn edge_interrupt_enabled(&self) -> bool {
        self.irq
    }
}

// ── Tick clock ────────────────────────────────────────────────

/// Counts its periods; the period number doubles as the tick epoch.
#[derive(Debug, Default)]
pub struct MockClock {
    pub on: bool,
    pub starts: u32,
}

impl TickClock for MockClock {
    fn enable(&mut self) {
        if !self.on {
            self.starts += 1;
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
        self.starts
    }
}

// ── PWM channel ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmCall {
    Width(u32),
    Start,
    Stop,
}

#[derive(Debug, Default)]
pub struct MockPwm {
    pub calls: Vec<PwmCall>,
}

#[allow(dead_code)]
impl MockPwm {
    pub fn starts(&self) -> usize {
        self.calls.iter().filter(|c| **c == PwmCall::Start).count()
    }

    pub fn stops(&self) -> usize {
        self.calls.iter().filter(|c| **c == PwmCall::Stop).count()
    }

    /// Whether the last start/stop left the output running.
    pub fn running(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                PwmCall::Start => Some(true),
                PwmCall::Stop => Some(false),
                PwmCall::Width(_) => None,
            })
            .unwrap_or(false)
    }
}

impl PwmChannel for MockPwm {
    fn set_width(&mut self, pulse: u32) {
        self.calls.push(PwmCall::Width(pulse));
    }

    fn start(&mut self) {
        self.calls.push(PwmCall::Start);
    }

    fn stop(&mut self) {
        self.calls.push(PwmCall::Stop);
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn alarms_raised(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::AlarmRaised(_)))
            .count()
    }

    pub fn alarms_cleared(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::AlarmCleared(_)))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}

// ── Panel helper ──────────────────────────────────────────────

pub type MockPanel = AlarmPanel<MockLine, MockClock, MockPwm, 4>;

/// A panel with one zone per `(delay, duration)` pair.
pub fn panel(zones: &[(u8, u8)]) -> (MockPanel, Vec<ZoneId>) {
    let mut p = MockPanel::new(MockPwm::default());
    let ids = zones
        .iter()
        .map(|&(d, a)| {
            p.add_zone(
                ZoneConfig::new(d, a).unwrap(),
                MockLine::default(),
                MockClock::default(),
            )
            .unwrap()
        })
        .collect();
    (p, ids)
}
