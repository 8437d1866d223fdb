//! HomeSec Firmware — Main Entry Point
//!
//! Two PIR zones (AREA, BARRIER) share one buzzer.  Interrupts and timer
//! callbacks only enqueue; everything else happens in the drain loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │  PIR ISR (per zone) ──┐                                        │
//! │                       ├──▶ EventQueue ──▶ AlarmPanel ──▶ Log   │
//! │  esp_timer (per zone)─┘                    │                   │
//! │                                            ▼                   │
//! │                                   ToneController ──▶ LEDC      │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Context, Result};
use log::{info, warn};

use homesec::adapters::log_sink::LogEventSink;
use homesec::app::commands::PanelCommand;
use homesec::app::service::AlarmPanel;
use homesec::config::SystemConfig;
use homesec::drivers::buzzer::LedcBuzzer;
use homesec::drivers::hw_init::{self, IsrBinding};
use homesec::drivers::hw_timer::{TickBinding, ZoneTimer};
use homesec::drivers::pir::PirLine;
use homesec::error::Error;
use homesec::events::EventQueue;
use homesec::pins;
use homesec::zone::ZoneId;

/// Zones on this board, in id order.
const ZONE_GPIOS: [(&str, i32); 2] = [
    ("area", pins::AREA_PIR_GPIO),
    ("barrier", pins::BARRIER_PIR_GPIO),
];

/// Idle time between drain passes.
const LOOP_IDLE_MS: u32 = 10;

type Panel = AlarmPanel<PirLine, ZoneTimer, LedcBuzzer, { ZONE_GPIOS.len() }>;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  HomeSec v{}                         ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = SystemConfig::default();
    config.validate().map_err(Error::from).context("system config")?;

    // ── 3. Peripherals ────────────────────────────────────────
    let gpios = ZONE_GPIOS.map(|(_, gpio)| gpio);
    hw_init::init_peripherals(&gpios).context("peripheral init")?;
    hw_init::init_isr_service().context("ISR service")?;

    let queue: &'static EventQueue = Box::leak(Box::new(EventQueue::new()));

    // ── 4. Panel ──────────────────────────────────────────────
    let mut panel = Panel::new(LedcBuzzer::new(hw_init::LEDC_CH_BUZZER));
    let zone_configs = [config.area_zone(), config.barrier_zone()];

    for (&(name, gpio), zone_config) in ZONE_GPIOS.iter().zip(zone_configs) {
        let zone = ZoneId(panel.zone_count() as u8);

        let tick: &'static TickBinding = Box::leak(Box::new(TickBinding::new(queue, zone)));
        let clock = ZoneTimer::new(tick, config.tick_period_ms).context("zone timer")?;

        let isr: &'static IsrBinding = Box::leak(Box::new(IsrBinding { queue, zone, gpio }));
        hw_init::register_zone_isr(isr).context("zone ISR")?;

        let id = panel
            .add_zone(zone_config, PirLine::new(gpio), clock)
            .context("add zone")?;
        info!("zone {} = {} (GPIO{})", id, name, gpio);
    }

    // ── 5. Arm and run ────────────────────────────────────────
    let mut sink = LogEventSink::new();
    panel.handle_command(PanelCommand::ArmAll, &mut sink);

    info!("System ready. Entering event loop.");

    let mut dropped_seen = 0;
    loop {
        panel.drain(queue, &mut sink);

        let dropped = queue.dropped();
        if dropped != dropped_seen {
            warn!("event queue overflow: {} events lost", dropped - dropped_seen);
            dropped_seen = dropped;
        }

        esp_idf_svc::hal::delay::FreeRtos::delay_ms(LOOP_IDLE_MS);
    }
}
