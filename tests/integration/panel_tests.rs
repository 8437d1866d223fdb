//! End-to-end panel behaviour: queue → panel → zones → tone.

use homesec::app::commands::PanelCommand;
use homesec::app::events::AppEvent;
use homesec::config::ZoneConfig;
use homesec::drivers::tone::LONG_PULSE;
use homesec::events::{notify_edge, notify_tick, EventQueue};
use homesec::zone::{ZoneId, ZoneState};

use crate::mock_hw::{panel, PwmCall, RecordingSink};

/// Simulate the PIR ISR for `zone` with the line at `level`.
fn pir(panel: &mut crate::mock_hw::MockPanel, queue: &EventQueue, zone: ZoneId, level: bool) {
    let z = panel.zone_mut(zone).unwrap();
    z.line_mut().level = level;
    assert!(z.line().irq, "edge on a masked line");
    notify_edge(queue, zone, z.line_mut());
}

/// Simulate `n` firings of `zone`'s timer.  The clock must be running.
fn timer(panel: &crate::mock_hw::MockPanel, queue: &EventQueue, zone: ZoneId, n: usize) {
    let clock = panel.zone(zone).unwrap().clock();
    assert!(clock.on, "tick from a stopped clock");
    for _ in 0..n {
        notify_tick(queue, zone, clock.starts);
    }
}

#[test]
fn new_panel_is_disarmed_and_silent() {
    let (p, ids) = panel(&[(5, 10), (3, 10)]);
    for id in ids {
        assert_eq!(p.zone_state(id), Some(ZoneState::Inactive));
        let z = p.zone(id).unwrap();
        assert!(!z.line().irq);
        assert!(!z.clock().on);
    }
    assert_eq!(p.tone().output().calls, vec![PwmCall::Width(0)]);
}

#[test]
fn motion_through_queue_raises_alarm_after_delay() {
    let (mut p, ids) = panel(&[(3, 10)]);
    let zone = ids[0];
    let queue = EventQueue::new();
    let mut sink = RecordingSink::default();

    p.handle_command(PanelCommand::ArmAll, &mut sink);
    pir(&mut p, &queue, zone, true);
    p.drain(&queue, &mut sink);
    assert_eq!(p.zone_state(zone), Some(ZoneState::Delayed));
    assert!(p.zone(zone).unwrap().clock().on);

    timer(&p, &queue, zone, 2);
    p.drain(&queue, &mut sink);
    assert_eq!(p.tone().output().starts(), 0);

    timer(&p, &queue, zone, 1);
    p.drain(&queue, &mut sink);
    assert_eq!(p.zone_state(zone), Some(ZoneState::Alarmed));
    assert_eq!(p.tone().output().starts(), 1);
    assert_eq!(p.tone().pulse(), LONG_PULSE);
    assert_eq!(sink.alarms_raised(), 1);
}

#[test]
fn motion_ending_during_delay_cancels() {
    let (mut p, ids) = panel(&[(3, 10)]);
    let zone = ids[0];
    let queue = EventQueue::new();
    let mut sink = RecordingSink::default();

    p.handle_command(PanelCommand::ArmAll, &mut sink);
    pir(&mut p, &queue, zone, true);
    p.drain(&queue, &mut sink);
    timer(&p, &queue, zone, 2);
    pir(&mut p, &queue, zone, false);
    // Fires after the line fell but before the loop stopped the clock.
    timer(&p, &queue, zone, 1);
    p.drain(&queue, &mut sink);

    assert_eq!(p.zone_state(zone), Some(ZoneState::Active));
    assert!(!p.zone(zone).unwrap().clock().on);
    assert_eq!(p.zone(zone).unwrap().remaining(), 3);
    assert_eq!(sink.alarms_raised(), 0);
}

#[test]
fn tick_from_cancelled_countdown_does_not_shorten_the_next() {
    let (mut p, ids) = panel(&[(2, 10)]);
    let zone = ids[0];
    let queue = EventQueue::new();
    let mut sink = RecordingSink::default();

    p.handle_command(PanelCommand::ArmAll, &mut sink);
    pir(&mut p, &queue, zone, true);
    p.drain(&queue, &mut sink);
    assert_eq!(p.zone_state(zone), Some(ZoneState::Delayed));

    // The line drops and rises again, and the old period's timer fires
    // before any of it is drained.
    pir(&mut p, &queue, zone, false);
    pir(&mut p, &queue, zone, true);
    timer(&p, &queue, zone, 1);
    p.drain(&queue, &mut sink);

    assert_eq!(p.zone_state(zone), Some(ZoneState::Delayed));
    assert_eq!(p.zone(zone).unwrap().remaining(), 2);

    timer(&p, &queue, zone, 2);
    p.drain(&queue, &mut sink);
    assert_eq!(p.zone_state(zone), Some(ZoneState::Alarmed));
    assert_eq!(sink.alarms_raised(), 1);
}

#[test]
fn one_second_delay_is_not_skipped_by_a_stale_tick() {
    let (mut p, ids) = panel(&[(1, 10)]);
    let zone = ids[0];
    let queue = EventQueue::new();
    let mut sink = RecordingSink::default();

    p.handle_command(PanelCommand::ArmAll, &mut sink);
    pir(&mut p, &queue, zone, true);
    p.drain(&queue, &mut sink);
    pir(&mut p, &queue, zone, false);
    pir(&mut p, &queue, zone, true);
    timer(&p, &queue, zone, 1);
    p.drain(&queue, &mut sink);

    assert_eq!(p.zone_state(zone), Some(ZoneState::Delayed));
    assert_eq!(p.tone().output().starts(), 0);
}

#[test]
fn alarm_stops_after_duration_and_rearms() {
    let (mut p, ids) = panel(&[(1, 10)]);
    let zone = ids[0];
    let queue = EventQueue::new();
    let mut sink = RecordingSink::default();

    p.handle_command(PanelCommand::ArmAll, &mut sink);
    pir(&mut p, &queue, zone, true);
    p.drain(&queue, &mut sink);
    timer(&p, &queue, zone, 1);
    p.drain(&queue, &mut sink);
    assert_eq!(p.zone_state(zone), Some(ZoneState::Alarmed));

    timer(&p, &queue, zone, 9);
    p.drain(&queue, &mut sink);
    assert_eq!(p.tone().output().stops(), 0);

    timer(&p, &queue, zone, 1);
    p.drain(&queue, &mut sink);
    assert_eq!(p.zone_state(zone), Some(ZoneState::Active));
    assert_eq!(p.tone().output().stops(), 1);
    assert!(!p.tone().output().running());
    assert_eq!(sink.alarms_cleared(), 1);
    assert!(p.zone(zone).unwrap().line().irq);
}

#[test]
fn disarm_all_silences_alarm() {
    let (mut p, ids) = panel(&[(1, 30), (5, 30)]);
    let queue = EventQueue::new();
    let mut sink = RecordingSink::default();

    p.handle_command(PanelCommand::ArmAll, &mut sink);
    pir(&mut p, &queue, ids[0], true);
    p.drain(&queue, &mut sink);
    timer(&p, &queue, ids[0], 1);
    p.drain(&queue, &mut sink);
    assert!(p.any_alarmed());

    p.handle_command(PanelCommand::DisarmAll, &mut sink);
    assert!(!p.any_alarmed());
    assert!(!p.tone().output().running());
    for &id in &ids {
        let z = p.zone(id).unwrap();
        assert_eq!(z.state(), ZoneState::Inactive);
        assert!(!z.line().irq);
        assert!(!z.clock().on);
    }
}

#[test]
fn zones_count_down_independently() {
    let (mut p, ids) = panel(&[(2, 5), (4, 5)]);
    let (area, barrier) = (ids[0], ids[1]);
    let queue = EventQueue::new();
    let mut sink = RecordingSink::default();

    p.handle_command(PanelCommand::ArmAll, &mut sink);
    pir(&mut p, &queue, area, true);
    pir(&mut p, &queue, barrier, true);
    p.drain(&queue, &mut sink);
    for _ in 0..2 {
        timer(&p, &queue, area, 1);
        timer(&p, &queue, barrier, 1);
    }
    p.drain(&queue, &mut sink);

    assert_eq!(p.zone_state(area), Some(ZoneState::Alarmed));
    assert_eq!(p.zone_state(barrier), Some(ZoneState::Delayed));
    assert_eq!(p.zone(barrier).unwrap().remaining(), 2);
}

#[test]
fn rising_edge_while_alarmed_does_not_restart_tone() {
    let (mut p, ids) = panel(&[(1, 10)]);
    let zone = ids[0];
    let queue = EventQueue::new();
    let mut sink = RecordingSink::default();

    p.handle_command(PanelCommand::Arm(zone), &mut sink);
    pir(&mut p, &queue, zone, true);
    p.drain(&queue, &mut sink);
    timer(&p, &queue, zone, 1);
    pir(&mut p, &queue, zone, false);
    pir(&mut p, &queue, zone, true);
    p.drain(&queue, &mut sink);

    assert_eq!(p.zone_state(zone), Some(ZoneState::Alarmed));
    assert_eq!(p.tone().output().starts(), 1);
    assert_eq!(p.zone(zone).unwrap().remaining(), 10);
}

#[test]
fn arm_then_disarm_never_touches_tone() {
    let (mut p, ids) = panel(&[(5, 10)]);
    let mut sink = RecordingSink::default();

    p.handle_command(PanelCommand::Arm(ids[0]), &mut sink);
    p.handle_command(PanelCommand::Disarm(ids[0]), &mut sink);

    assert_eq!(p.tone().output().calls, vec![PwmCall::Width(0)]);
    assert_eq!(
        sink.events,
        vec![
            AppEvent::ZoneChanged {
                zone: ids[0],
                from: ZoneState::Inactive,
                to: ZoneState::Active
            },
            AppEvent::ZoneChanged {
                zone: ids[0],
                from: ZoneState::Active,
                to: ZoneState::Inactive
            },
        ]
    );
}

#[test]
fn reconfigured_delay_takes_effect_on_next_arm() {
    let (mut p, ids) = panel(&[(5, 10)]);
    let zone = ids[0];
    let queue = EventQueue::new();
    let mut sink = RecordingSink::default();

    let cfg = ZoneConfig::new(1, 2).unwrap();
    assert!(p.handle_command(PanelCommand::Reconfigure(zone, cfg), &mut sink));
    p.handle_command(PanelCommand::ArmAll, &mut sink);
    pir(&mut p, &queue, zone, true);
    p.drain(&queue, &mut sink);
    timer(&p, &queue, zone, 1);
    p.drain(&queue, &mut sink);

    assert_eq!(p.zone_state(zone), Some(ZoneState::Alarmed));
    assert_eq!(p.zone(zone).unwrap().remaining(), 2);
}

#[test]
fn edge_acknowledged_before_level_is_read() {
    let (mut p, ids) = panel(&[(5, 10)]);
    let queue = EventQueue::new();
    let mut sink = RecordingSink::default();
    p.handle_command(PanelCommand::ArmAll, &mut sink);

    pir(&mut p, &queue, ids[0], true);
    assert_eq!(p.zone(ids[0]).unwrap().line().acks, 1);
}
