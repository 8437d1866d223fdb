//! Interrupt-driven event queue.
//!
//! Events are produced by:
//! - GPIO ISRs (PIR line edges, one per zone)
//! - Timer callbacks (1 Hz tick, one timer per zone)
//!
//! Events are consumed by the main loop, which hands them one at a time
//! to the [`AlarmPanel`](crate::app::service::AlarmPanel).  That single
//! consumer is what keeps a zone's edge and tick handlers from ever
//! running concurrently.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ GPIO ISR    │────▶│  EventQueue  │────▶│  Main Loop   │
//! │ Timer cb    │────▶│  (bounded)   │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::app::ports::InputLine;
use crate::zone::ZoneId;

/// Maximum number of pending events.
pub const EVENT_QUEUE_CAP: usize = 16;

/// Something happened to one zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneEvent {
    /// The PIR line changed level.  `rising` is the level sampled after
    /// the interrupt was acknowledged.
    Edge { zone: ZoneId, rising: bool },
    /// The zone's 1 Hz clock fired during clock period `epoch`.
    Tick { zone: ZoneId, epoch: u32 },
}

impl ZoneEvent {
    pub fn zone(&self) -> ZoneId {
        match *self {
            Self::Edge { zone, .. } | Self::Tick { zone, .. } => zone,
        }
    }
}

/// Bounded multi-producer, single-consumer event queue.
///
/// Producers may run in interrupt context; every producer-side method is
/// non-blocking and allocation-free.
pub struct EventQueue {
    channel: Channel<CriticalSectionRawMutex, ZoneEvent, EVENT_QUEUE_CAP>,
    dropped: AtomicU32,
}

impl EventQueue {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
            dropped: AtomicU32::new(0),
        }
    }

    /// Push an event into the queue.
    /// Safe to call from ISR context.
    /// Returns `false` if the queue is full (event dropped).
    pub fn push_event(&self, event: ZoneEvent) -> bool {
        if self.channel.try_send(event).is_ok() {
            true
        } else {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            false
        }
    }

    /// Pop the next event.  Returns `None` if the queue is empty.
    pub fn pop_event(&self) -> Option<ZoneEvent> {
        self.channel.try_receive().ok()
    }

    /// Drain all pending events into a callback, in FIFO order.
    /// Returns how many were handled.
    pub fn drain_events(&self, mut handler: impl FnMut(ZoneEvent)) -> usize {
        let mut n = 0;
        while let Some(event) = self.pop_event() {
            handler(event);
            n += 1;
        }
        n
    }

    pub fn queue_is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    /// Number of pending events.
    pub fn queue_len(&self) -> usize {
        self.channel.len()
    }

    /// Discard everything pending.
    pub fn clear(&self) {
        self.channel.clear();
    }

    /// Events lost to overflow since boot.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

// ── ISR helpers ───────────────────────────────────────────────

/// Edge-interrupt body for one zone: acknowledge, then sample, then
/// enqueue.  Sampling after the acknowledge means a second edge that
/// lands in between raises a fresh interrupt instead of being lost.
pub fn notify_edge(queue: &EventQueue, zone: ZoneId, line: &mut impl InputLine) -> bool {
    line.clear_pending();
    let rising = line.is_high();
    queue.push_event(ZoneEvent::Edge { zone, rising })
}

/// Tick-callback body for one zone.  `epoch` is the clock period the
/// tick belongs to.
pub fn notify_tick(queue: &EventQueue, zone: ZoneId, epoch: u32) -> bool {
    queue.push_event(ZoneEvent::Tick { zone, epoch })
}
