//! Per-zone 1 Hz tick source on ESP-IDF's esp_timer API.
//!
//! Each zone owns one periodic timer whose callback pushes a
//! [`ZoneEvent::Tick`](crate::events::ZoneEvent) into the event queue.
//! Timer callbacks execute in the ESP timer task context (not ISR).
//!
//! On host/test the timer only records whether it is running; tests push
//! ticks themselves.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::app::ports::TickClock;
use crate::events::EventQueue;
use crate::zone::ZoneId;

use super::hw_init::HwInitError;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// What the timer callback needs, handed over as its argument.
///
/// `epoch` is written by the owning [`ZoneTimer`] before each start and
/// read by the callback, so every tick is stamped with its period.
pub struct TickBinding {
    pub queue: &'static EventQueue,
    pub zone: ZoneId,
    epoch: AtomicU32,
}

impl TickBinding {
    pub const fn new(queue: &'static EventQueue, zone: ZoneId) -> Self {
        Self {
            queue,
            zone,
            epoch: AtomicU32::new(0),
        }
    }

    pub fn epoch(&self) -> u32 {
        self.epoch.load(Ordering::Acquire)
    }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn zone_tick_cb(arg: *mut core::ffi::c_void) {
    // SAFETY: arg is the &'static TickBinding passed to esp_timer_create.
    let binding = unsafe { &*(arg as *const TickBinding) };
    crate::events::notify_tick(binding.queue, binding.zone, binding.epoch());
}

pub struct ZoneTimer {
    #[cfg(target_os = "espidf")]
    handle: esp_timer_handle_t,
    binding: &'static TickBinding,
    period_us: u64,
    running: bool,
}

impl ZoneTimer {
    /// Create a stopped periodic timer for `binding.zone`.
    #[cfg(target_os = "espidf")]
    pub fn new(binding: &'static TickBinding, period_ms: u32) -> Result<Self, HwInitError> {
        let args = esp_timer_create_args_t {
            callback: Some(zone_tick_cb),
            arg: core::ptr::from_ref(binding).cast_mut().cast(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: c"zone_tick".as_ptr(),
            skip_unhandled_events: true,
        };
        let mut handle: esp_timer_handle_t = core::ptr::null_mut();
        // SAFETY: args outlives the call; binding outlives the timer.
        let ret = unsafe { esp_timer_create(&args, &mut handle) };
        if ret != ESP_OK as esp_err_t {
            return Err(HwInitError::TimerCreateFailed(ret));
        }
        Ok(Self {
            handle,
            binding,
            period_us: u64::from(period_ms) * 1_000,
            running: false,
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(binding: &'static TickBinding, period_ms: u32) -> Result<Self, HwInitError> {
        Ok(Self {
            binding,
            period_us: u64::from(period_ms) * 1_000,
            running: false,
        })
    }

    pub fn zone(&self) -> ZoneId {
        self.binding.zone
    }

    pub fn period_us(&self) -> u64 {
        self.period_us
    }

    #[cfg(target_os = "espidf")]
    fn start_hw(&mut self) -> bool {
        // SAFETY: handle was created in new() and is never deleted.
        let ret = unsafe { esp_timer_start_periodic(self.handle, self.period_us) };
        if ret != ESP_OK as esp_err_t {
            log::error!("hw_timer: zone {} start failed (rc={})", self.binding.zone, ret);
            return false;
        }
        true
    }

    #[cfg(not(target_os = "espidf"))]
    fn start_hw(&mut self) -> bool {
        true
    }

    #[cfg(target_os = "espidf")]
    fn stop_hw(&mut self) {
        // SAFETY: as above.  Stopping a stopped timer returns
        // ESP_ERR_INVALID_STATE, which is harmless here.
        unsafe {
            esp_timer_stop(self.handle);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn stop_hw(&mut self) {}
}

impl TickClock for ZoneTimer {
    fn enable(&mut self) {
        if !self.running {
            // Bump before starting so the first tick of the new period
            // already carries the new epoch.
            self.binding.epoch.fetch_add(1, Ordering::AcqRel);
            self.running = self.start_hw();
        }
    }

    fn disable(&mut self) {
        self.stop_hw();
        self.running = false;
    }

    fn is_enabled(&self) -> bool {
        self.running
    }

    fn epoch(&self) -> u32 {
        self.binding.epoch()
    }
}
