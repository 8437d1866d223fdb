//! GPIO / peripheral pin assignments for the alarm board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// PIR motion sensors (one per zone)
// ---------------------------------------------------------------------------

/// AREA zone PIR (room coverage).  HIGH = motion present.
pub const AREA_PIR_GPIO: i32 = 4;
/// BARRIER zone PIR (door / window).  HIGH = motion present.
pub const BARRIER_PIR_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Buzzer (passive piezo on LEDC)
// ---------------------------------------------------------------------------

pub const BUZZER_PWM_GPIO: i32 = 18;
/// Audible carrier for the passive buzzer.
pub const BUZZER_PWM_FREQ_HZ: u32 = 2_000;
/// LEDC duty resolution (bits).  10-bit gives 0 – 1023 duty levels.
pub const BUZZER_PWM_RESOLUTION_BITS: u32 = 10;
