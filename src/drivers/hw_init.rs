//! One-shot hardware peripheral initialization.
//!
//! Configures the PIR inputs, the buzzer's LEDC timer/channel and the
//! per-zone GPIO interrupt handlers using raw ESP-IDF sys calls.  Called
//! once from `main()` before the drain loop starts.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::events::EventQueue;
use crate::zone::ZoneId;

#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    LedcInitFailed(i32),
    IsrInstallFailed(i32),
    IsrAddFailed(i32),
    TimerCreateFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed(rc) => write!(f, "LEDC timer/channel config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
            Self::IsrAddFailed(rc) => write!(f, "GPIO ISR handler add failed (rc={})", rc),
            Self::TimerCreateFailed(rc) => write!(f, "esp_timer create failed (rc={})", rc),
        }
    }
}

impl core::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
fn check(ret: esp_err_t, err: fn(i32) -> HwInitError) -> Result<(), HwInitError> {
    if ret == ESP_OK as esp_err_t {
        Ok(())
    } else {
        Err(err(ret))
    }
}

/// Configure every PIR input and the buzzer PWM.
#[cfg(target_os = "espidf")]
pub fn init_peripherals(pir_gpios: &[i32]) -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before any interrupt is enabled.
    unsafe {
        init_pir_inputs(pir_gpios)?;
        init_ledc()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals(pir_gpios: &[i32]) -> Result<(), HwInitError> {
    log::info!("hw_init(sim): {} PIR inputs, init skipped", pir_gpios.len());
    Ok(())
}

// ── GPIO Inputs ───────────────────────────────────────────────

/// PIR lines interrupt on both edges.  The interrupt stays masked until
/// the zone is armed.
#[cfg(target_os = "espidf")]
unsafe fn init_pir_inputs(pir_gpios: &[i32]) -> Result<(), HwInitError> {
    for &pin in pir_gpios {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_ENABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_ANYEDGE,
        };
        check(unsafe { gpio_config(&cfg) }, HwInitError::GpioConfigFailed)?;
        unsafe { gpio_intr_disable(pin) };
    }

    info!("hw_init: {} PIR inputs configured (any-edge, masked)", pir_gpios.len());
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a register read; safe from task and ISR.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    false
}

#[cfg(target_os = "espidf")]
pub fn gpio_set_interrupt(pin: i32, enabled: bool) {
    // SAFETY: pin was configured as an input with an interrupt type in
    // init_pir_inputs(); only the main loop toggles the mask.
    unsafe {
        if enabled {
            gpio_intr_enable(pin);
        } else {
            gpio_intr_disable(pin);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_set_interrupt(_pin: i32, _enabled: bool) {}

// ── LEDC PWM ─────────────────────────────────────────────────

pub const LEDC_CH_BUZZER: u32 = 0;

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() -> Result<(), HwInitError> {
    let timer0 = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_10_BIT,
        freq_hz: pins::BUZZER_PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    check(unsafe { ledc_timer_config(&timer0) }, HwInitError::LedcInitFailed)?;

    let channel = ledc_channel_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        channel: LEDC_CH_BUZZER,
        timer_sel: ledc_timer_t_LEDC_TIMER_0,
        gpio_num: pins::BUZZER_PWM_GPIO,
        duty: 0,
        hpoint: 0,
        ..Default::default()
    };
    check(unsafe { ledc_channel_config(&channel) }, HwInitError::LedcInitFailed)?;

    info!(
        "hw_init: LEDC configured (buzzer=CH0 @ {} Hz)",
        pins::BUZZER_PWM_FREQ_HZ
    );
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u32) {
    // SAFETY: the channel was configured in init_ledc(); only the main
    // loop writes the duty register.
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, duty);
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set(_channel: u32, _duty: u32) {}

// ── GPIO ISR Service ──────────────────────────────────────────

/// Everything a PIR interrupt needs, handed to the ISR as its argument.
pub struct IsrBinding {
    pub queue: &'static EventQueue,
    pub zone: ZoneId,
    pub gpio: i32,
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn pir_gpio_isr(arg: *mut core::ffi::c_void) {
    // SAFETY: arg is the &'static IsrBinding registered in register_zone_isr().
    let binding = unsafe { &*(arg as *const IsrBinding) };
    let mut line = crate::drivers::pir::PirLine::isr_view(binding.gpio);
    crate::events::notify_edge(binding.queue, binding.zone, &mut line);
}

/// Install the per-pin GPIO ISR service.
#[cfg(target_os = "espidf")]
pub fn init_isr_service() -> Result<(), HwInitError> {
    // SAFETY: ESP_ERR_INVALID_STATE means the service is already installed.
    let ret = unsafe { gpio_install_isr_service(0) };
    if ret != ESP_OK as esp_err_t && ret != ESP_ERR_INVALID_STATE as esp_err_t {
        return Err(HwInitError::IsrInstallFailed(ret));
    }
    info!("hw_init: GPIO ISR service installed");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}

/// Attach the edge handler for one zone.  The interrupt stays masked
/// until the zone is armed.
#[cfg(target_os = "espidf")]
pub fn register_zone_isr(binding: &'static IsrBinding) -> Result<(), HwInitError> {
    let arg = core::ptr::from_ref(binding).cast_mut().cast::<core::ffi::c_void>();
    // SAFETY: binding lives forever; the handler only reads it.
    let ret = unsafe { gpio_isr_handler_add(binding.gpio, Some(pir_gpio_isr), arg) };
    check(ret, HwInitError::IsrAddFailed)?;
    info!("hw_init: zone {} edge ISR on GPIO{}", binding.zone, binding.gpio);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn register_zone_isr(binding: &'static IsrBinding) -> Result<(), HwInitError> {
    log::info!(
        "hw_init(sim): zone {} ISR on GPIO{} skipped",
        binding.zone, binding.gpio
    );
    Ok(())
}
