//! Pulse-input GPIO configuration and rising-edge interrupt handlers.
//!
//! Each of the six channel pins gets its own ISR registration; the channel
//! travels in the handler argument so a single trampoline serves all six.
//! Handlers are attached once at boot and stay attached: the channel gate
//! inside [`CounterState`](crate::counter::CounterState) decides whether an
//! edge counts, so enabling and disabling counting never touches the GPIO
//! interrupt matrix.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::counter::{COUNTERS, Channel};
use crate::error::InitError;
#[cfg(target_os = "espidf")]
use crate::pins;

/// Flags for `gpio_install_isr_service`.  No `ESP_INTR_FLAG_IRAM`: the
/// handler and the counter state live in flash, so the interrupt must be
/// deferred while the flash cache is off.
pub const ISR_SERVICE_FLAGS: i32 = 0;

#[cfg(target_os = "espidf")]
unsafe extern "C" fn channel_edge_isr(arg: *mut core::ffi::c_void) {
    if let Some(&channel) = Channel::ALL.get(arg as usize) {
        COUNTERS.record_edge(channel);
    }
}

/// Configure the six pulse inputs and attach their rising-edge handlers.
/// Call once from `main()` before the command loop.
#[cfg(target_os = "espidf")]
pub fn install_edge_isrs() -> Result<(), InitError> {
    // SAFETY: called once from main() before the command loop; the
    // handlers only touch COUNTERS through its critical section.
    unsafe {
        let mask = Channel::ALL
            .iter()
            .fold(0u64, |m, &ch| m | (1u64 << pins::channel_gpio(ch)));
        let cfg = gpio_config_t {
            pin_bit_mask: mask,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_ENABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_POSEDGE,
        };
        let ret = gpio_config(&cfg);
        if ret != ESP_OK {
            return Err(InitError::GpioConfigFailed(ret));
        }

        // ESP_ERR_INVALID_STATE means the service is already installed.
        let ret = gpio_install_isr_service(ISR_SERVICE_FLAGS);
        if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE {
            return Err(InitError::IsrInstallFailed(ret));
        }

        for channel in Channel::ALL {
            let pin = pins::channel_gpio(channel);
            let ret = gpio_isr_handler_add(
                pin,
                Some(channel_edge_isr),
                channel.index() as *mut core::ffi::c_void,
            );
            if ret != ESP_OK {
                return Err(InitError::IsrInstallFailed(ret));
            }
            gpio_intr_enable(pin);
        }
    }
    info!("edge_isr: rising-edge handlers attached on 6 channels");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn install_edge_isrs() -> Result<(), InitError> {
    log::info!("edge_isr(sim): no GPIO, edges are injected with CounterState::record_edge");
    Ok(())
}
