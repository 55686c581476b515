//! Host serial link over UART0 (USB-serial bridge).
//!
//! UART0 carries protocol bytes only; the IDF console and `log` output
//! go to USB-Serial-JTAG (see `sdkconfig.defaults`).
//!
//! - **`target_os = "espidf"`**: drives the IDF UART driver.  The handle
//!   is just the port number, so the receive task and the command loop
//!   each hold a copy; the IDF driver serialises reads and writes
//!   internally.
//! - **`not(target_os = "espidf")`**: an in-memory loopback.  Tests push
//!   host bytes with [`UartTransport::push_rx`] and collect responses with
//!   [`UartTransport::take_tx`].

use crate::config::FirmwareConfig;
use crate::error::InitError;
use crate::protocol::Transport;

/// Errors surfaced by the UART transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UartError {
    /// Driver call returned a negative count or non-OK status.
    Driver(i32),
}

impl core::fmt::Display for UartError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Driver(rc) => write!(f, "UART driver error (rc={rc})"),
        }
    }
}

#[cfg(target_os = "espidf")]
pub use esp::UartTransport;
#[cfg(not(target_os = "espidf"))]
pub use sim::UartTransport;

// ── ESP-IDF ───────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_hal::delay::TickType;
    use esp_idf_svc::sys::*;
    use log::info;

    use super::{FirmwareConfig, InitError, Transport, UartError};
    use crate::pins;

    const RX_RING_BYTES: i32 = 256;
    const TX_DONE_TIMEOUT_MS: u64 = 100;

    #[derive(Clone, Copy)]
    pub struct UartTransport {
        port: uart_port_t,
    }

    impl UartTransport {
        /// Install the driver on the host port at the configured baud rate
        /// (8N1, no flow control).
        pub fn new(config: &FirmwareConfig) -> Result<Self, InitError> {
            let port = pins::HOST_UART_PORT;
            let uart_cfg = uart_config_t {
                baud_rate: config.baud_rate as i32,
                data_bits: uart_word_length_t_UART_DATA_8_BITS,
                parity: uart_parity_t_UART_PARITY_DISABLE,
                stop_bits: uart_stop_bits_t_UART_STOP_BITS_1,
                flow_ctrl: uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
                ..Default::default()
            };
            // SAFETY: called once from main(); `uart_cfg` outlives the calls.
            unsafe {
                let ret = uart_param_config(port, &uart_cfg);
                if ret != ESP_OK {
                    return Err(InitError::UartInstallFailed(ret));
                }
                let ret = uart_set_pin(
                    port,
                    pins::HOST_UART_TX_GPIO,
                    pins::HOST_UART_RX_GPIO,
                    UART_PIN_NO_CHANGE,
                    UART_PIN_NO_CHANGE,
                );
                if ret != ESP_OK {
                    return Err(InitError::UartInstallFailed(ret));
                }
                let ret = uart_driver_install(
                    port,
                    RX_RING_BYTES,
                    0,
                    0,
                    core::ptr::null_mut(),
                    0,
                );
                if ret != ESP_OK {
                    return Err(InitError::UartInstallFailed(ret));
                }
            }
            info!("uart: port {} at {} baud", port, config.baud_rate);
            Ok(Self { port })
        }
    }

    impl Transport for UartTransport {
        type Error = UartError;

        fn read(&mut self, buf: &mut [u8]) -> Result<usize, UartError> {
            // SAFETY: `buf` is valid for `buf.len()` bytes; zero ticks = no wait.
            let n = unsafe {
                uart_read_bytes(self.port, buf.as_mut_ptr().cast(), buf.len() as u32, 0)
            };
            usize::try_from(n).map_err(|_| UartError::Driver(n))
        }

        fn write(&mut self, data: &[u8]) -> Result<usize, UartError> {
            // SAFETY: `data` is valid for `data.len()` bytes.
            let n = unsafe { uart_write_bytes(self.port, data.as_ptr().cast(), data.len()) };
            usize::try_from(n).map_err(|_| UartError::Driver(n))
        }

        fn flush(&mut self) -> Result<(), UartError> {
            let timeout = TickType::new_millis(TX_DONE_TIMEOUT_MS).ticks();
            // SAFETY: the driver was installed in `new()`.
            let ret = unsafe { uart_wait_tx_done(self.port, timeout) };
            if ret == ESP_OK {
                Ok(())
            } else {
                Err(UartError::Driver(ret))
            }
        }
    }
}

// ── Host simulation ───────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
mod sim {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex, PoisonError};

    use super::{FirmwareConfig, InitError, Transport, UartError};

    /// In-memory loopback.  Clones share the same buffers.
    #[derive(Clone, Default)]
    pub struct UartTransport {
        rx: Arc<Mutex<VecDeque<u8>>>,
        tx: Arc<Mutex<Vec<u8>>>,
    }

    impl UartTransport {
        pub fn new(config: &FirmwareConfig) -> Result<Self, InitError> {
            log::info!("uart(sim): loopback at {} baud", config.baud_rate);
            Ok(Self::default())
        }

        /// Bytes "sent by the host".
        pub fn push_rx(&self, data: &[u8]) {
            self.rx
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .extend(data.iter().copied());
        }

        /// Drain everything the firmware has written so far.
        pub fn take_tx(&self) -> Vec<u8> {
            core::mem::take(&mut *self.tx.lock().unwrap_or_else(PoisonError::into_inner))
        }
    }

    impl Transport for UartTransport {
        type Error = UartError;

        fn read(&mut self, buf: &mut [u8]) -> Result<usize, UartError> {
            let mut rx = self.rx.lock().unwrap_or_else(PoisonError::into_inner);
            let n = buf.len().min(rx.len());
            for (dst, src) in buf.iter_mut().zip(rx.drain(..n)) {
                *dst = src;
            }
            Ok(n)
        }

        fn write(&mut self, data: &[u8]) -> Result<usize, UartError> {
            self.tx
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> Result<(), UartError> {
            Ok(())
        }
    }

}
