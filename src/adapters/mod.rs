//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements | Connects to                 |
//! |------------|------------|-----------------------------|
//! | `log_sink` | EventSink  | Serial log output           |
//! | `uart`     | Transport  | UART0 / USB-serial bridge   |

pub mod log_sink;
pub mod uart;
