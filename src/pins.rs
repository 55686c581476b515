//! GPIO / peripheral pin assignments for the coincidence counter board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

use crate::counter::Channel;

// ---------------------------------------------------------------------------
// Pulse inputs (rising-edge interrupts)
// ---------------------------------------------------------------------------

/// Single-detector output A.
pub const CHANNEL_A_GPIO: i32 = 4;
/// Single-detector output B.
pub const CHANNEL_B_GPIO: i32 = 5;
/// Single-detector output C.
pub const CHANNEL_C_GPIO: i32 = 6;
/// Two-fold coincidence A∧B from the discriminator board.
pub const CHANNEL_AB_GPIO: i32 = 7;
/// Two-fold coincidence A∧C.
pub const CHANNEL_AC_GPIO: i32 = 15;
/// Three-fold coincidence A∧B∧C.
pub const CHANNEL_ABC_GPIO: i32 = 16;

/// GPIO wired to `channel`.
pub const fn channel_gpio(channel: Channel) -> i32 {
    match channel {
        Channel::A => CHANNEL_A_GPIO,
        Channel::B => CHANNEL_B_GPIO,
        Channel::C => CHANNEL_C_GPIO,
        Channel::AB => CHANNEL_AB_GPIO,
        Channel::AC => CHANNEL_AC_GPIO,
        Channel::ABC => CHANNEL_ABC_GPIO,
    }
}

// ---------------------------------------------------------------------------
// Host link (UART0 routed to the USB-serial bridge)
// ---------------------------------------------------------------------------

/// UART0 is the ROM/IDF default console; `sdkconfig.defaults` moves the
/// console to USB-Serial-JTAG so only protocol bytes leave on these pins.
pub const HOST_UART_PORT: i32 = 0;
pub const HOST_UART_TX_GPIO: i32 = 43;
pub const HOST_UART_RX_GPIO: i32 = 44;
