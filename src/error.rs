//! Unified error types for the coincidence counter firmware.
//!
//! A single `Error` enum for the command loop and config checks, plus the
//! narrower per-subsystem enums it wraps or sits beside.  All variants are `Copy` so they can
//! be passed out of the dispatcher and logged without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Errors surfaced by the command loop and the boot-time config check.
/// Peripheral bring-up reports [`InitError`] directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The host sent a frame that is not a valid command.
    Protocol(ProtocolError),
    /// The serial link refused a read or write.
    Link,
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Protocol(e) => write!(f, "protocol: {e}"),
            Self::Link => write!(f, "serial link error"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Protocol errors
// ---------------------------------------------------------------------------

/// Reasons a completed frame is answered with `!E;`.
///
/// None of these change device state: the dispatcher rejects the frame
/// before touching the counters, the gate, or the sampling period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// The frame overflowed the command buffer before its terminator.
    Truncated,
    /// `!?`: no verb between start marker and terminator.
    MissingVerb,
    /// The verb byte is not one of `D`, `T`, `V`, `S`.
    UnknownVerb(u8),
    /// `T` without a `:<int>` payload.
    MissingPayload,
    /// The payload is not a plain decimal integer.
    InvalidPayload,
    /// The requested sampling period is zero or above the configured maximum.
    PeriodOutOfRange(u32),
    /// A payload was attached to a verb that takes none.
    UnexpectedPayload,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated => write!(f, "command exceeds buffer"),
            Self::MissingVerb => write!(f, "missing verb"),
            Self::UnknownVerb(v) if v.is_ascii_graphic() => {
                write!(f, "unknown verb '{}'", *v as char)
            }
            Self::UnknownVerb(v) => write!(f, "unknown verb 0x{v:02x}"),
            Self::MissingPayload => write!(f, "missing payload"),
            Self::InvalidPayload => write!(f, "payload is not a decimal integer"),
            Self::PeriodOutOfRange(ms) => write!(f, "sampling period {ms} ms out of range"),
            Self::UnexpectedPayload => write!(f, "verb takes no payload"),
        }
    }
}

impl From<ProtocolError> for Error {
    fn from(e: ProtocolError) -> Self {
        Self::Protocol(e)
    }
}

// ---------------------------------------------------------------------------
// Initialisation errors
// ---------------------------------------------------------------------------

/// Errors during one-shot peripheral bring-up.  The payload is the raw
/// ESP-IDF return code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    GpioConfigFailed(i32),
    IsrInstallFailed(i32),
    TimerCreateFailed(i32),
    UartInstallFailed(i32),
    TaskSpawnFailed(i32),
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={rc})"),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR install failed (rc={rc})"),
            Self::TimerCreateFailed(rc) => write!(f, "window timer create failed (rc={rc})"),
            Self::UartInstallFailed(rc) => write!(f, "UART driver install failed (rc={rc})"),
            Self::TaskSpawnFailed(rc) => write!(f, "task spawn failed (rc={rc})"),
        }
    }
}

// ---------------------------------------------------------------------------
// Window timer errors
// ---------------------------------------------------------------------------

/// A sampling window could not be scheduled.  `D` answers `!E;` instead of
/// waiting for an expiry that will never come.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    /// `esp_timer_start_once` returned this code.
    StartFailed(i32),
    /// The host simulation could not spawn its helper thread.
    SpawnFailed,
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartFailed(rc) => write!(f, "start failed (rc={rc})"),
            Self::SpawnFailed => write!(f, "helper thread spawn failed"),
        }
    }
}

impl core::error::Error for Error {}
impl core::error::Error for ProtocolError {}
impl core::error::Error for InitError {}
impl core::error::Error for TimerError {}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
