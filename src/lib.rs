//! Coincidence counter firmware library.
//!
//! Exposes the counting core, protocol and dispatcher for integration
//! testing.  All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module; host builds get
//! simulation adapters in the same places.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod counter;
pub mod error;
pub mod pins;
pub mod protocol;

pub mod adapters;
pub mod drivers;

pub use error::{Error, InitError, ProtocolError, Result, TimerError};
