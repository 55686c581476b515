//! Firmware configuration parameters
//!
//! All tunable parameters for the coincidence counter.  Fixed protocol
//! bounds (command buffer, response size, counter width) live next to the
//! code that enforces them; this struct only carries what a board build may
//! reasonably change.

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Capacity of the version string reported by `!V?`.
pub const VERSION_CAPACITY: usize = 16;
/// Capacity of the boot banner.
pub const BANNER_CAPACITY: usize = 32;

/// Bytes that frame commands and responses; never allowed inside strings
/// the firmware echoes back to the host.
const PROTOCOL_DELIMITERS: [char; 4] = ['!', '?', ':', ';'];

/// Core firmware configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmwareConfig {
    // --- Serial link ---
    /// UART baud rate to the host
    pub baud_rate: u32,
    /// Text written once on the serial link at boot
    pub banner: String<BANNER_CAPACITY>,

    // --- Acquisition ---
    /// Sampling period (ms) in force after power-on, until the first `T`
    pub default_period_ms: u32,
    /// Largest sampling period (ms) a `T` command may request
    pub max_period_ms: u32,

    // --- Command loop ---
    /// Idle sleep (ms) between command polls
    pub poll_interval_ms: u32,
    /// Version reported by `!V?`
    pub version: String<VERSION_CAPACITY>,
    /// Answer `!S?` with `!S;` instead of the historical `!E;`
    pub stop_acknowledges: bool,
}

impl Default for FirmwareConfig {
    fn default() -> Self {
        Self {
            // Serial link
            baud_rate: 115_200,
            banner: bounded("HOM Test / LEnsE"),

            // Acquisition
            default_period_ms: 10,
            max_period_ms: 3_600_000, // 1 h

            // Command loop
            poll_interval_ms: 10,
            version: bounded("1.1a"),
            stop_acknowledges: false,
        }
    }
}

impl FirmwareConfig {
    /// Range-check every field.  Returns a description of the first
    /// offending field.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.baud_rate == 0 {
            return Err("baud_rate must be non-zero");
        }
        if self.default_period_ms == 0 {
            return Err("default_period_ms must be non-zero");
        }
        if self.default_period_ms > self.max_period_ms {
            return Err("default_period_ms exceeds max_period_ms");
        }
        if self.poll_interval_ms == 0 {
            return Err("poll_interval_ms must be non-zero");
        }
        if self.version.is_empty() {
            return Err("version must not be empty");
        }
        if self.version.contains(PROTOCOL_DELIMITERS.as_slice()) {
            return Err("version contains a protocol delimiter");
        }
        if self.banner.contains(PROTOCOL_DELIMITERS.as_slice()) {
            return Err("banner contains a protocol delimiter");
        }
        Ok(())
    }

    /// [`validate`](Self::validate) as a firmware [`Error::Config`].
    pub fn check(&self) -> crate::Result<()> {
        self.validate().map_err(Error::Config)
    }

    /// Whether `period_ms` is an acceptable sampling period.
    pub fn period_in_range(&self, period_ms: u32) -> bool {
        (1..=self.max_period_ms).contains(&period_ms)
    }
}

/// Copy `s` into a fixed-capacity string, dropping whatever does not fit.
fn bounded<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
