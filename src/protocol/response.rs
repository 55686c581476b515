//! Response encoding.
//!
//! ```text
//! response := "!" body ";"
//! !D:<A>:<B>:<C>:<AB>:<AC>:<ABC>;   !T:<ms>;   !V:<version>;   !S;   !E;
//! ```

use core::fmt::{self, Write};

use heapless::String;

use crate::counter::ChannelCounts;

/// Room for the largest response: `!D:` + six 10-digit counts + five `:` + `;`.
pub const RESPONSE_CAPACITY: usize = 80;

/// Encoded response bytes, ready for the serial link.
pub type ResponseBuf = String<RESPONSE_CAPACITY>;

/// A reply to one command frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response<'a> {
    /// Counts of the completed window in wire order.
    Data(ChannelCounts),
    /// Echo of the sampling period now in force.
    Period(u32),
    Version(&'a str),
    /// Stop acknowledged (only when configured; see `FirmwareConfig`).
    Stopped,
    Error,
}

impl Response<'_> {
    /// Encode into a fixed-capacity buffer.
    pub fn encode(&self) -> ResponseBuf {
        let mut out = ResponseBuf::new();
        if write!(out, "{self}").is_err() {
            // Only an over-long version string can get here.
            out.clear();
            let _ = out.push_str("!E;");
        }
        out
    }
}

impl fmt::Display for Response<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data(counts) => {
                f.write_str("!D")?;
                for (_, count) in counts.iter() {
                    write!(f, ":{count}")?;
                }
                f.write_str(";")
            }
            Self::Period(ms) => write!(f, "!T:{ms};"),
            Self::Version(v) => write!(f, "!V:{v};"),
            Self::Stopped => f.write_str("!S;"),
            Self::Error => f.write_str("!E;"),
        }
    }
}
