//! Command grammar.
//!
//! ```text
//! command  := "!" verb ("?" | ":" payload "?")
//! verb     := "D" | "T" | "V" | "S"
//! payload  := decimal-integer        (only for "T")
//! ```

use crate::error::ProtocolError;

use super::parser::CommandFrame;

/// A validated host command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `!D?`: run one sampling window and report the six counts.
    Data,
    /// `!T:<ms>?`: set the sampling period.
    SetPeriod(u32),
    /// `!V?`: report the firmware version.
    Version,
    /// `!S?`: abort any window and stop counting.
    Stop,
}

impl Command {
    /// The verb byte of this command.
    pub const fn verb(self) -> u8 {
        match self {
            Self::Data => b'D',
            Self::SetPeriod(_) => b'T',
            Self::Version => b'V',
            Self::Stop => b'S',
        }
    }

    /// Decode a completed frame.  The period range is checked by the
    /// dispatcher, which owns the configured maximum.
    pub fn parse(frame: &CommandFrame) -> Result<Self, ProtocolError> {
        if frame.is_truncated() {
            return Err(ProtocolError::Truncated);
        }

        let body = frame.body();
        let (&verb, rest) = body.split_first().ok_or(ProtocolError::MissingVerb)?;

        match verb {
            b'D' => no_payload(rest).map(|()| Self::Data),
            b'V' => no_payload(rest).map(|()| Self::Version),
            b'S' => no_payload(rest).map(|()| Self::Stop),
            b'T' => {
                let payload = rest
                    .strip_prefix(b":")
                    .ok_or(ProtocolError::MissingPayload)?;
                parse_decimal(payload).map(Self::SetPeriod)
            }
            other => Err(ProtocolError::UnknownVerb(other)),
        }
    }
}

fn no_payload(rest: &[u8]) -> Result<(), ProtocolError> {
    if rest.is_empty() {
        Ok(())
    } else {
        Err(ProtocolError::UnexpectedPayload)
    }
}

/// Plain unsigned decimal: at least one digit, nothing else, fits in `u32`.
fn parse_decimal(digits: &[u8]) -> Result<u32, ProtocolError> {
    if digits.is_empty() {
        return Err(ProtocolError::MissingPayload);
    }
    digits.iter().try_fold(0u32, |acc, &b| {
        if !b.is_ascii_digit() {
            return Err(ProtocolError::InvalidPayload);
        }
        acc.checked_mul(10)
            .and_then(|v| v.checked_add(u32::from(b - b'0')))
            .ok_or(ProtocolError::InvalidPayload)
    })
}
