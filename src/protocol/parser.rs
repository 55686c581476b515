//! Command framing state machine.
//!
//! Wire format:
//! ```text
//! ┌───┬──────┬──────────────┬───┐
//! │ ! │ verb │ [:payload]   │ ? │
//! └───┴──────┴──────────────┴───┘
//! ```
//!
//! The parser is fed one byte at a time from the receive context and yields
//! a [`CommandFrame`] when the terminator arrives.  A `!` anywhere restarts
//! framing, discarding any partial command; that is how the link
//! resynchronises after line noise.  There is no escaping, so `!` and `?`
//! never appear inside a payload.

use heapless::Vec;

/// Start-of-command marker.
pub const START_MARKER: u8 = b'!';
/// End-of-command marker.
pub const TERMINATOR: u8 = b'?';

/// Capacity of the command buffer, marker and terminator included.
pub const MAX_COMMAND_LEN: usize = 20;

/// Framing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// Waiting for `!`; every other byte is ignored.
    Idle,
    /// Collecting bytes into the command buffer.
    Accumulating,
    /// The last byte was `?`; the frame has been handed out.
    Complete,
}

/// A framed command, `!` through `?` inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFrame {
    bytes: Vec<u8, MAX_COMMAND_LEN>,
    truncated: bool,
}

impl CommandFrame {
    /// Build a frame from raw bytes, flagging it truncated if it does not
    /// fit the command buffer.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut bytes = Vec::new();
        let take = data.len().min(MAX_COMMAND_LEN);
        // Cannot fail: `take` is within capacity.
        let _ = bytes.extend_from_slice(&data[..take]);
        Self {
            bytes,
            truncated: data.len() > MAX_COMMAND_LEN,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Bytes between the start marker and the terminator.
    pub fn body(&self) -> &[u8] {
        let b = self.as_bytes();
        let b = b.strip_prefix(&[START_MARKER]).unwrap_or(b);
        b.strip_suffix(&[TERMINATOR]).unwrap_or(b)
    }

    /// The frame overflowed the command buffer; its tail was dropped.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

/// Streaming command parser.  O(1) per byte and allocation-free, so it can
/// run in the byte-reception context.
pub struct FrameParser {
    state: ParserState,
    buf: Vec<u8, MAX_COMMAND_LEN>,
    overflowed: bool,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    pub const fn new() -> Self {
        Self {
            state: ParserState::Idle,
            buf: Vec::new(),
            overflowed: false,
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Feed one byte.  Returns the completed frame when `byte` is the
    /// terminator of a frame in progress.
    pub fn feed(&mut self, byte: u8) -> Option<CommandFrame> {
        if byte == START_MARKER {
            self.restart();
            return None;
        }

        match self.state {
            ParserState::Idle | ParserState::Complete => {
                self.state = ParserState::Idle;
                None
            }
            ParserState::Accumulating => {
                if self.buf.push(byte).is_err() {
                    self.overflowed = true;
                    // Keep the terminator slot honest for a truncated frame.
                    if byte == TERMINATOR {
                        if let Some(last) = self.buf.last_mut() {
                            *last = TERMINATOR;
                        }
                    }
                }
                if byte == TERMINATOR {
                    self.state = ParserState::Complete;
                    let frame = CommandFrame {
                        bytes: core::mem::take(&mut self.buf),
                        truncated: self.overflowed,
                    };
                    self.overflowed = false;
                    return Some(frame);
                }
                None
            }
        }
    }

    /// Feed a run of bytes, handing every completed frame to `on_frame`.
    pub fn feed_all(&mut self, data: &[u8], mut on_frame: impl FnMut(CommandFrame)) {
        for &byte in data {
            if let Some(frame) = self.feed(byte) {
                on_frame(frame);
            }
        }
    }

    /// Drop any partial command and go back to waiting for `!`.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.overflowed = false;
        self.state = ParserState::Idle;
    }

    fn restart(&mut self) {
        self.buf.clear();
        self.overflowed = false;
        // Cannot fail: the buffer was just cleared.
        let _ = self.buf.push(START_MARKER);
        self.state = ParserState::Accumulating;
    }
}
