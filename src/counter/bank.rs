//! Live edge counters and the channel gate.
//!
//! The bank itself is plain data; [`CounterState`](super::CounterState)
//! wraps it in a critical section so that the edge handlers, the snapshot
//! routine and the dispatcher never observe it half-updated.

use super::channel::{Channel, ChannelCounts};

/// Six live counters plus the gate that decides whether edges count.
#[derive(Debug)]
pub struct EdgeCounterBank {
    live: ChannelCounts,
    gate_open: bool,
}

impl Default for EdgeCounterBank {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeCounterBank {
    /// Counters at zero, gate closed (nothing counts until the first window).
    pub const fn new() -> Self {
        Self {
            live: ChannelCounts::ZERO,
            gate_open: false,
        }
    }

    /// Count one rising edge on `channel`.
    ///
    /// Returns `false` when the gate is closed and the edge was dropped.
    /// Counters are 32-bit and wrap on overflow.
    pub fn increment(&mut self, channel: Channel) -> bool {
        if !self.gate_open {
            return false;
        }
        let slot = &mut self.live[channel];
        *slot = slot.wrapping_add(1);
        true
    }

    /// Zero every live counter.  Only meaningful with the gate closed.
    pub fn reset(&mut self) {
        debug_assert!(!self.gate_open, "live counters reset with gate open");
        self.live = ChannelCounts::ZERO;
    }

    /// Open the gate for all six channels.  Idempotent.
    pub fn enable_all(&mut self) {
        self.gate_open = true;
    }

    /// Close the gate for all six channels.  Idempotent.
    pub fn disable_all(&mut self) {
        self.gate_open = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.gate_open
    }

    pub fn read(&self) -> ChannelCounts {
        self.live
    }
}
