//! Outbound application events.
//!
//! The [`Dispatcher`](super::dispatcher::Dispatcher) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them.

use crate::counter::ChannelCounts;
use crate::error::{ProtocolError, TimerError};

/// Structured events emitted by the command core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The command loop is up (carries the initial sampling period).
    Started { period_ms: u32 },

    /// A `D` window closed and its counts were reported.
    WindowCompleted { period_ms: u32, counts: ChannelCounts },

    /// A `T` command changed the sampling period.
    PeriodChanged { from_ms: u32, to_ms: u32 },

    /// A `D` window could not be scheduled; the gate was closed and the
    /// host answered `!E;`.
    WindowFailed(TimerError),

    /// An `S` command cancelled the window and closed the gate.
    AcquisitionStopped { window_pending: bool },

    /// A frame was answered with `!E;`.
    CommandRejected(ProtocolError),
}
