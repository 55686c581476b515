//! Port traits: the hexagonal boundary between the command logic and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Dispatcher (domain)
//! ```
//!
//! Driven adapters (window timer, event sink) implement these traits.  The
//! [`Dispatcher`](super::dispatcher::Dispatcher) consumes them via
//! generics, so the command logic never touches hardware directly.

use super::events::AppEvent;
use crate::error::TimerError;

// ───────────────────────────────────────────────────────────────
// Window timer port (driven adapter: domain → hardware timer)
// ───────────────────────────────────────────────────────────────

/// One-shot countdown that ends a sampling window.
///
/// Implementations are bound to a [`CounterState`](crate::counter::CounterState)
/// at construction and call its `snapshot_and_reset` on expiry, exactly
/// once per `arm`.
pub trait WindowTimer {
    /// Schedule one expiry `duration_ms` from now.  Any pending expiry is
    /// cancelled first, so at most one window is ever armed.  On `Err`
    /// nothing is scheduled and no expiry will follow.
    fn arm(&mut self, duration_ms: u32) -> Result<(), TimerError>;

    /// Prevent a pending expiry from firing.  An expiry already executing
    /// is not affected.  No-op when nothing is armed.
    fn cancel(&mut self);

    /// Whether an expiry is pending.
    fn is_armed(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The dispatcher emits structured [`AppEvent`]s through this port.
/// Adapters decide where they go (serial log, a debug UART, ...).
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}
