//! Pulse counting core: live counters, gate, snapshot, ready signal.
//!
//! [`CounterState`] is the one piece of state shared between the three
//! execution contexts:
//!
//! ```text
//!   GPIO edge ISR ──record_edge()──────────┐
//!                                          ▼
//!   window timer ──snapshot_and_reset()─▶ CounterState ◀── Dispatcher
//!                                          (bank · backup · ready · period)
//! ```
//!
//! Field ownership:
//! - live counters: incremented by edge handlers, zeroed only by
//!   `begin_window` / `snapshot_and_reset`, both with the gate closed;
//! - backup counters: written only by `snapshot_and_reset`, read by the
//!   dispatcher after it has observed the ready signal;
//! - ready signal: raised by `snapshot_and_reset` after the backup set is
//!   written, cleared by `begin_window` and consumed by `wait_ready`;
//! - sampling period: written and read only by the dispatcher.
//!
//! The bank and backup set sit behind `critical_section::Mutex`, so on
//! target every access briefly masks interrupts and on the host it takes a
//! global lock.  That is what makes the gate boundary exact: once
//! `disable_all` returns, no edge handler is midway through an increment.

pub mod bank;
pub mod channel;

use core::cell::{Cell, RefCell};
use core::sync::atomic::{AtomicU32, Ordering};

use critical_section::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use bank::EdgeCounterBank;
pub use channel::{CHANNEL_COUNT, Channel, ChannelCounts};

/// Width of a live counter.  A window that sees more than `u32::MAX`
/// edges on one channel wraps that channel's count.
pub const COUNTER_BITS: u32 = u32::BITS;

/// Sampling period in force before configuration is applied.
pub const DEFAULT_PERIOD_MS: u32 = 10;

/// Instance used by the on-target ISRs and timer callback.
pub static COUNTERS: CounterState = CounterState::new(DEFAULT_PERIOD_MS);

/// Shared counting state.  `const`-constructible so it can live in a
/// `static`; tests create their own instances.
pub struct CounterState {
    bank: Mutex<RefCell<EdgeCounterBank>>,
    backup: Mutex<Cell<ChannelCounts>>,
    ready: Signal<CriticalSectionRawMutex, ()>,
    period_ms: AtomicU32,
}

impl Default for CounterState {
    fn default() -> Self {
        Self::new(DEFAULT_PERIOD_MS)
    }
}

impl CounterState {
    pub const fn new(period_ms: u32) -> Self {
        Self {
            bank: Mutex::new(RefCell::new(EdgeCounterBank::new())),
            backup: Mutex::new(Cell::new(ChannelCounts::ZERO)),
            ready: Signal::new(),
            period_ms: AtomicU32::new(period_ms),
        }
    }

    // ── Edge counter bank ─────────────────────────────────────

    /// Edge handler body for `channel`.  O(1), never fails.
    /// Returns `false` if the gate was closed and the edge dropped.
    pub fn record_edge(&self, channel: Channel) -> bool {
        critical_section::with(|cs| self.bank.borrow_ref_mut(cs).increment(channel))
    }

    /// Current live counts (diagnostics; not a consistent window snapshot).
    pub fn live(&self) -> ChannelCounts {
        critical_section::with(|cs| self.bank.borrow_ref(cs).read())
    }

    // ── Channel gate ──────────────────────────────────────────

    pub fn enable_all(&self) {
        critical_section::with(|cs| self.bank.borrow_ref_mut(cs).enable_all());
    }

    pub fn disable_all(&self) {
        critical_section::with(|cs| self.bank.borrow_ref_mut(cs).disable_all());
    }

    pub fn gate_enabled(&self) -> bool {
        critical_section::with(|cs| self.bank.borrow_ref(cs).is_enabled())
    }

    // ── Window lifecycle ──────────────────────────────────────

    /// Start a fresh window: clear the ready signal, zero the live
    /// counters with the gate closed, then open the gate.
    pub fn begin_window(&self) {
        self.ready.reset();
        critical_section::with(|cs| {
            let mut bank = self.bank.borrow_ref_mut(cs);
            bank.disable_all();
            bank.reset();
            bank.enable_all();
        });
    }

    /// Window-expiry routine.  Closes the gate, moves the live counts into
    /// the backup set, zeroes the live counts, reopens the gate, then
    /// raises the ready signal.  Non-blocking; safe from timer callbacks.
    pub fn snapshot_and_reset(&self) -> ChannelCounts {
        let counts = critical_section::with(|cs| {
            let mut bank = self.bank.borrow_ref_mut(cs);
            bank.disable_all();
            let counts = bank.read();
            self.backup.borrow(cs).set(counts);
            bank.reset();
            bank.enable_all();
            counts
        });
        self.ready.signal(());
        counts
    }

    /// Counts of the last completed window.  All six are written under one
    /// critical section, so this never returns a partially updated set.
    pub fn backup(&self) -> ChannelCounts {
        critical_section::with(|cs| self.backup.borrow(cs).get())
    }

    // ── Ready flag ────────────────────────────────────────────

    pub fn is_ready(&self) -> bool {
        self.ready.signaled()
    }

    /// Suspend until the next `snapshot_and_reset`, consuming the signal.
    pub async fn wait_ready(&self) {
        self.ready.wait().await;
    }

    // ── Sampling period ───────────────────────────────────────

    pub fn period_ms(&self) -> u32 {
        self.period_ms.load(Ordering::Relaxed)
    }

    pub fn set_period_ms(&self, period_ms: u32) {
        self.period_ms.store(period_ms, Ordering::Relaxed);
    }
}
