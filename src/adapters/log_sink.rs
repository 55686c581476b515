//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger.  The console is routed to USB-Serial-JTAG by
//! `sdkconfig.defaults`, so these lines never reach UART0, which carries
//! the host protocol.

use core::fmt::Write as _;

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::counter::ChannelCounts;

/// Adapter that logs every [`AppEvent`] to the console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

/// `A=1 B=0 C=4 AB=0 AC=0 ABC=0`
fn format_counts(counts: &ChannelCounts) -> heapless::String<96> {
    let mut out = heapless::String::new();
    for (i, (ch, n)) in counts.iter().enumerate() {
        let sep = if i == 0 { "" } else { " " };
        // 6 × "ABC=4294967295 " fits in 96.
        let _ = write!(out, "{sep}{ch}={n}");
    }
    out
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { period_ms } => {
                info!("START | period={}ms", period_ms);
            }
            AppEvent::WindowCompleted { period_ms, counts } => {
                info!(
                    "WINDOW | period={}ms | {} | total={}",
                    period_ms,
                    format_counts(counts),
                    counts.total()
                );
            }
            AppEvent::PeriodChanged { from_ms, to_ms } => {
                info!("PERIOD | {}ms -> {}ms", from_ms, to_ms);
            }
            AppEvent::WindowFailed(e) => {
                warn!("WINDOW | not started: {}", e);
            }
            AppEvent::AcquisitionStopped { window_pending } => {
                info!(
                    "STOP | gate closed{}",
                    if *window_pending { ", pending window cancelled" } else { "" }
                );
            }
            AppEvent::CommandRejected(e) => {
                warn!("REJECT | {}", e);
            }
        }
    }
}
