//! Coincidence Counter Firmware: Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  UartTransport      LogEventSink     EspWindowTimer            │
//! │  (Transport)        (EventSink)      (WindowTimer)             │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │          Dispatcher (command → counter core)           │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  GPIO edge ISRs ──▶ COUNTERS ◀── esp_timer window callback     │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two threads: the receive task on Core 0 frames UART bytes into the
//! frame channel, and this thread serves frames one at a time.
#![deny(unused_must_use)]

use anyhow::{Context, Result};
use futures_lite::future::block_on;
use log::{info, warn};

use coincidence_counter::adapters::log_sink::LogEventSink;
use coincidence_counter::adapters::uart::UartTransport;
use coincidence_counter::app::dispatcher::Dispatcher;
use coincidence_counter::config::FirmwareConfig;
use coincidence_counter::counter::COUNTERS;
use coincidence_counter::drivers::edge_isr;
use coincidence_counter::drivers::window_timer::EspWindowTimer;
use coincidence_counter::protocol::channels::FRAME_CHANNEL;
use coincidence_counter::protocol::rx_task;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    let config = FirmwareConfig::default();
    config.check().context("firmware config")?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Coincidence counter v{:<14} ║", config.version.as_str());
    info!("╚══════════════════════════════════════╝");

    // ── 2. Peripherals ────────────────────────────────────────
    edge_isr::install_edge_isrs().context("edge interrupts")?;
    let timer = EspWindowTimer::new().context("window timer")?;
    let link = UartTransport::new(&config).context("host UART")?;

    // ── 3. Receive task (Core 0) ──────────────────────────────
    let _rx = rx_task::spawn(link, &FRAME_CHANNEL, config.poll_interval_ms)
        .context("receive task")?;

    // ── 4. Command loop ───────────────────────────────────────
    let mut tx = link;
    let mut sink = LogEventSink::new();
    let mut dispatcher = Dispatcher::new(&COUNTERS, timer, config);
    dispatcher.start(&mut tx, &mut sink)?;

    loop {
        let frame = block_on(FRAME_CHANNEL.receive());
        if let Err(e) = dispatcher.serve_frame(&frame, &mut tx, &mut sink) {
            warn!("command loop: {}", e);
        }
    }
}
