//! End-to-end flow: host bytes → receive task → frame channel →
//! Dispatcher → response bytes, over the loopback UART.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::mock_hw::{RecordingSink, ScriptedTimer};

use coincidence_counter::adapters::uart::UartTransport;
use coincidence_counter::app::dispatcher::Dispatcher;
use coincidence_counter::app::ports::WindowTimer;
use coincidence_counter::config::FirmwareConfig;
use coincidence_counter::counter::{Channel, CounterState};
use coincidence_counter::drivers::window_timer::ThreadWindowTimer;
use coincidence_counter::protocol::channels::{FrameChannel, try_recv_frame};
use coincidence_counter::protocol::rx_task::pump_once;
use coincidence_counter::protocol::FrameParser;
use coincidence_counter::app::events::AppEvent;
use coincidence_counter::TimerError;

/// Pump every pending host byte, then serve every queued frame.
fn run_until_idle<T: WindowTimer>(
    link: &mut UartTransport,
    parser: &mut FrameParser,
    frames: &FrameChannel,
    d: &mut Dispatcher<'_, T>,
    sink: &mut RecordingSink,
) {
    while pump_once(link, parser, frames) > 0 {}
    while let Some(frame) = try_recv_frame(frames) {
        d.serve_frame(&frame, link, sink).unwrap();
    }
}

fn tx_string(link: &UartTransport) -> String {
    String::from_utf8(link.take_tx()).unwrap()
}

#[test]
fn start_writes_banner() {
    let state = CounterState::default();
    let mut link = UartTransport::default();
    let mut sink = RecordingSink::new();
    let mut d = Dispatcher::new(&state, ScriptedTimer::new(&state), FirmwareConfig::default());

    d.start(&mut link, &mut sink).unwrap();

    assert_eq!(tx_string(&link), "HOM Test / LEnsE");
}

#[test]
fn noisy_stream_is_answered_in_order() {
    let state = CounterState::default();
    let mut link = UartTransport::default();
    let host = link.clone();
    let mut parser = FrameParser::new();
    let frames = FrameChannel::new();
    let mut sink = RecordingSink::new();
    let mut d = Dispatcher::new(&state, ScriptedTimer::new(&state), FirmwareConfig::default());

    host.push_rx(b"\r\nhello?!V?garbage!T:100?!X?");
    run_until_idle(&mut link, &mut parser, &frames, &mut d, &mut sink);

    assert_eq!(tx_string(&host), "!V:1.1a;!T:100;!E;");
}

#[test]
fn interrupted_frame_restarts_on_new_start_marker() {
    let state = CounterState::default();
    let mut link = UartTransport::default();
    let host = link.clone();
    let mut parser = FrameParser::new();
    let frames = FrameChannel::new();
    let mut sink = RecordingSink::new();
    let mut d = Dispatcher::new(&state, ScriptedTimer::new(&state), FirmwareConfig::default());

    host.push_rx(b"!T:12!V?");
    run_until_idle(&mut link, &mut parser, &frames, &mut d, &mut sink);

    assert_eq!(tx_string(&host), "!V:1.1a;");
    assert_eq!(d.period_ms(), 10);
}

#[test]
fn data_window_spans_at_least_the_period() {
    let state = Arc::new(CounterState::default());
    let mut link = UartTransport::default();
    let host = link.clone();
    let mut parser = FrameParser::new();
    let frames = FrameChannel::new();
    let mut sink = RecordingSink::new();
    let timer = ThreadWindowTimer::new(Arc::clone(&state));
    let mut d = Dispatcher::new(&state, timer, FirmwareConfig::default());

    host.push_rx(b"!T:150?");
    run_until_idle(&mut link, &mut parser, &frames, &mut d, &mut sink);
    assert_eq!(tx_string(&host), "!T:150;");

    // Pulse source: waits for the gate to open, then fires 5 edges on A.
    let source = {
        let state = Arc::clone(&state);
        std::thread::spawn(move || {
            let deadline = Instant::now() + Duration::from_secs(2);
            while !state.gate_enabled() && Instant::now() < deadline {
                std::thread::yield_now();
            }
            for _ in 0..5 {
                state.record_edge(Channel::A);
            }
        })
    };

    host.push_rx(b"!D?");
    let t0 = Instant::now();
    run_until_idle(&mut link, &mut parser, &frames, &mut d, &mut sink);
    let elapsed = t0.elapsed();
    source.join().unwrap();

    assert!(elapsed >= Duration::from_millis(150), "window closed early: {elapsed:?}");
    assert_eq!(tx_string(&host), "!D:5:0:0:0:0:0;");
}

#[test]
fn stop_cancels_pending_thread_window() {
    let state = Arc::new(CounterState::default());
    let mut timer = ThreadWindowTimer::new(Arc::clone(&state));
    state.begin_window();
    timer.arm(50).unwrap();

    let mut link = UartTransport::default();
    let host = link.clone();
    let mut parser = FrameParser::new();
    let frames = FrameChannel::new();
    let mut sink = RecordingSink::new();
    let mut d = Dispatcher::new(&state, timer, FirmwareConfig::default());

    host.push_rx(b"!S?");
    run_until_idle(&mut link, &mut parser, &frames, &mut d, &mut sink);

    assert_eq!(tx_string(&host), "!E;");
    assert!(!d.timer().is_armed());
    std::thread::sleep(Duration::from_millis(100));
    assert!(!state.is_ready(), "cancelled window must not snapshot");
    assert!(!state.gate_enabled());
}

#[test]
fn frames_received_during_a_window_are_served_after_it() {
    let state = CounterState::default();
    let mut link = UartTransport::default();
    let host = link.clone();
    let mut parser = FrameParser::new();
    let frames = FrameChannel::new();
    let mut sink = RecordingSink::new();
    let mut d = Dispatcher::new(&state, ScriptedTimer::new(&state), FirmwareConfig::default());

    // All four frames are framed before the first one is served.
    host.push_rx(b"!D?!V?!T:20?!D?");
    run_until_idle(&mut link, &mut parser, &frames, &mut d, &mut sink);

    assert_eq!(
        tx_string(&host),
        "!D:0:0:0:0:0:0;!V:1.1a;!T:20;!D:0:0:0:0:0:0;"
    );
    assert_eq!(d.timer().armed_periods(), [10, 20]);
}

#[test]
fn failed_window_start_answers_error_and_keeps_serving() {
    let state = CounterState::default();
    let mut link = UartTransport::default();
    let host = link.clone();
    let mut parser = FrameParser::new();
    let frames = FrameChannel::new();
    let mut sink = RecordingSink::new();
    let mut timer = ScriptedTimer::new(&state);
    timer.refuse_starts(0x103);
    let mut d = Dispatcher::new(&state, timer, FirmwareConfig::default());

    host.push_rx(b"!D?!V?");
    run_until_idle(&mut link, &mut parser, &frames, &mut d, &mut sink);

    assert_eq!(tx_string(&host), "!E;!V:1.1a;");
    assert!(!state.gate_enabled());
    assert_eq!(
        sink.events,
        [AppEvent::WindowFailed(TimerError::StartFailed(0x103))]
    );
}
