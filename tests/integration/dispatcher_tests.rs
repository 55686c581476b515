//! Integration tests for the frame → Dispatcher → counter core pipeline.

use crate::mock_hw::{RecordingSink, ScriptedTimer, TimerCall};

use coincidence_counter::app::dispatcher::Dispatcher;
use coincidence_counter::app::events::AppEvent;
use coincidence_counter::config::FirmwareConfig;
use coincidence_counter::counter::{Channel, ChannelCounts, CounterState};
use coincidence_counter::protocol::{CommandFrame, FrameParser};
use coincidence_counter::ProtocolError;

fn frame(s: &str) -> CommandFrame {
    let mut parser = FrameParser::new();
    let mut out = None;
    parser.feed_all(s.as_bytes(), |f| out = Some(f));
    out.expect("test input must contain a complete frame")
}

fn ask<T: coincidence_counter::app::ports::WindowTimer>(
    d: &mut Dispatcher<'_, T>,
    sink: &mut RecordingSink,
    cmd: &str,
) -> String {
    d.handle(&frame(cmd), sink).as_str().to_owned()
}

// ── D ─────────────────────────────────────────────────────────

#[test]
fn fresh_data_request_reports_zero_counts() {
    let state = CounterState::default();
    let mut d = Dispatcher::new(&state, ScriptedTimer::new(&state), FirmwareConfig::default());
    let mut sink = RecordingSink::new();

    assert_eq!(ask(&mut d, &mut sink, "!D?"), "!D:0:0:0:0:0:0;");
    assert_eq!(d.timer().armed_periods(), [10]);
}

#[test]
fn data_reports_each_channel_in_wire_order() {
    let state = CounterState::default();
    let mut timer = ScriptedTimer::new(&state);
    timer.queue_window(&[
        (Channel::A, 120),
        (Channel::B, 98),
        (Channel::C, 77),
        (Channel::AB, 5),
        (Channel::AC, 3),
        (Channel::ABC, 1),
    ]);
    let mut d = Dispatcher::new(&state, timer, FirmwareConfig::default());
    let mut sink = RecordingSink::new();

    assert_eq!(ask(&mut d, &mut sink, "!D?"), "!D:120:98:77:5:3:1;");
    assert_eq!(
        sink.events,
        [AppEvent::WindowCompleted {
            period_ms: 10,
            counts: ChannelCounts::from_array([120, 98, 77, 5, 3, 1]),
        }]
    );
}

#[test]
fn consecutive_windows_do_not_accumulate() {
    let state = CounterState::default();
    let mut timer = ScriptedTimer::new(&state);
    timer.queue_window(&[(Channel::A, 4)]);
    timer.queue_window(&[(Channel::B, 2)]);
    let mut d = Dispatcher::new(&state, timer, FirmwareConfig::default());
    let mut sink = RecordingSink::new();

    assert_eq!(ask(&mut d, &mut sink, "!D?"), "!D:4:0:0:0:0:0;");
    assert_eq!(ask(&mut d, &mut sink, "!D?"), "!D:0:2:0:0:0:0;");
}

#[test]
fn edges_between_windows_are_discarded() {
    let state = CounterState::default();
    let mut d = Dispatcher::new(&state, ScriptedTimer::new(&state), FirmwareConfig::default());
    let mut sink = RecordingSink::new();

    ask(&mut d, &mut sink, "!D?");
    // Gate stays open after the snapshot; these land in the live counters.
    state.record_edge(Channel::C);
    state.record_edge(Channel::C);
    assert_eq!(ask(&mut d, &mut sink, "!D?"), "!D:0:0:0:0:0:0;");
}

// ── T / V ─────────────────────────────────────────────────────

#[test]
fn set_period_then_version() {
    let state = CounterState::default();
    let mut d = Dispatcher::new(&state, ScriptedTimer::new(&state), FirmwareConfig::default());
    let mut sink = RecordingSink::new();

    assert_eq!(ask(&mut d, &mut sink, "!T:250?"), "!T:250;");
    assert_eq!(ask(&mut d, &mut sink, "!V?"), "!V:1.1a;");
    assert_eq!(d.period_ms(), 250);

    ask(&mut d, &mut sink, "!D?");
    assert_eq!(d.timer().armed_periods(), [250]);
    assert_eq!(sink.events[0], AppEvent::PeriodChanged { from_ms: 10, to_ms: 250 });
}

#[test]
fn period_bounds_are_enforced() {
    let state = CounterState::default();
    let mut d = Dispatcher::new(&state, ScriptedTimer::new(&state), FirmwareConfig::default());
    let mut sink = RecordingSink::new();

    assert_eq!(ask(&mut d, &mut sink, "!T:1?"), "!T:1;");
    assert_eq!(ask(&mut d, &mut sink, "!T:3600000?"), "!T:3600000;");
    assert_eq!(ask(&mut d, &mut sink, "!T:3600001?"), "!E;");
    assert_eq!(ask(&mut d, &mut sink, "!T:0?"), "!E;");
    assert_eq!(d.period_ms(), 3_600_000);
}

#[test]
fn setting_the_same_period_emits_no_change_event() {
    let state = CounterState::default();
    let mut d = Dispatcher::new(&state, ScriptedTimer::new(&state), FirmwareConfig::default());
    let mut sink = RecordingSink::new();

    assert_eq!(ask(&mut d, &mut sink, "!T:10?"), "!T:10;");
    assert!(sink.events.is_empty());
}

// ── Errors ────────────────────────────────────────────────────

#[test]
fn malformed_commands_answer_error_and_change_nothing() {
    let state = CounterState::default();
    let mut d = Dispatcher::new(&state, ScriptedTimer::new(&state), FirmwareConfig::default());
    let mut sink = RecordingSink::new();
    ask(&mut d, &mut sink, "!T:42?");
    sink.events.clear();

    for cmd in ["!X?", "!?", "!T?", "!T:?", "!T:12a?", "!T:-5?", "!DX?", "!V1?", "!d?"] {
        assert_eq!(ask(&mut d, &mut sink, cmd), "!E;", "{cmd}");
    }

    assert_eq!(d.period_ms(), 42);
    assert!(!state.gate_enabled());
    assert!(d.timer().calls.is_empty());
    assert_eq!(sink.rejections(), 9);
    assert_eq!(
        sink.events[0],
        AppEvent::CommandRejected(ProtocolError::UnknownVerb(b'X'))
    );
}

#[test]
fn overlong_frame_is_rejected() {
    let state = CounterState::default();
    let mut d = Dispatcher::new(&state, ScriptedTimer::new(&state), FirmwareConfig::default());
    let mut sink = RecordingSink::new();

    assert_eq!(ask(&mut d, &mut sink, "!T:000000000000000000250?"), "!E;");
    assert_eq!(d.period_ms(), 10);
    assert_eq!(
        sink.events,
        [AppEvent::CommandRejected(ProtocolError::Truncated)]
    );
}

// ── S ─────────────────────────────────────────────────────────

#[test]
fn stop_then_data_has_no_residue() {
    let state = CounterState::default();
    let mut d = Dispatcher::new(&state, ScriptedTimer::new(&state), FirmwareConfig::default());
    let mut sink = RecordingSink::new();

    state.enable_all();
    for _ in 0..7 {
        state.record_edge(Channel::AB);
    }

    assert_eq!(ask(&mut d, &mut sink, "!S?"), "!E;");
    assert!(!state.gate_enabled());
    assert!(!state.record_edge(Channel::AB), "gate closed after stop");
    assert_eq!(d.timer().calls, [TimerCall::Cancel]);

    assert_eq!(ask(&mut d, &mut sink, "!D?"), "!D:0:0:0:0:0:0;");
}

#[test]
fn stop_is_not_counted_as_rejection() {
    let state = CounterState::default();
    let mut d = Dispatcher::new(&state, ScriptedTimer::new(&state), FirmwareConfig::default());
    let mut sink = RecordingSink::new();

    ask(&mut d, &mut sink, "!S?");
    assert_eq!(sink.rejections(), 0);
    assert_eq!(
        sink.events,
        [AppEvent::AcquisitionStopped { window_pending: false }]
    );
}
