//! Mock adapters for integration tests.
//!
//! `ScriptedTimer` closes every window synchronously inside `arm`, after
//! injecting the edges queued for that window, so dispatcher tests run
//! without threads or sleeps.

use std::collections::VecDeque;

use coincidence_counter::app::events::AppEvent;
use coincidence_counter::app::ports::{EventSink, WindowTimer};
use coincidence_counter::counter::{Channel, CounterState};
use coincidence_counter::TimerError;

// ── Window timer ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCall {
    Arm(u32),
    Cancel,
}

pub struct ScriptedTimer<'s> {
    state: &'s CounterState,
    windows: VecDeque<Vec<(Channel, u32)>>,
    refuse_with: Option<i32>,
    pub calls: Vec<TimerCall>,
}

#[allow(dead_code)]
impl<'s> ScriptedTimer<'s> {
    pub fn new(state: &'s CounterState) -> Self {
        Self {
            state,
            windows: VecDeque::new(),
            refuse_with: None,
            calls: Vec::new(),
        }
    }

    /// Edges delivered during the next armed window.
    pub fn queue_window(&mut self, edges: &[(Channel, u32)]) {
        self.windows.push_back(edges.to_vec());
    }

    /// Every later `arm` fails with `rc` and schedules nothing.
    pub fn refuse_starts(&mut self, rc: i32) {
        self.refuse_with = Some(rc);
    }

    pub fn armed_periods(&self) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                TimerCall::Arm(ms) => Some(*ms),
                TimerCall::Cancel => None,
            })
            .collect()
    }
}

impl WindowTimer for ScriptedTimer<'_> {
    fn arm(&mut self, duration_ms: u32) -> Result<(), TimerError> {
        self.calls.push(TimerCall::Arm(duration_ms));
        if let Some(rc) = self.refuse_with {
            return Err(TimerError::StartFailed(rc));
        }
        for (ch, n) in self.windows.pop_front().unwrap_or_default() {
            for _ in 0..n {
                self.state.record_edge(ch);
            }
        }
        self.state.snapshot_and_reset();
        Ok(())
    }

    fn cancel(&mut self) {
        self.calls.push(TimerCall::Cancel);
    }

    fn is_armed(&self) -> bool {
        false
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejections(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::CommandRejected(_)))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
