//! Command dispatcher: the hexagonal core.
//!
//! [`Dispatcher`] turns one completed frame into an action on the counting
//! core and a response string.  All I/O flows through port traits
//! injected at construction or call sites, so the whole command path is
//! testable with mock adapters.
//!
//! ```text
//!  CommandFrame ──▶ ┌──────────────────────────┐ ──▶ Response ──▶ Transport
//!                   │        Dispatcher        │
//!   WindowTimer ◀── │ CounterState · config    │ ──▶ EventSink
//!                   └──────────────────────────┘
//! ```
//!
//! `D` is the only blocking command: it suspends the command loop on the
//! ready signal for one full window.  Frames that arrive meanwhile wait in
//! the frame channel and are served afterwards, in order.

use futures_lite::future::block_on;
use log::{debug, info, warn};

use crate::config::FirmwareConfig;
use crate::counter::CounterState;
use crate::error::{Error, ProtocolError, Result};
use crate::protocol::{Command, CommandFrame, Response, ResponseBuf, Transport};

use super::events::AppEvent;
use super::ports::{EventSink, WindowTimer};

/// Maps host commands onto the counter core.
pub struct Dispatcher<'a, T: WindowTimer> {
    state: &'a CounterState,
    timer: T,
    config: FirmwareConfig,
}

impl<'a, T: WindowTimer> Dispatcher<'a, T> {
    /// Bind the dispatcher to the shared counter state and its window
    /// timer.  Applies the configured power-on sampling period.
    pub fn new(state: &'a CounterState, timer: T, config: FirmwareConfig) -> Self {
        state.set_period_ms(config.default_period_ms);
        Self {
            state,
            timer,
            config,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Write the boot banner and announce the initial state.
    pub fn start(&mut self, link: &mut impl Transport, sink: &mut impl EventSink) -> Result<()> {
        if !self.config.banner.is_empty() {
            link.write_all(self.config.banner.as_bytes())
                .map_err(|_| Error::Link)?;
        }
        let period_ms = self.state.period_ms();
        sink.emit(&AppEvent::Started { period_ms });
        info!("Dispatcher started (period={}ms, version={})", period_ms, self.config.version);
        Ok(())
    }

    // ── Command handling ──────────────────────────────────────

    /// Handle one frame and write the response to `link`.
    pub fn serve_frame(
        &mut self,
        frame: &CommandFrame,
        link: &mut impl Transport,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let response = self.handle(frame, sink);
        link.write_all(response.as_bytes()).map_err(|e| {
            warn!("TX: response write failed: {:?}", e);
            Error::Link
        })
    }

    /// Handle one frame and return the encoded response.  Every failure
    /// becomes `!E;` with no change to counters or sampling period.
    pub fn handle(&mut self, frame: &CommandFrame, sink: &mut impl EventSink) -> ResponseBuf {
        let command = Command::parse(frame).and_then(|cmd| self.check(cmd));
        match command {
            Ok(cmd) => {
                debug!("CMD | {}", cmd.verb() as char);
                self.execute(cmd, sink).encode()
            }
            Err(e) => {
                warn!("CMD | rejected: {}", e);
                sink.emit(&AppEvent::CommandRejected(e));
                Response::Error.encode()
            }
        }
    }

    fn check(&self, cmd: Command) -> core::result::Result<Command, ProtocolError> {
        match cmd {
            Command::SetPeriod(ms) if !self.config.period_in_range(ms) => {
                Err(ProtocolError::PeriodOutOfRange(ms))
            }
            other => Ok(other),
        }
    }

    fn execute(&mut self, cmd: Command, sink: &mut impl EventSink) -> Response<'_> {
        match cmd {
            Command::Data => {
                let period_ms = self.state.period_ms();
                self.state.begin_window();
                if let Err(e) = self.timer.arm(period_ms) {
                    self.state.disable_all();
                    sink.emit(&AppEvent::WindowFailed(e));
                    return Response::Error;
                }
                block_on(self.state.wait_ready());
                let counts = self.state.backup();
                sink.emit(&AppEvent::WindowCompleted { period_ms, counts });
                Response::Data(counts)
            }
            Command::SetPeriod(to_ms) => {
                let from_ms = self.state.period_ms();
                self.state.set_period_ms(to_ms);
                if from_ms != to_ms {
                    sink.emit(&AppEvent::PeriodChanged { from_ms, to_ms });
                }
                Response::Period(to_ms)
            }
            Command::Version => Response::Version(self.config.version.as_str()),
            Command::Stop => {
                let window_pending = self.timer.is_armed();
                self.timer.cancel();
                self.state.disable_all();
                sink.emit(&AppEvent::AcquisitionStopped { window_pending });
                if self.config.stop_acknowledges {
                    Response::Stopped
                } else {
                    // Historical firmware answers a stop with the error reply;
                    // hosts in the field expect it.
                    Response::Error
                }
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn period_ms(&self) -> u32 {
        self.state.period_ms()
    }

    pub fn config(&self) -> &FirmwareConfig {
        &self.config
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }
}
