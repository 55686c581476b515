//! Receive-context → command-loop hand-off.
//!
//! Uses an `embassy-sync` bounded channel so the byte-reception context can
//! hand completed frames to the synchronous command loop without heap
//! allocation or blocking.
//!
//! ```text
//! ┌──────────────┐ CommandFrame ┌──────────────┐
//! │ UART receive │────────────▶│ Command loop │
//! │ (FrameParser)│              │ (Dispatcher) │
//! └──────────────┘              └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::warn;

use super::parser::CommandFrame;

/// Frames that may wait while a `D` window blocks the command loop.
pub const FRAME_DEPTH: usize = 4;

pub type FrameChannel = Channel<CriticalSectionRawMutex, CommandFrame, FRAME_DEPTH>;

/// Completed command frames: receive context → command loop.
pub static FRAME_CHANNEL: FrameChannel = Channel::new();

/// Queue a completed frame.  Never blocks; a full queue drops the frame,
/// which the host sees as a missing response.
pub fn submit_frame(channel: &FrameChannel, frame: CommandFrame) -> bool {
    match channel.try_send(frame) {
        Ok(()) => true,
        Err(_) => {
            warn!("RX: frame queue full, dropping command");
            false
        }
    }
}

/// Next queued frame, if any.
pub fn try_recv_frame(channel: &FrameChannel) -> Option<CommandFrame> {
    channel.try_receive().ok()
}
