//! Serial receive task: bytes in, completed frames out.
//!
//! Runs on its own thread so framing keeps going while a `D` command
//! holds the command loop for a whole window.  Each byte goes through the
//! [`FrameParser`]; completed frames land in the frame channel.
//!
//! ```text
//!   Transport::read ──▶ FrameParser::feed ──▶ submit_frame ──▶ FRAME_CHANNEL
//! ```

use core::time::Duration;

use log::{info, warn};

use super::channels::{FrameChannel, submit_frame};
use super::parser::FrameParser;
use super::transport::Transport;
use crate::drivers::task_pin::{self, Core};
use crate::error::InitError;

const READ_CHUNK: usize = 32;

/// Read whatever is pending on `link` and frame it.
/// Returns the number of bytes consumed; 0 means the link was idle.
pub fn pump_once<T: Transport>(
    link: &mut T,
    parser: &mut FrameParser,
    frames: &FrameChannel,
) -> usize {
    let mut buf = [0u8; READ_CHUNK];
    match link.read(&mut buf) {
        Ok(n) => {
            parser.feed_all(&buf[..n], |frame| {
                submit_frame(frames, frame);
            });
            n
        }
        Err(e) => {
            warn!("RX: read failed: {:?}", e);
            parser.reset();
            0
        }
    }
}

fn run_rx_loop<T: Transport>(mut link: T, frames: &'static FrameChannel, poll_interval_ms: u32) {
    let mut parser = FrameParser::new();
    let idle = Duration::from_millis(u64::from(poll_interval_ms));
    info!("RX task started (poll={}ms)", poll_interval_ms);
    loop {
        if pump_once(&mut link, &mut parser, frames) == 0 {
            std::thread::sleep(idle);
        }
    }
}

/// Spawn the receive task pinned to Core 0 (PRO_CPU).
///
/// Priority sits above the command loop so incoming bytes are framed
/// promptly even while the loop is busy.
pub fn spawn<T>(
    link: T,
    frames: &'static FrameChannel,
    poll_interval_ms: u32,
) -> Result<std::thread::JoinHandle<()>, InitError>
where
    T: Transport + Send + 'static,
{
    task_pin::spawn_on_core(Core::Pro, 12, 4, "uart-rx\0", move || {
        run_rx_loop(link, frames, poll_interval_ms);
    })
}
