//! Host command protocol: framing, grammar, responses, and the link.
//!
//! ```text
//!  rx_task: bytes ─▶ FrameParser ─▶ FRAME_CHANNEL ─▶ Command::parse ─▶ Dispatcher ─▶ Response
//! ```

pub mod channels;
pub mod command;
pub mod parser;
pub mod response;
pub mod rx_task;
pub mod transport;

pub use command::Command;
pub use parser::{CommandFrame, FrameParser, MAX_COMMAND_LEN, ParserState};
pub use response::{RESPONSE_CAPACITY, Response, ResponseBuf};
pub use transport::{Transport, WriteError};
