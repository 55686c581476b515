//! Application core: command logic over the counter, zero I/O.
//!
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without a board.

pub mod dispatcher;
pub mod events;
pub mod ports;
