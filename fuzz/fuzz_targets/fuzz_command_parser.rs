//! Fuzz target: `FrameParser::feed` → `Command::parse` → `Response::encode`
//!
//! Drives arbitrary byte streams through the framing and grammar layers
//! and asserts that nothing panics, frames stay within the command buffer,
//! and every response is a single well-formed `!...;` string.
//!
//! cargo fuzz run fuzz_command_parser

#![no_main]

use coincidence_counter::counter::ChannelCounts;
use coincidence_counter::protocol::{Command, FrameParser, MAX_COMMAND_LEN, Response};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut parser = FrameParser::new();

    parser.feed_all(data, |frame| {
        assert!(frame.as_bytes().len() <= MAX_COMMAND_LEN, "frame exceeds buffer");

        let response = match Command::parse(&frame) {
            Ok(Command::Data) => Response::Data(ChannelCounts::from_array([u32::MAX; 6])),
            Ok(Command::SetPeriod(ms)) => Response::Period(ms),
            Ok(Command::Version) => Response::Version("1.1a"),
            Ok(Command::Stop) => Response::Stopped,
            Err(_) => Response::Error,
        };
        let text = response.encode();
        assert!(text.starts_with('!') && text.ends_with(';'));
        assert_eq!(text.matches(';').count(), 1);
    });

    // After a reset the parser must accept bytes cleanly again.
    parser.reset();
    parser.feed_all(data, |_| {});
});
