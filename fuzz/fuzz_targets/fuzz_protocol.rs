#![no_main]

//! Command text and frame parser fuzzer.
//!
//! Arbitrary bytes must never panic the parsers, and anything that parses
//! must survive a format and re-parse unchanged.

use std::io::Cursor;

use generals::protocol::{format_commands, parse_commands, read_frame};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = read_frame(&mut Cursor::new(data));

    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(commands) = parse_commands(text) {
        let again = parse_commands(&format_commands(&commands)).expect("formatted text parses");
        assert_eq!(again, commands);
    }
});
