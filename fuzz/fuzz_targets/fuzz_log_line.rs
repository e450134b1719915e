//! Fuzz target: `LogLine::parse`
//!
//! Feeds arbitrary text to the reading log parser and checks:
//! - No panics under any input (including non-ASCII timestamps)
//! - Anything accepted renders back to a line that parses to the same text
//! - Never more than `MAX_SENSORS` sensor pairs in an accepted line
//!
//! cargo fuzz run fuzz_log_line

#![no_main]

use habitat::sensors::MAX_SENSORS;
use habitat::storage::reading_log::LogLine;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(line) = LogLine::parse(text) else {
        return;
    };
    assert!(line.sensors.len() <= MAX_SENSORS);

    // Compare rendered text: NaN columns never compare equal as values.
    let rendered = line.to_string();
    let reparsed = LogLine::parse(&rendered).expect("rendered line must parse");
    assert_eq!(reparsed.to_string(), rendered);
});
