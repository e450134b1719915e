//! Fuzz target: capture folder and log file name parsing
//!
//! The janitor parses every directory entry it finds on the volume, so
//! these parsers see whatever a user copied onto the stick.
//!
//! Invariants checked:
//! - No panics on any entry name
//! - An accepted name is canonical: formatting the parsed key gives the
//!   same name back
//!
//! cargo fuzz run fuzz_storage_names

#![no_main]

use habitat::storage::naming::NamingScheme;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let name = String::from_utf8_lossy(data);
    let scheme = NamingScheme::V1;

    if let Ok(hour) = scheme.parse_capture_dir_name(&name) {
        assert_eq!(scheme.capture_dir_name(hour), name);
    }
    if let Ok(day) = scheme.parse_log_file_name(&name) {
        assert_eq!(scheme.log_file_name(day), name);
    }
    if let Ok(at) = scheme.parse_log_timestamp(&name) {
        let _ = scheme.log_timestamp(at);
    }
});
