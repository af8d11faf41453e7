#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if harstorm::fuzzing::parse_duration_value_input(input).is_ok() {
            debug_assert!(input.trim().starts_with(|ch: char| ch.is_ascii_digit()));
        }
    }
});
