#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Some(host) = harstorm::fuzzing::extract_host_input(input) {
            debug_assert!(host.len() >= 2);
            debug_assert!(input.contains(host));
            debug_assert!(host.chars().all(|ch| ch.is_ascii_alphanumeric() || "-._".contains(ch)));
        }
    }
});
