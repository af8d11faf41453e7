#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(plan) = harstorm::fuzzing::replay_plan_from_json(data) {
        debug_assert!(!plan.hosts.is_empty());
        debug_assert!(!plan.requests.is_empty());
    }
});
