use std::ffi::OsString;

use super::ignores_test_env;

#[test]
fn warns_only_when_test_is_set_without_tests() -> Result<(), String> {
    let set = OsString::from("5");
    let cases = [
        (None, None, false),
        (Some(&set), None, false),
        (Some(&set), Some(&set), false),
        (None, Some(&set), true),
    ];
    for (tests, test, expected) in cases {
        if ignores_test_env(tests, test) != expected {
            return Err(format!(
                "TESTS={:?} TEST={:?} expected {}",
                tests, test, expected
            ));
        }
    }
    Ok(())
}
