
use std::fs;

use tempfile::tempdir;

use support_http::{run_harstorm, spawn_http_server_or_skip, write_har};

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn failure(output: &std::process::Output) -> String {
    format!(
        "status: {:?}\nstdout: {}\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

#[test]
fn e2e_replays_in_scope_entries() -> Result<(), String> {
    let Some((url, server)) = spawn_http_server_or_skip()? else {
        return Ok(());
    };
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    write_har(&dir.path().join("capture.har"), &url)?;

    let output = run_harstorm(
        dir.path(),
        [
            "-f",
            "capture.har",
            "-c",
            "1",
            "-n",
            "2",
            "--max-random-wait",
            "0",
        ],
    )?;
    if !output.status.success() {
        return Err(failure(&output));
    }

    let stdout = stdout_of(&output);
    for expected in [
        "Final requests: 4 errors: 0 unexpected: 2",
        "Sessions completed: 2",
    ] {
        if !stdout.contains(expected) {
            return Err(format!("missing '{}' in:\n{}", expected, stdout));
        }
    }
    if server.hits() != 6 {
        return Err(format!("expected 6 requests served, got {}", server.hits()));
    }
    Ok(())
}

#[test]
fn e2e_config_file_sets_iterations() -> Result<(), String> {
    let Some((url, server)) = spawn_http_server_or_skip()? else {
        return Ok(());
    };
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    write_har(&dir.path().join("har.json"), &url)?;
    fs::write(
        dir.path().join("harstorm.toml"),
        "virtual_users = 1\ntests = 1\nmax_random_wait = 0\n",
    )
    .map_err(|err| format!("write config failed: {}", err))?;

    let output = run_harstorm(dir.path(), std::iter::empty::<&str>())?;
    if !output.status.success() {
        return Err(failure(&output));
    }
    let stdout = stdout_of(&output);
    if !stdout.contains("Sessions completed: 1") {
        return Err(format!("unexpected output:\n{}", stdout));
    }
    if server.hits() != 3 {
        return Err(format!("expected 3 requests served, got {}", server.hits()));
    }
    Ok(())
}

#[test]
fn e2e_missing_trace_fails() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let output = run_harstorm(dir.path(), ["-f", "absent.har"])?;
    if output.status.success() {
        return Err(format!("missing trace must fail:\n{}", failure(&output)));
    }
    Ok(())
}

#[test]
fn e2e_trace_without_scope_fails() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let content = r#"{ "log": {
        "pages": [{ "title": "https://a.test/" }],
        "entries": [{ "request": { "url": "https://b.test/x" }, "response": { "status": 200 } }]
    } }"#;
    fs::write(dir.path().join("har.json"), content)
        .map_err(|err| format!("write har failed: {}", err))?;

    let output = run_harstorm(dir.path(), ["--max-random-wait", "0"])?;
    if output.status.success() {
        return Err(format!("empty plan must fail:\n{}", failure(&output)));
    }
    Ok(())
}
