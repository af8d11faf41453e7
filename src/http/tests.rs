use std::future::Future;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use tokio::task::JoinSet;

use super::test_support::{ScriptedExecutor, get_request, recording_metrics, response};
use super::*;
use crate::args::ReplayArgs;

fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

/// Serves `responses.len()` connections, one canned response each.
fn spawn_canned_server(responses: Vec<&'static str>) -> Result<String, String> {
    let listener =
        TcpListener::bind("127.0.0.1:0").map_err(|err| format!("bind failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("local_addr failed: {}", err))?;
    std::thread::spawn(move || {
        for canned in responses {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut buffer = [0u8; 4096];
            if stream.read(&mut buffer).is_err() {
                continue;
            }
            if stream.write_all(canned.as_bytes()).is_err() {
                continue;
            }
            drop(stream.flush());
        }
    });
    Ok(format!("http://{}/", addr))
}

#[test]
fn response_size_counts_raw_headers_and_body() -> Result<(), String> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/html"));
    headers.insert(
        HeaderName::from_static("x-a"),
        HeaderValue::from_static("1"),
    );
    // (12 + 2) + (9 + 2) + (3 + 2) + (1 + 2) + 100
    let size = response_size(&headers, 100);
    if size != 133 {
        return Err(format!("expected 133 bytes, got {}", size));
    }
    if response_size(&HeaderMap::new(), 0) != 0 {
        return Err("empty response must size to zero".to_owned());
    }
    Ok(())
}

#[test]
fn classify_maps_results_to_outcomes() -> Result<(), String> {
    let cases = [
        (
            Ok(response(200, 10)),
            ReplayOutcome::Success {
                status: 200,
                bytes: Some(10),
            },
        ),
        (
            Ok(response(304, 0)),
            ReplayOutcome::Success {
                status: 304,
                bytes: Some(0),
            },
        ),
        (Ok(response(500, 10)), ReplayOutcome::Unexpected { status: 500 }),
        (Ok(response(404, 0)), ReplayOutcome::Unexpected { status: 404 }),
        (
            Err(ExecuteError::Status { status: 304 }),
            ReplayOutcome::Success {
                status: 304,
                bytes: None,
            },
        ),
        (
            Err(ExecuteError::Status { status: 503 }),
            ReplayOutcome::Failed { timed_out: false },
        ),
        (
            Err(ExecuteError::Timeout),
            ReplayOutcome::Failed { timed_out: true },
        ),
        (
            Err(ExecuteError::Transport {
                message: "connection refused".to_owned(),
            }),
            ReplayOutcome::Failed { timed_out: false },
        ),
    ];
    for (result, expected) in cases {
        let description = format!("{:?}", result);
        let outcome = classify(result);
        if outcome != expected {
            return Err(format!(
                "{} classified as {:?}, expected {:?}",
                description, outcome, expected
            ));
        }
    }
    Ok(())
}

#[test]
fn not_modified_error_counts_as_request_without_bytes() -> Result<(), String> {
    run_async_test(async {
        let (metrics, _sink) = recording_metrics();
        let executor = Arc::new(ScriptedExecutor::new(|_request| {
            Err(ExecuteError::Status { status: 304 })
        }));
        let replayer = RequestReplayer::new(executor, 4, Duration::ZERO, metrics.clone());
        let request = get_request("http://a.test/cached.css")?;

        let outcome = replayer.replay(&request).await;
        if outcome
            != (ReplayOutcome::Success {
                status: 304,
                bytes: None,
            })
        {
            return Err(format!("unexpected outcome: {:?}", outcome));
        }
        let buckets = metrics.buckets();
        let bucket = buckets.last().ok_or("missing bucket")?;
        if bucket.requests != 1 || bucket.errors != 0 || bucket.bytes != 0 {
            return Err(format!("unexpected bucket: {:?}", bucket));
        }
        Ok(())
    })
}

#[test]
fn replayer_records_each_outcome_class() -> Result<(), String> {
    run_async_test(async {
        let (metrics, _sink) = recording_metrics();
        let executor = Arc::new(ScriptedExecutor::new(|request| {
            match request.url.path() {
                "/ok" => Ok(response(200, 2048)),
                "/missing" => Ok(response(404, 10)),
                _ => Err(ExecuteError::Timeout),
            }
        }));
        let replayer = RequestReplayer::new(executor, 4, Duration::ZERO, metrics.clone());

        for url in ["http://a.test/ok", "http://a.test/missing", "http://a.test/slow"] {
            replayer.replay(&get_request(url)?).await;
        }

        let buckets = metrics.buckets();
        let bucket = buckets.last().ok_or("missing bucket")?;
        if bucket.requests != 1
            || bucket.errors != 1
            || bucket.unexpected != 1
            || bucket.bytes != 2048
        {
            return Err(format!("unexpected bucket: {:?}", bucket));
        }
        Ok(())
    })
}

#[test]
fn socket_cap_bounds_requests_in_flight() -> Result<(), String> {
    run_async_test(async {
        let (metrics, _sink) = recording_metrics();
        let executor =
            Arc::new(ScriptedExecutor::always_ok(1).with_delay(Duration::from_millis(20)));
        let replayer = Arc::new(RequestReplayer::new(
            executor.clone(),
            2,
            Duration::ZERO,
            metrics,
        ));

        let mut replays = JoinSet::new();
        for index in 0..10 {
            let replayer = replayer.clone();
            let request = get_request(&format!("http://a.test/{}", index))?;
            replays.spawn(async move { replayer.replay(&request).await });
        }
        while let Some(joined) = replays.join_next().await {
            joined.map_err(|err| format!("replay task failed: {}", err))?;
        }

        if executor.calls() != 10 {
            return Err(format!("expected 10 calls, got {}", executor.calls()));
        }
        if executor.max_in_flight() > 2 {
            return Err(format!(
                "socket cap exceeded: {} in flight",
                executor.max_in_flight()
            ));
        }
        Ok(())
    })
}

#[test]
fn random_wait_delays_but_completes() -> Result<(), String> {
    run_async_test(async {
        let (metrics, _sink) = recording_metrics();
        let executor = Arc::new(ScriptedExecutor::always_ok(0));
        let replayer =
            RequestReplayer::new(executor, 1, Duration::from_millis(5), metrics.clone());
        for _ in 0..5 {
            replayer.replay(&get_request("http://a.test/")?).await;
        }
        let total: u64 = metrics.buckets().iter().map(|bucket| bucket.requests).sum();
        if total != 5 {
            return Err(format!("expected 5 requests, got {}", total));
        }
        Ok(())
    })
}

#[test]
fn reqwest_executor_drains_body_and_reports_status() -> Result<(), String> {
    run_async_test(async {
        let base = spawn_canned_server(vec![
            "HTTP/1.1 200 OK\r\nContent-Length: 5\r\nConnection: close\r\n\r\nhello",
            "HTTP/1.1 404 Not Found\r\nContent-Length: 4\r\nConnection: close\r\n\r\nnope",
        ])?;
        let args = ReplayArgs::try_parse_from(["harstorm", "--redirect", "0"])
            .map_err(|err| err.to_string())?;
        let client = build_client(&args).map_err(|err| err.to_string())?;
        let executor = ReqwestExecutor::new(client);
        let request = get_request(&base)?;

        let first = executor
            .execute(&request)
            .await
            .map_err(|err| format!("first request failed: {}", err))?;
        if first.status != 200 || first.body_len != 5 {
            return Err(format!("unexpected response: {:?}", first));
        }
        let expected = response_size(&first.headers, 5);
        if classify(Ok(first))
            != (ReplayOutcome::Success {
                status: 200,
                bytes: Some(expected),
            })
        {
            return Err("200 response not classified as success".to_owned());
        }

        let second = executor
            .execute(&request)
            .await
            .map_err(|err| format!("second request failed: {}", err))?;
        if classify(Ok(second)) != (ReplayOutcome::Unexpected { status: 404 }) {
            return Err("404 response not classified as unexpected".to_owned());
        }
        Ok(())
    })
}

#[test]
fn reqwest_executor_reports_connection_failure() -> Result<(), String> {
    run_async_test(async {
        let listener =
            TcpListener::bind("127.0.0.1:0").map_err(|err| format!("bind failed: {}", err))?;
        let addr = listener
            .local_addr()
            .map_err(|err| format!("local_addr failed: {}", err))?;
        drop(listener);

        let args = ReplayArgs::try_parse_from(["harstorm"]).map_err(|err| err.to_string())?;
        let client = build_client(&args).map_err(|err| err.to_string())?;
        let executor = ReqwestExecutor::new(client);
        let request = get_request(&format!("http://{}/", addr))?;
        match executor.execute(&request).await {
            Err(ExecuteError::Transport { .. } | ExecuteError::Timeout) => Ok(()),
            other => Err(format!("expected a transport failure, got {:?}", other)),
        }
    })
}
