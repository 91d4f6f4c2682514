//! Server selection failures against an unreachable address are retried.

use std::time::{Duration, Instant};

use mongodb::error::ErrorKind;
use retail_bench::config::MongoConfig;
use retail_bench::docstore::connect;
use retail_bench::resilience::{RetryPolicy, Transient};

fn unreachable() -> MongoConfig {
    MongoConfig {
        uri: "mongodb://127.0.0.1:1/?directConnection=true".to_string(),
        server_selection_timeout_ms: 200,
        connect_timeout_ms: 200,
        ..MongoConfig::default()
    }
}

#[tokio::test]
async fn test_server_selection_timeout_is_retried() {
    let policy = RetryPolicy {
        max_attempts: 2,
        base_delay: Duration::from_millis(200),
        backoff: 2.0,
    };

    let started = Instant::now();
    let err = connect(&unreachable(), &policy).await.unwrap_err();
    let elapsed = started.elapsed();

    assert!(matches!(*err.kind, ErrorKind::ServerSelection { .. }), "{err}");
    assert!(err.is_transient());
    // two selection timeouts plus one backoff sleep
    assert!(elapsed >= Duration::from_millis(550), "{elapsed:?}");
}

#[tokio::test]
async fn test_single_attempt_does_not_sleep() {
    let started = Instant::now();
    let err = connect(&unreachable(), &RetryPolicy::no_retry()).await.unwrap_err();

    assert!(matches!(*err.kind, ErrorKind::ServerSelection { .. }), "{err}");
    assert!(started.elapsed() < Duration::from_millis(550));
}
