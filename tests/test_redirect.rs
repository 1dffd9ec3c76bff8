//! Integration tests for channel redirection
//!
//! Tests feeding input, draining output, end-of-stream propagation, and the
//! concurrent patterns that avoid the full-channel deadlock

use tokio::io::{AsyncReadExt, AsyncWriteExt};

use procpipe::{HarnessConfig, HarnessError};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn echo_config() -> HarnessConfig {
    HarnessConfig::builder("cat")
        .redirect_stdin(true)
        .redirect_stdout(true)
        .build()
}

#[tokio::test]
async fn test_echo_round_trip() {
    init_logging();

    let mut child = echo_config().spawn().unwrap();
    child.write_input(b"ping\n").await.unwrap();
    child.close_input().await.unwrap();

    let output = child.drain_output().await.unwrap();
    assert_eq!(output, b"ping\n");

    let status = child.wait().await.unwrap();
    assert_eq!(status.code(), Some(0));
}

#[tokio::test]
async fn test_close_input_propagates_end_of_stream() {
    init_logging();

    // cat terminates only once it observes end-of-stream on its input, so a
    // clean exit here proves no stray write endpoint survived the spawn in
    // either process.
    let mut child = echo_config().spawn().unwrap();
    child.close_input().await.unwrap();
    // Idempotent.
    child.close_input().await.unwrap();

    let output = child.drain_output().await.unwrap();
    assert!(output.is_empty());
    assert!(child.wait().await.unwrap().success());
}

#[tokio::test]
async fn test_stdout_only_capture() {
    init_logging();

    let config = HarnessConfig::builder("sh")
        .args(["-c", "printf 'hello\\n'"])
        .redirect_stdout(true)
        .build();

    let mut child = config.spawn().unwrap();
    let output = child.drain_output().await.unwrap();
    assert_eq!(output, b"hello\n");
    assert!(child.wait().await.unwrap().success());
}

#[tokio::test]
async fn test_stdin_only_feed() {
    init_logging();

    let config = HarnessConfig::builder("sh")
        .args(["-c", "cat > /dev/null"])
        .redirect_stdin(true)
        .build();

    let mut child = config.spawn().unwrap();
    child.write_input(b"swallowed\n").await.unwrap();
    child.close_input().await.unwrap();
    assert!(child.wait().await.unwrap().success());
}

#[tokio::test]
async fn test_read_output_until_end_of_stream() {
    init_logging();

    let config = HarnessConfig::builder("sh")
        .args(["-c", "printf 'xyz'"])
        .redirect_stdout(true)
        .build();

    let mut child = config.spawn().unwrap();
    let mut collected = Vec::new();
    let mut buf = [0u8; 2];
    loop {
        let n = child.read_output(&mut buf).await.unwrap();
        if n == 0 {
            break;
        }
        collected.extend_from_slice(&buf[..n]);
    }
    assert_eq!(collected, b"xyz");
    assert!(child.wait().await.unwrap().success());
}

#[tokio::test]
async fn test_operations_on_unredirected_streams_fail() {
    init_logging();

    let mut child = HarnessConfig::new("true").spawn().unwrap();
    let write = child.write_input(b"x").await;
    assert!(matches!(write, Err(HarnessError::HandleClosed(_))));

    let drain = child.drain_output().await;
    assert!(matches!(drain, Err(HarnessError::HandleClosed(_))));

    assert!(child.take_input().is_none());
    assert!(child.take_output().is_none());
    assert!(child.wait().await.unwrap().success());
}

#[tokio::test]
async fn test_write_after_close_fails() {
    init_logging();

    let mut child = echo_config().spawn().unwrap();
    child.close_input().await.unwrap();

    let write = child.write_input(b"late\n").await;
    assert!(matches!(write, Err(HarnessError::HandleClosed(_))));

    let output = child.drain_output().await.unwrap();
    assert!(output.is_empty());
    assert!(child.wait().await.unwrap().success());
}

#[tokio::test]
async fn test_communicate_large_payload() {
    init_logging();

    // Comfortably larger than a pipe's internal buffering, so sequential
    // feed-then-drain would deadlock; communicate runs both directions
    // concurrently.
    let payload: Vec<u8> = b"0123456789abcdef"
        .iter()
        .copied()
        .cycle()
        .take(1024 * 1024)
        .collect();

    let mut child = echo_config().spawn().unwrap();
    let output = child.communicate(&payload).await.unwrap();
    assert_eq!(output.len(), payload.len());
    assert_eq!(output, payload);
    assert!(child.wait().await.unwrap().success());
}

#[tokio::test]
async fn test_communicate_without_input_channel() {
    init_logging();

    let config = HarnessConfig::builder("sh")
        .args(["-c", "printf 'no input needed\\n'"])
        .redirect_stdout(true)
        .build();

    let mut child = config.spawn().unwrap();
    let output = child.communicate(b"").await.unwrap();
    assert_eq!(output, b"no input needed\n");
    assert!(child.wait().await.unwrap().success());

    let mut child = config.spawn().unwrap();
    let err = child.communicate(b"unwanted").await.unwrap_err();
    assert!(matches!(err, HarnessError::HandleClosed(_)));
    child.wait().await.unwrap();
}

#[tokio::test]
async fn test_split_direction_tasks() {
    init_logging();

    let mut child = echo_config().spawn().unwrap();
    let mut input = child.take_input().expect("input endpoint");
    let mut output = child.take_output().expect("output endpoint");

    // One task per direction: the writer feeds and closes, while this task
    // drains to end-of-stream.
    let payload: Vec<u8> = b"abcdefgh".iter().copied().cycle().take(256 * 1024).collect();
    let expected = payload.clone();
    let writer = tokio::spawn(async move {
        input.write_all(&payload).await.unwrap();
        input.shutdown().await.unwrap();
    });

    let mut collected = Vec::new();
    output.read_to_end(&mut collected).await.unwrap();
    writer.await.unwrap();

    assert_eq!(collected, expected);

    // The handle no longer owns the endpoints.
    let drain = child.drain_output().await;
    assert!(matches!(drain, Err(HarnessError::HandleClosed(_))));

    assert!(child.wait().await.unwrap().success());
}

#[tokio::test]
async fn test_output_lines_stream() {
    init_logging();

    let config = HarnessConfig::builder("sh")
        .args(["-c", "printf 'alpha\\nbeta\\n'"])
        .redirect_stdout(true)
        .build();

    let mut child = config.spawn().unwrap();
    let mut lines = child.output_lines();

    assert_eq!(lines.recv().await.unwrap().unwrap(), "alpha");
    assert_eq!(lines.recv().await.unwrap().unwrap(), "beta");
    assert!(lines.recv().await.is_none());

    assert!(child.wait().await.unwrap().success());
}

#[tokio::test]
async fn test_output_lines_without_redirection() {
    init_logging();

    let mut child = HarnessConfig::new("true").spawn().unwrap();
    let mut lines = child.output_lines();
    let first = lines.recv().await.unwrap();
    assert!(matches!(first, Err(HarnessError::HandleClosed(_))));
    assert!(lines.recv().await.is_none());
    assert!(child.wait().await.unwrap().success());
}
