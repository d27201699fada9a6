//! Frame slot handoff tests: atomic overwrite and the missing-file path.

use reminisce::core::{FrameError, FrameSlot, RetryPolicy};

#[tokio::test]
async fn test_missing_file_fails_immediately() {
    let dir = tempfile::tempdir().unwrap();
    // Tight retry policy: if the missing file ever entered the busy-retry
    // path, this read would take ~100 backoffs
    let slot = FrameSlot::new(dir.path()).unwrap().with_policy(RetryPolicy {
        max_attempts: 100,
        backoff_ms: 1_000,
    });

    let start = std::time::Instant::now();
    let err = slot.read().await.unwrap_err();
    assert!(start.elapsed() < std::time::Duration::from_millis(500));

    match err {
        FrameError::Missing(path) => assert!(path.ends_with("frame.jpg")),
        other => panic!("expected Missing, got {:?}", other),
    }
}

#[tokio::test]
async fn test_write_then_read_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let slot = FrameSlot::new(dir.path()).unwrap();

    slot.write(b"jpeg-bytes-1").unwrap();
    assert_eq!(slot.read().await.unwrap(), b"jpeg-bytes-1");
}

#[tokio::test]
async fn test_overwrite_is_last_write_wins() {
    let dir = tempfile::tempdir().unwrap();
    let slot = FrameSlot::new(dir.path()).unwrap();

    slot.write(b"old frame").unwrap();
    slot.write(b"new frame").unwrap();

    assert_eq!(slot.read().await.unwrap(), b"new frame");

    // Exactly one frame file, no versions left behind
    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec!["frame.jpg"]);
}

#[test]
fn test_slot_creates_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");

    let slot = FrameSlot::new(&nested).unwrap();
    assert!(nested.is_dir());
    assert_eq!(slot.path(), nested.join("frame.jpg"));
}
