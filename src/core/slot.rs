//! Single-slot frame mailbox.
//!
//! The capture loop is the sole writer and the narration loop the sole
//! reader of one fixed path, `<directory>/frame.jpg`. Writes go through a
//! temp file in the same directory and are renamed into place, so a reader
//! never sees a half-written frame. Reads still tolerate the file handle
//! being held by a concurrent writer: that failure class is retried with a
//! fixed backoff up to a bounded attempt count, then surfaced. A file that
//! has never appeared at all is a distinct, immediately-fatal error.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Fixed name of the frame file inside the slot directory.
pub const FRAME_FILE_NAME: &str = "frame.jpg";

/// Failure reading the frame slot.
#[derive(Debug, Error)]
pub enum FrameError {
    /// The frame file has never been created. Signals the capture loop is
    /// not running, not a transient race.
    #[error("no frame at {0}; is the capture loop running?")]
    Missing(PathBuf),

    /// The frame file stayed locked by a concurrent writer for the whole
    /// retry budget.
    #[error("frame file {path} still busy after {attempts} attempts")]
    Busy { path: PathBuf, attempts: u32 },

    /// Any other I/O failure. Not retried.
    #[error("failed to read frame file")]
    Io(#[from] io::Error),
}

/// Retry policy for busy-class read failures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including first try)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed delay between attempts in milliseconds
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

fn default_max_attempts() -> u32 {
    600
}
fn default_backoff_ms() -> u64 {
    100
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

impl RetryPolicy {
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

/// Outcome of [`retry_busy`] when no attempt succeeded.
#[derive(Debug)]
pub enum RetryError {
    /// Every attempt failed with a busy-class error
    Exhausted { attempts: u32, last: io::Error },
    /// An attempt failed with a non-busy error; no further attempts made
    Fatal(io::Error),
}

/// Whether an I/O error means "the file handle is held by another process"
/// as opposed to a real failure. Sharing violations surface as
/// `PermissionDenied` on Windows, `WouldBlock` elsewhere.
fn is_busy(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::PermissionDenied | io::ErrorKind::WouldBlock
    )
}

/// Run `attempt` until it succeeds, retrying busy-class failures with the
/// policy's fixed backoff. Non-busy failures abort immediately.
pub async fn retry_busy<T, F>(policy: &RetryPolicy, mut attempt: F) -> Result<T, RetryError>
where
    F: FnMut() -> io::Result<T>,
{
    let mut attempts = 0u32;

    loop {
        attempts += 1;

        match attempt() {
            Ok(value) => return Ok(value),
            Err(e) if is_busy(&e) => {
                if attempts >= policy.max_attempts {
                    return Err(RetryError::Exhausted { attempts, last: e });
                }
                debug!("frame file busy (attempt {}), backing off", attempts);
                tokio::time::sleep(policy.backoff()).await;
            }
            Err(e) => return Err(RetryError::Fatal(e)),
        }
    }
}

/// The shared frame file, `<directory>/frame.jpg`.
#[derive(Debug, Clone)]
pub struct FrameSlot {
    path: PathBuf,
    policy: RetryPolicy,
}

impl FrameSlot {
    /// Create a slot in `directory`, creating the directory if absent.
    pub fn new(directory: &Path) -> Result<Self> {
        std::fs::create_dir_all(directory)
            .with_context(|| format!("Failed to create directory: {}", directory.display()))?;

        Ok(Self {
            path: directory.join(FRAME_FILE_NAME),
            policy: RetryPolicy::default(),
        })
    }

    /// Override the read retry policy
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Path of the frame file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the slot with a new frame. The bytes land in a temp file in
    /// the same directory and are renamed over the slot path, so the swap is
    /// atomic and last-write-wins.
    pub fn write(&self, bytes: &[u8]) -> Result<()> {
        let dir = self
            .path
            .parent()
            .context("Frame path has no parent directory")?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .context("Failed to create temp file for frame write")?;
        tmp.write_all(bytes).context("Failed to write frame")?;
        tmp.persist(&self.path)
            .with_context(|| format!("Failed to persist frame to {}", self.path.display()))?;

        Ok(())
    }

    /// Read the current frame in full.
    ///
    /// A file that does not exist fails immediately with
    /// [`FrameError::Missing`], never entering the retry path. A busy-class
    /// failure is retried per the slot's [`RetryPolicy`] and surfaced as
    /// [`FrameError::Busy`] only when the budget is exhausted.
    pub async fn read(&self) -> Result<Vec<u8>, FrameError> {
        if !self.path.exists() {
            return Err(FrameError::Missing(self.path.clone()));
        }

        retry_busy(&self.policy, || std::fs::read(&self.path))
            .await
            .map_err(|e| match e {
                RetryError::Exhausted { attempts, .. } => FrameError::Busy {
                    path: self.path.clone(),
                    attempts,
                },
                RetryError::Fatal(io) => FrameError::Io(io),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            backoff_ms: 1,
        }
    }

    fn busy_err() -> io::Error {
        io::Error::new(io::ErrorKind::PermissionDenied, "sharing violation")
    }

    #[tokio::test]
    async fn test_retry_converges_after_transient_busy() {
        let mut failures_left = 3;
        let mut calls = 0u32;

        let result = retry_busy(&fast_policy(10), || {
            calls += 1;
            if failures_left > 0 {
                failures_left -= 1;
                Err(busy_err())
            } else {
                Ok(vec![1u8, 2, 3])
            }
        })
        .await;

        assert_eq!(result.unwrap(), vec![1, 2, 3]);
        // 3 busy failures plus the successful attempt, no extra retries
        assert_eq!(calls, 4);
    }

    #[tokio::test]
    async fn test_retry_surfaces_timeout_after_budget() {
        let result: Result<(), _> = retry_busy(&fast_policy(5), || Err(busy_err())).await;

        match result {
            Err(RetryError::Exhausted { attempts, .. }) => assert_eq!(attempts, 5),
            other => panic!("expected exhausted retry, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_busy_error_aborts_immediately() {
        let mut calls = 0u32;

        let result: Result<(), _> = retry_busy(&fast_policy(5), || {
            calls += 1;
            Err(io::Error::new(io::ErrorKind::InvalidData, "corrupt"))
        })
        .await;

        assert!(matches!(result, Err(RetryError::Fatal(_))));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_policy_defaults() {
        let policy: RetryPolicy = serde_json::from_str("{}").unwrap();
        assert_eq!(policy.max_attempts, 600);
        assert_eq!(policy.backoff_ms, 100);
    }
}
