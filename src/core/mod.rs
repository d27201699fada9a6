//! Core pipeline logic.
//!
//! This module contains:
//! - FrameSlot: the single-slot file mailbox shared by the two loops
//! - Capture: the webcam capture loop
//! - Narrator: the per-prompt narration driver

pub mod capture;
pub mod narrator;
pub mod slot;

// Re-export commonly used types
pub use capture::{run_capture, CaptureOptions};
pub use narrator::Narrator;
pub use slot::{retry_busy, FrameError, FrameSlot, RetryError, RetryPolicy, FRAME_FILE_NAME};
