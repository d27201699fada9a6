//! The capture loop: keep `<directory>/frame.jpg` current.
//!
//! After a warm-up delay for the camera to settle exposure and white
//! balance, grabs one frame per cadence tick, downscales it to the maximum
//! width, and swaps it into the frame slot. A single failed grab ends the
//! loop; Ctrl-C ends it gracefully. The capture device is released on every
//! exit path.

use std::time::Duration;

use anyhow::Result;
use tracing::{error, info, warn};

use super::FrameSlot;
use crate::adapters::FrameSource;

/// Capture loop tuning. Fixed in the CLI; overridable in tests.
#[derive(Debug, Clone)]
pub struct CaptureOptions {
    /// Frames wider than this are downscaled, preserving aspect ratio
    pub max_width: u32,
    /// Delay before the first grab, letting auto-exposure converge
    pub warmup: Duration,
    /// Pause between grabs
    pub cadence: Duration,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            max_width: 512,
            warmup: Duration::from_secs(5),
            cadence: Duration::from_secs(1),
        }
    }
}

/// Run the capture loop until the source fails or an interrupt arrives.
///
/// Faults after startup are logged rather than propagated so that the
/// device release below the loop always runs.
pub async fn run_capture<S: FrameSource>(
    mut source: S,
    slot: &FrameSlot,
    opts: CaptureOptions,
) -> Result<()> {
    // Bridge Ctrl-C into something select!-able, as a oneshot
    let (stop_tx, mut stop_rx) = tokio::sync::oneshot::channel::<()>();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        let _ = stop_tx.send(());
    });

    info!("starting capture in {} seconds...", opts.warmup.as_secs());
    tokio::time::sleep(opts.warmup).await;
    info!("capturing to {}", slot.path().display());

    loop {
        match source.grab_jpeg(opts.max_width) {
            Ok(Some(jpeg)) => {
                if let Err(e) = slot.write(&jpeg) {
                    warn!("failed to write frame: {:#}", e);
                    break;
                }
            }
            Ok(None) => {
                // No retry on a failed read; one miss ends the loop
                error!("failed to capture frame");
                break;
            }
            Err(e) => {
                error!("capture error: {:#}", e);
                break;
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(opts.cadence) => {}
            _ = &mut stop_rx => {
                info!("closing...");
                break;
            }
        }
    }

    source.release();
    Ok(())
}
