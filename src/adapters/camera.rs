//! USB webcam frame source backed by OpenCV.

use anyhow::{Context, Result};
use opencv::core::{Mat, Size, Vector};
use opencv::prelude::*;
use opencv::{imgcodecs, imgproc, videoio};
use tracing::info;

use super::FrameSource;

/// An opened capture device.
pub struct Webcam {
    capture: videoio::VideoCapture,
}

impl Webcam {
    /// Open the capture device at `index`. Fatal if the device cannot be
    /// opened.
    pub fn open(index: i32) -> Result<Self> {
        let capture = videoio::VideoCapture::new(index, videoio::CAP_ANY)
            .with_context(|| format!("Failed to create capture for device {}", index))?;

        let opened = capture
            .is_opened()
            .with_context(|| format!("Failed to query capture device {}", index))?;
        if !opened {
            anyhow::bail!("Cannot open webcam {}", index);
        }

        info!("opened capture device {}", index);
        Ok(Self { capture })
    }
}

impl FrameSource for Webcam {
    fn grab_jpeg(&mut self, max_width: u32) -> Result<Option<Vec<u8>>> {
        let mut frame = Mat::default();
        let got = self
            .capture
            .read(&mut frame)
            .context("Failed to read from capture device")?;

        if !got || frame.empty() {
            return Ok(None);
        }

        let size = frame.size().context("Failed to read frame dimensions")?;
        let scaled = match scaled_dimensions(size.width as u32, size.height as u32, max_width) {
            Some((w, h)) => {
                let mut resized = Mat::default();
                imgproc::resize(
                    &frame,
                    &mut resized,
                    Size::new(w as i32, h as i32),
                    0.0,
                    0.0,
                    imgproc::INTER_AREA,
                )
                .context("Failed to resize frame")?;
                resized
            }
            None => frame,
        };

        let mut buf = Vector::<u8>::new();
        imgcodecs::imencode(".jpg", &scaled, &mut buf, &Vector::new())
            .context("Failed to encode frame as JPEG")?;

        Ok(Some(buf.to_vec()))
    }

    fn release(&mut self) {
        self.capture.release().ok();
    }
}

/// Target dimensions for a frame wider than `max_width`, preserving aspect
/// ratio (height truncates). `None` means the frame fits and is left alone.
pub fn scaled_dimensions(width: u32, height: u32, max_width: u32) -> Option<(u32, u32)> {
    if width <= max_width {
        return None;
    }

    let ratio = max_width as f64 / width as f64;
    Some((max_width, (height as f64 * ratio) as u32))
}
