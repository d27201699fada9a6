//! Adapter interfaces for external collaborators.
//!
//! Everything nontrivial is delegated: frame acquisition to the webcam
//! driver, narration to a vision-capable chat API, speech to a voice
//! synthesis API, playback to an external player process. Each sits behind
//! a small trait so the narration driver can be exercised with fakes.

pub mod camera;
pub mod elevenlabs;
pub mod openai;
pub mod player;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::Script;

// Re-export the concrete adapters
pub use camera::{scaled_dimensions, Webcam};
pub use elevenlabs::{ElevenLabsSynth, VoiceSettings};
pub use openai::OpenAiVision;
pub use player::ExternalPlayer;

/// Source of raw frames, already encoded as JPEG.
pub trait FrameSource {
    /// Grab one frame, downscaled to at most `max_width` pixels wide.
    /// `None` means the device produced no frame.
    fn grab_jpeg(&mut self, max_width: u32) -> Result<Option<Vec<u8>>>;

    /// Release the underlying device. Called on every capture-loop exit path.
    fn release(&mut self);
}

/// Vision-capable text generation.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Narrate the image: system instruction, accumulated script, then a new
    /// user turn combining `prompt` with the base64 JPEG.
    async fn narrate(
        &self,
        system: &str,
        script: &Script,
        prompt: &str,
        image_b64: &str,
    ) -> Result<String>;
}

/// Text to speech.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Convert text to a complete audio byte stream (MP3).
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}

/// Audio playback of a complete in-memory buffer.
#[async_trait]
pub trait Playback: Send + Sync {
    /// Play the buffer, returning only once playback has finished.
    async fn play(&self, audio: &[u8]) -> Result<()>;
}
