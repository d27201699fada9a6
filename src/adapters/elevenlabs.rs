//! ElevenLabs text-to-speech adapter.
//!
//! Converts narration text to an MP3 byte stream for one fixed voice, with
//! the caller-configured voice-shaping parameters.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::SpeechSynthesizer;

const API_BASE: &str = "https://api.elevenlabs.io/v1";
const OUTPUT_FORMAT: &str = "mp3_22050_32";

/// Voice-shaping parameters, all in [0, 1] except the boost flag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    pub use_speaker_boost: bool,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.75,
            style: 0.0,
            use_speaker_boost: true,
        }
    }
}

impl VoiceSettings {
    /// Reject parameters outside [0, 1]
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("stability", self.stability),
            ("similarity", self.similarity_boost),
            ("style", self.style),
        ] {
            if !(0.0..=1.0).contains(&value) {
                anyhow::bail!("--{} must be between 0 and 1 (got {})", name, value);
            }
        }
        Ok(())
    }
}

/// ElevenLabs client bound to one voice
pub struct ElevenLabsSynth {
    api_key: String,
    voice_id: String,
    model: String,
    settings: VoiceSettings,
    client: reqwest::Client,
}

impl ElevenLabsSynth {
    pub fn new(api_key: String, voice_id: String, model: String, settings: VoiceSettings) -> Self {
        Self {
            api_key,
            voice_id,
            model,
            settings,
            client: reqwest::Client::new(),
        }
    }

    /// Build API URL for the bound voice
    fn api_url(&self) -> String {
        format!("{}/text-to-speech/{}", API_BASE, self.voice_id)
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsSynth {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .post(self.api_url())
            .query(&[
                ("optimize_streaming_latency", "0"),
                ("output_format", OUTPUT_FORMAT),
            ])
            .header("xi-api-key", &self.api_key)
            .json(&json!({
                "text": text,
                "model_id": self.model,
                "voice_settings": self.settings,
            }))
            .send()
            .await
            .context("Failed to send text-to-speech request")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            anyhow::bail!("ElevenLabs API error ({}): {}", status, detail);
        }

        let audio = response
            .bytes()
            .await
            .context("Failed to read synthesized audio")?;

        Ok(audio.to_vec())
    }
}
