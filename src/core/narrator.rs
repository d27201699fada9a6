//! The narration driver: one pass over the configured prompts, one
//! frame -> narration -> speech -> playback cycle per prompt.

use std::time::Duration;

use anyhow::{Context, Result};
use base64::Engine as _;
use tracing::info;

use super::FrameSlot;
use crate::adapters::{Playback, SpeechSynthesizer, VisionModel};
use crate::config::PromptsFile;
use crate::domain::Script;

/// Sequences the per-prompt pipeline, carrying the rolling script across
/// iterations.
pub struct Narrator<V, S, P> {
    slot: FrameSlot,
    vision: V,
    speech: S,
    player: P,
    interval: Duration,
    script: Script,
}

impl<V, S, P> Narrator<V, S, P>
where
    V: VisionModel,
    S: SpeechSynthesizer,
    P: Playback,
{
    pub fn new(slot: FrameSlot, vision: V, speech: S, player: P, interval: Duration) -> Self {
        Self {
            slot,
            vision,
            speech,
            player,
            interval,
            script: Script::new(),
        }
    }

    /// The rolling script accumulated so far
    pub fn script(&self) -> &Script {
        &self.script
    }

    /// Process each user prompt in order, once, then return.
    ///
    /// Per prompt: read the current frame (missing file is fatal, a busy
    /// file is retried by the slot), narrate it with the accumulated script
    /// as context, append the narration as an assistant turn, synthesize it,
    /// play it to completion, then sleep the configured interval.
    pub async fn run(&mut self, prompts: &PromptsFile) -> Result<()> {
        for (i, prompt) in prompts.user.iter().enumerate() {
            let jpeg = self
                .slot
                .read()
                .await
                .with_context(|| format!("Failed to read frame for prompt {}", i + 1))?;
            let image_b64 = base64::engine::general_purpose::STANDARD.encode(&jpeg);

            let narration = self
                .vision
                .narrate(&prompts.system, &self.script, prompt, &image_b64)
                .await
                .with_context(|| format!("Narration failed for prompt {}", i + 1))?;

            info!("narration: {}", narration);
            self.script.push_assistant(narration.as_str());

            let audio = self
                .speech
                .synthesize(&narration)
                .await
                .context("Speech synthesis failed")?;

            // Playback blocks until the clip finishes; the serialization is
            // intentional
            self.player
                .play(&audio)
                .await
                .context("Audio playback failed")?;

            tokio::time::sleep(self.interval).await;
        }

        Ok(())
    }
}
