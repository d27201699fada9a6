//! Audio playback through an external player subprocess.
//!
//! The audio buffer is piped to the player's stdin and the call blocks until
//! the process exits. Player detection happens at startup so a missing
//! executable is fatal before any API calls are made.

use std::process::Stdio;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::Playback;

/// A detected external audio player
pub struct ExternalPlayer {
    program: String,
    args: Vec<String>,
}

impl ExternalPlayer {
    /// Detect an installed player, trying ffplay first, then mpv.
    /// Fatal if neither is on PATH.
    pub fn detect() -> Result<Self> {
        if probe("ffplay", "-version") {
            return Ok(Self::ffplay());
        }
        if probe("mpv", "--version") {
            return Ok(Self::mpv());
        }

        anyhow::bail!("No audio player found; install ffplay (ffmpeg) or mpv")
    }

    fn ffplay() -> Self {
        Self {
            program: "ffplay".to_string(),
            args: ["-autoexit", "-nodisp", "-loglevel", "error", "-i", "-"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    fn mpv() -> Self {
        Self {
            program: "mpv".to_string(),
            args: ["--really-quiet", "--no-video", "-"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Whether `program` runs at all
fn probe(program: &str, version_arg: &str) -> bool {
    std::process::Command::new(program)
        .arg(version_arg)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .is_ok()
}

#[async_trait]
impl Playback for ExternalPlayer {
    async fn play(&self, audio: &[u8]) -> Result<()> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to spawn {}", self.program))?;

        {
            let mut stdin = child
                .stdin
                .take()
                .context("Failed to open player stdin")?;
            stdin
                .write_all(audio)
                .await
                .context("Failed to pipe audio to player")?;
            // Dropping stdin closes the pipe so the player can finish
        }

        let status = child
            .wait()
            .await
            .with_context(|| format!("Failed to wait for {}", self.program))?;

        if !status.success() {
            anyhow::bail!("{} exited with {}", self.program, status);
        }

        Ok(())
    }
}
