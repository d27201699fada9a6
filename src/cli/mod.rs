//! Command-line interface for reminisce.
//!
//! Two subcommands mirroring the two halves of the pipeline:
//! - `reminisce capture <DIRECTORY>` keeps the frame file current
//! - `reminisce narrate <DIRECTORY>` narrates it aloud

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::adapters::{ElevenLabsSynth, ExternalPlayer, OpenAiVision, VoiceSettings, Webcam};
use crate::config::{PromptsFile, Secrets};
use crate::core::{run_capture, CaptureOptions, FrameSlot, Narrator};

/// reminisce - webcam narration pipeline
#[derive(Parser, Debug)]
#[command(name = "reminisce")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Capture webcam frames into <DIRECTORY>/frame.jpg
    Capture {
        /// Directory for the frame file (created if missing)
        directory: PathBuf,

        /// Index of the capture device to use
        #[arg(short = 'c', long = "capture", default_value_t = 0)]
        capture: i32,
    },

    /// Narrate captured frames aloud, one pass over the prompts document
    Narrate {
        /// Directory holding the frame file
        directory: PathBuf,

        /// Prompts document (YAML with `system` and `user` keys)
        #[arg(long)]
        prompts: PathBuf,

        /// Voice stability, 0 to 1
        #[arg(long, default_value_t = 0.5)]
        stability: f32,

        /// Voice similarity boost, 0 to 1
        #[arg(long, default_value_t = 0.75)]
        similarity: f32,

        /// Style exaggeration, 0 to 1
        #[arg(long, default_value_t = 0.0)]
        style: f32,

        /// Enable speaker boost
        #[arg(long)]
        boost: bool,

        /// Seconds to sleep between prompts
        #[arg(long, default_value_t = 5)]
        interval: u64,
    },
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Capture { directory, capture } => execute_capture(directory, capture).await,
            Commands::Narrate {
                directory,
                prompts,
                stability,
                similarity,
                style,
                boost,
                interval,
            } => {
                let settings = VoiceSettings {
                    stability,
                    similarity_boost: similarity,
                    style,
                    use_speaker_boost: boost,
                };
                execute_narrate(directory, prompts, settings, interval).await
            }
        }
    }
}

/// Run the capture loop until interrupted or the device stops yielding
/// frames
async fn execute_capture(directory: PathBuf, device: i32) -> Result<()> {
    let slot = FrameSlot::new(&directory)?;
    let source = Webcam::open(device)?;

    run_capture(source, &slot, CaptureOptions::default()).await
}

/// Wire the real adapters and run the narration loop
async fn execute_narrate(
    directory: PathBuf,
    prompts_path: PathBuf,
    settings: VoiceSettings,
    interval: u64,
) -> Result<()> {
    settings.validate()?;

    let prompts = PromptsFile::from_file(&prompts_path)?;
    let secrets = Secrets::load()?;

    // Probe the player before any API call so a missing executable fails
    // fast
    let player = ExternalPlayer::detect()?;

    let slot = FrameSlot::new(&directory)?;
    let vision = OpenAiVision::new(secrets.openai_api_key, secrets.openai_model);
    let speech = ElevenLabsSynth::new(
        secrets.elevenlabs_api_key,
        secrets.voice_id,
        secrets.elevenlabs_model,
        settings,
    );

    let mut narrator = Narrator::new(slot, vision, speech, player, Duration::from_secs(interval));
    narrator.run(&prompts).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_defaults() {
        let cli = Cli::parse_from(["reminisce", "capture", "./frames"]);
        match cli.command {
            Commands::Capture { directory, capture } => {
                assert_eq!(directory, PathBuf::from("./frames"));
                assert_eq!(capture, 0);
            }
            _ => panic!("expected capture subcommand"),
        }
    }

    #[test]
    fn test_narrate_flags() {
        let cli = Cli::parse_from([
            "reminisce",
            "narrate",
            "./frames",
            "--prompts",
            "prompts.yaml",
            "--stability",
            "0.3",
            "--boost",
            "--interval",
            "2",
        ]);
        match cli.command {
            Commands::Narrate {
                stability,
                similarity,
                style,
                boost,
                interval,
                ..
            } => {
                assert_eq!(stability, 0.3);
                assert_eq!(similarity, 0.75);
                assert_eq!(style, 0.0);
                assert!(boost);
                assert_eq!(interval, 2);
            }
            _ => panic!("expected narrate subcommand"),
        }
    }
}
