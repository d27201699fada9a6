//! reminisce - webcam narration pipeline
//!
//! Two long-running loops decoupled through a single frame file on disk:
//! - The capture loop grabs webcam frames and keeps `<directory>/frame.jpg`
//!   up to date (overwrite-in-place, last write wins).
//! - The narration loop reads that frame, asks a vision model to narrate it,
//!   synthesizes the narration with ElevenLabs, and plays the audio through
//!   an external player.
//!
//! # Modules
//!
//! - `adapters`: External collaborators (webcam, OpenAI, ElevenLabs, player)
//! - `core`: Frame slot handoff, capture loop, narration driver
//! - `domain`: Data structures (Turn, Script)
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Terminal 1: keep a fresh frame on disk
//! reminisce capture ./frames
//!
//! # Terminal 2: narrate whatever the camera sees
//! reminisce narrate ./frames --prompts prompts.yaml
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use crate::core::{FrameError, FrameSlot, Narrator, RetryPolicy};
pub use adapters::{Playback, SpeechSynthesizer, VisionModel};
pub use config::{PromptsFile, Secrets};
pub use domain::{Role, Script, Turn};
