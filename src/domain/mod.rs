//! Domain types for the narration pipeline.
//!
//! This module contains the core data structures:
//! - Turn: a single {role, content} entry in the conversation
//! - Script: the rolling narration context carried across iterations

pub mod script;

// Re-export commonly used types
pub use script::{Role, Script, Turn};
