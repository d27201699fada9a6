//! Configuration for reminisce.
//!
//! Two sources, both loaded once at startup:
//! - Secrets: API keys and the voice id, from the process environment with a
//!   `.env` file layered underneath (dotenvy).
//! - Prompts document: a YAML file with the fixed system instruction and the
//!   ordered list of per-frame user prompts.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// API credentials and model identifiers, loaded from the environment.
#[derive(Debug, Clone)]
pub struct Secrets {
    /// OpenAI API key (`OPENAI_API_KEY`)
    pub openai_api_key: String,
    /// ElevenLabs API key (`ELEVENLABS_API_KEY`)
    pub elevenlabs_api_key: String,
    /// Target ElevenLabs voice (`ELEVENLABS_VOICE_ID`)
    pub voice_id: String,
    /// Vision model (`OPENAI_MODEL`, default gpt-4o)
    pub openai_model: String,
    /// Speech model (`ELEVENLABS_MODEL`, default eleven_turbo_v2)
    pub elevenlabs_model: String,
}

impl Secrets {
    /// Load secrets from the environment, reading `.env` first if present.
    pub fn load() -> Result<Self> {
        // A missing .env is fine; the variables may be set directly.
        dotenvy::dotenv().ok();

        Ok(Self {
            openai_api_key: require_var("OPENAI_API_KEY")?,
            elevenlabs_api_key: require_var("ELEVENLABS_API_KEY")?,
            voice_id: require_var("ELEVENLABS_VOICE_ID")?,
            openai_model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".to_string()),
            elevenlabs_model: std::env::var("ELEVENLABS_MODEL")
                .unwrap_or_else(|_| "eleven_turbo_v2".to_string()),
        })
    }
}

fn require_var(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("Missing required environment variable: {}", name))
}

/// The prompts document: one system instruction plus the ordered user
/// prompts, one narration iteration per prompt.
#[derive(Debug, Clone, Deserialize)]
pub struct PromptsFile {
    /// Narration instruction sent as the system message on every call
    pub system: String,

    /// Per-frame prompts, processed in file order, single pass
    pub user: Vec<String>,
}

impl PromptsFile {
    /// Load a prompts document from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read prompts file: {}", path.display()))?;

        Self::from_yaml(&content)
    }

    /// Parse a prompts document from YAML content
    pub fn from_yaml(content: &str) -> Result<Self> {
        let prompts: Self =
            serde_yaml::from_str(content).context("Failed to parse prompts YAML")?;
        prompts.validate()?;
        Ok(prompts)
    }

    /// Validate the document
    pub fn validate(&self) -> Result<()> {
        if self.system.trim().is_empty() {
            anyhow::bail!("Prompts document has an empty system instruction");
        }

        if self.user.is_empty() {
            anyhow::bail!("Prompts document must have at least one user prompt");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_parsing() {
        let yaml = r#"
system: Narrate in first person.
user:
  - Describe this image
  - What do you notice now?
"#;
        let prompts = PromptsFile::from_yaml(yaml).unwrap();
        assert_eq!(prompts.system, "Narrate in first person.");
        assert_eq!(
            prompts.user,
            vec!["Describe this image", "What do you notice now?"]
        );
    }

    #[test]
    fn test_empty_user_list_rejected() {
        let yaml = r#"
system: Narrate.
user: []
"#;
        assert!(PromptsFile::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_blank_system_rejected() {
        let yaml = r#"
system: "  "
user:
  - Describe this image
"#;
        assert!(PromptsFile::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_missing_key_rejected() {
        let yaml = "system: Narrate.\n";
        assert!(PromptsFile::from_yaml(yaml).is_err());
    }
}
