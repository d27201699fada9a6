//! OpenAI chat-completions adapter for vision narration.
//!
//! Sends the system instruction, the accumulated script, and a new user turn
//! combining the prompt text with the frame as an embedded data URL. Image
//! detail is pinned to "low" and generation capped to bound cost and
//! latency.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::VisionModel;
use crate::domain::Script;

const API_URL: &str = "https://api.openai.com/v1/chat/completions";
const MAX_TOKENS: u32 = 500;
const IMAGE_DETAIL: &str = "low";

/// OpenAI vision client
pub struct OpenAiVision {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

/// Response envelope from the chat completions endpoint
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiVision {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            client: reqwest::Client::new(),
        }
    }

    /// Assemble the message list: system, prior script turns, then the new
    /// user turn carrying prompt text plus the image.
    fn build_messages(system: &str, script: &Script, prompt: &str, image_b64: &str) -> Vec<Value> {
        let mut messages = vec![json!({
            "role": "system",
            "content": system,
        })];

        for turn in script.turns() {
            messages.push(json!({
                "role": turn.role,
                "content": turn.content,
            }));
        }

        messages.push(json!({
            "role": "user",
            "content": [
                { "type": "text", "text": prompt },
                {
                    "type": "image_url",
                    "image_url": {
                        "url": format!("data:image/jpeg;base64,{}", image_b64),
                        "detail": IMAGE_DETAIL,
                    },
                },
            ],
        }));

        messages
    }
}

#[async_trait]
impl VisionModel for OpenAiVision {
    async fn narrate(
        &self,
        system: &str,
        script: &Script,
        prompt: &str,
        image_b64: &str,
    ) -> Result<String> {
        let body = json!({
            "model": self.model,
            "messages": Self::build_messages(system, script, prompt, image_b64),
            "max_tokens": MAX_TOKENS,
        });

        let response = self
            .client
            .post(API_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("Failed to send chat completion request")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI API error ({}): {}", status, detail);
        }

        let chat: ChatResponse = response
            .json()
            .await
            .context("Failed to parse chat completion response")?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .context("Chat completion returned no content")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_script_in_order() {
        let mut script = Script::new();
        script.push_assistant("first narration");
        script.push_assistant("second narration");

        let messages = OpenAiVision::build_messages("Narrate.", &script, "Describe this", "QUJD");

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["role"], "assistant");
        assert_eq!(messages[1]["content"], "first narration");
        assert_eq!(messages[2]["content"], "second narration");
        assert_eq!(messages[3]["role"], "user");
    }

    #[test]
    fn test_user_turn_embeds_image_at_low_detail() {
        let script = Script::new();
        let messages = OpenAiVision::build_messages("Narrate.", &script, "Describe this", "QUJD");

        let content = &messages[1]["content"];
        assert_eq!(content[0]["type"], "text");
        assert_eq!(content[0]["text"], "Describe this");
        assert_eq!(content[1]["type"], "image_url");
        assert_eq!(
            content[1]["image_url"]["url"],
            "data:image/jpeg;base64,QUJD"
        );
        assert_eq!(content[1]["image_url"]["detail"], "low");
    }
}
