//! Ollama chat completion client.

use crate::error::ChatError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Chat completions get a longer budget than embeddings.
const CHAT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for `POST {base}/api/chat`.
pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    assistant_name: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: std::borrow::Cow<'a, str>,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: Option<ChatResponseMessage>,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl ChatClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        model: impl Into<String>,
        assistant_name: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            model: model.into(),
            assistant_name: assistant_name.into(),
        }
    }

    pub fn assistant_name(&self) -> &str {
        &self.assistant_name
    }

    /// Answer `prompt` grounded in previously retrieved memories.
    pub async fn reply(
        &self,
        prompt: &str,
        memories: &[String],
        user_name: &str,
    ) -> Result<String, ChatError> {
        let memory_context = if memories.is_empty() {
            "No relevant memories found.".to_string()
        } else {
            memories.join("\n")
        };

        let final_prompt = format!(
            "You are {assistant}, {user}'s AI Assistant.\n\
             Use the following memories if relevant:\n\n\
             {memory_context}\n\n\
             Answer {user}'s question:\n{prompt}\n",
            assistant = self.assistant_name,
            user = user_name,
        );

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: format!(
                        "You are a helpful personal assistant named {}.",
                        self.assistant_name
                    )
                    .into(),
                },
                ChatMessage {
                    role: "user",
                    content: final_prompt.into(),
                },
            ],
        };

        let url = format!("{}/api/chat", self.base_url);
        let response = self
            .http
            .post(&url)
            .timeout(CHAT_TIMEOUT)
            .json(&request)
            .send()
            .await
            .map_err(|e| ChatError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ChatError::Unavailable(format!(
                "chat request returned {}",
                response.status()
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ChatError::InvalidResponse(e.to_string()))?;

        body.message
            .map(|message| message.content)
            .ok_or_else(|| ChatError::InvalidResponse("response carries no message".into()))
    }
}
