//! OpenAI-compatible agent invoker.
//!
//! Works with OpenAI, OpenRouter, Ollama, vLLM, and any endpoint exposing
//! an OpenAI-compatible `/v1/chat/completions` route. The request's
//! `max_loops` bound is honored by iterating the completion with the
//! accumulated transcript and returning the final pass's text.

use async_trait::async_trait;
use fieldscout_core::agent::{Agent, AgentRequest};
use fieldscout_core::error::AgentError;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

/// An agent backed by an OpenAI-compatible LLM endpoint.
pub struct LlmAgent {
    name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl LlmAgent {
    /// Create a new OpenAI-compatible agent.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        }
    }

    /// Create an OpenRouter agent (convenience constructor).
    pub fn openrouter(api_key: impl Into<String>) -> Self {
        Self::new("openrouter", "https://openrouter.ai/api/v1", api_key)
    }

    /// Create an OpenAI agent (convenience constructor).
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self::new("openai", "https://api.openai.com/v1", api_key)
    }

    /// Create an Ollama agent (convenience constructor).
    pub fn ollama(base_url: Option<&str>) -> Self {
        Self::new(
            "ollama",
            base_url.unwrap_or("http://localhost:11434/v1"),
            "ollama", // Ollama doesn't need a real key
        )
    }

    async fn complete(&self, body: &Value) -> Result<String, AgentError> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| AgentError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(AgentError::RateLimited {
                retry_after_secs: 5,
            });
        }

        if status == 401 || status == 403 {
            return Err(AgentError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "LLM endpoint returned error");
            return Err(AgentError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse =
            response.json().await.map_err(|e| AgentError::ApiError {
                status_code: 200,
                message: format!("Failed to parse response: {e}"),
            })?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::EmptyCompletion("No choices in response".into()))?;

        Ok(choice.message.content.unwrap_or_default())
    }
}

#[async_trait]
impl Agent for LlmAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, request: AgentRequest) -> Result<String, AgentError> {
        let mut messages = vec![user_message(&request.task, request.image.as_deref())];
        let mut answer = String::new();

        let loops = request.max_loops.max(1);
        for turn in 0..loops {
            debug!(
                agent = %request.agent_name,
                model = %request.model_name,
                turn,
                "sending completion request"
            );

            let body = completion_body(&request.model_name, &messages, request.max_tokens);
            answer = self.complete(&body).await?;
            messages.push(json!({"role": "assistant", "content": answer.clone()}));
        }

        Ok(answer)
    }
}

/// Build the user message, attaching the image as a content part if given.
fn user_message(task: &str, image: Option<&str>) -> Value {
    match image {
        Some(url) => json!({
            "role": "user",
            "content": [
                {"type": "text", "text": task},
                {"type": "image_url", "image_url": {"url": url}},
            ],
        }),
        None => json!({"role": "user", "content": task}),
    }
}

/// Assemble the chat-completions request body.
fn completion_body(model: &str, messages: &[Value], max_tokens: u32) -> Value {
    json!({
        "model": model,
        "messages": messages,
        "max_tokens": max_tokens,
        "stream": false,
    })
}

// --- OpenAI API types (internal) ---

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openrouter_constructor() {
        let agent = LlmAgent::openrouter("sk-test");
        assert_eq!(agent.name(), "openrouter");
        assert!(agent.base_url.contains("openrouter.ai"));
    }

    #[test]
    fn ollama_constructor() {
        let agent = LlmAgent::ollama(None);
        assert_eq!(agent.name(), "ollama");
        assert!(agent.base_url.contains("localhost:11434"));
    }

    #[test]
    fn trailing_slash_is_stripped_from_base_url() {
        let agent = LlmAgent::new("custom", "https://llm.internal/v1/", "key");
        assert_eq!(agent.base_url, "https://llm.internal/v1");
    }

    #[test]
    fn plain_user_message_is_a_string_content() {
        let msg = user_message("Find treatments", None);
        assert_eq!(msg["role"], "user");
        assert_eq!(msg["content"], "Find treatments");
    }

    #[test]
    fn image_becomes_a_content_part() {
        let msg = user_message("Describe this", Some("https://example.com/x.png"));
        let parts = msg["content"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["type"], "text");
        assert_eq!(parts[1]["type"], "image_url");
        assert_eq!(parts[1]["image_url"]["url"], "https://example.com/x.png");
    }

    #[test]
    fn completion_body_carries_budgets() {
        let messages = vec![user_message("task", None)];
        let body = completion_body("test-model", &messages, 4000);
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["max_tokens"], 4000);
        assert_eq!(body["stream"], false);
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn response_parsing_tolerates_missing_content() {
        let parsed: ApiResponse =
            serde_json::from_str(r#"{"choices": [{"message": {}}]}"#).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }
}
