//! Agent trait — the abstraction over the reasoning-agent collaborator.
//!
//! An [`Agent`] runs one task against one model under a token budget and a
//! loop bound, and hands back the resulting text. The orchestration core
//! never interprets that text — it only stores and forwards it.
//!
//! Implementations: OpenAI-compatible LLM endpoints, search-augmented
//! wrappers, scripted mocks for tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// Everything one agent invocation needs — name, model, task, budgets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRequest {
    /// Label for this agent instance (e.g., "Director-Agent",
    /// "Worker-Search-Agent-0")
    pub agent_name: String,

    /// The model to run against
    pub model_name: String,

    /// The task text
    pub task: String,

    /// Maximum tokens the agent may generate
    pub max_tokens: u32,

    /// How many internal reasoning loops the agent may run
    pub max_loops: u32,

    /// Whether the agent should fold tool activity into its answer
    #[serde(default)]
    pub tool_call_summary: bool,

    /// Optional image context (URL or data URI)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl AgentRequest {
    /// Create a request with the default budgets (8000 tokens, one loop).
    pub fn new(
        agent_name: impl Into<String>,
        model_name: impl Into<String>,
        task: impl Into<String>,
    ) -> Self {
        Self {
            agent_name: agent_name.into(),
            model_name: model_name.into(),
            task: task.into(),
            max_tokens: 8000,
            max_loops: 1,
            tool_call_summary: true,
            image: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_max_loops(mut self, max_loops: u32) -> Self {
        self.max_loops = max_loops;
        self
    }

    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }
}

/// The agent execution collaborator.
///
/// A single synchronous-from-the-caller's-view call: construct-and-run is
/// hidden behind `execute`, so the orchestrator stays agnostic of how the
/// underlying agent is instantiated. Failures propagate uncaught.
#[async_trait]
pub trait Agent: Send + Sync {
    /// A human-readable name for this implementation (e.g., "openrouter").
    fn name(&self) -> &str;

    /// Run the task once and return the agent's textual output.
    async fn execute(&self, request: AgentRequest) -> std::result::Result<String, AgentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults() {
        let req = AgentRequest::new("Director-Agent", "test-model", "Find things");
        assert_eq!(req.max_tokens, 8000);
        assert_eq!(req.max_loops, 1);
        assert!(req.tool_call_summary);
        assert!(req.image.is_none());
    }

    #[test]
    fn request_builders_override_budgets() {
        let req = AgentRequest::new("Worker-Search-Agent-0", "test-model", "query")
            .with_max_tokens(4000)
            .with_max_loops(2)
            .with_image(Some("https://example.com/chart.png".into()));
        assert_eq!(req.max_tokens, 4000);
        assert_eq!(req.max_loops, 2);
        assert_eq!(req.image.as_deref(), Some("https://example.com/chart.png"));
    }

    #[test]
    fn request_serialization_skips_absent_image() {
        let req = AgentRequest::new("Director-Agent", "test-model", "task");
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("image"));
    }
}
