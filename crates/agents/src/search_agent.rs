//! Search-augmented agent — the worker variant that can see the web.
//!
//! Wraps an inner agent and a search backend behind the same [`Agent`]
//! trait: each task is first run through the backend, the rendered result
//! report is appended to the task text, and the augmented task is
//! delegated inward. Search failures arrive as ordinary report text, so a
//! dead backend degrades the answer instead of aborting the call.

use std::sync::Arc;

use async_trait::async_trait;
use fieldscout_config::WorkerSettings;
use fieldscout_core::agent::{Agent, AgentRequest};
use fieldscout_core::error::AgentError;
use fieldscout_core::search::SearchBackend;
use tracing::debug;

pub struct SearchAgent {
    name: String,
    inner: Arc<dyn Agent>,
    backend: Arc<dyn SearchBackend>,
    num_results: usize,
    max_characters: usize,
}

impl SearchAgent {
    pub fn new(
        inner: Arc<dyn Agent>,
        backend: Arc<dyn SearchBackend>,
        settings: &WorkerSettings,
    ) -> Self {
        Self {
            name: format!("{}+{}", inner.name(), backend.name()),
            inner,
            backend,
            num_results: settings.exa_search_num_results,
            max_characters: settings.exa_search_max_characters,
        }
    }
}

#[async_trait]
impl Agent for SearchAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, request: AgentRequest) -> Result<String, AgentError> {
        let outcome = self
            .backend
            .search(&request.task, self.max_characters, self.num_results)
            .await;

        debug!(
            agent = %request.agent_name,
            backend = %self.backend.name(),
            success = outcome.is_success(),
            "augmenting task with search results"
        );

        let task = format!(
            "{}\n\nWeb search results for this query:\n{}",
            request.task,
            outcome.into_report()
        );

        self.inner.execute(AgentRequest { task, ..request }).await
    }
}
