//! Worker fan-out — one search agent per query, strictly in order.
//!
//! Worker i+1 is not started until worker i has completed, so a failure
//! at index i is never masked by a later query's result. A concurrent
//! pool would change those failure-ordering semantics and is deliberately
//! not implemented.

use std::sync::Arc;

use fieldscout_config::WorkerSettings;
use fieldscout_core::agent::{Agent, AgentRequest};
use fieldscout_core::error::Result;
use tracing::{debug, info};

/// Drives one worker agent per query and aggregates their outputs.
pub struct WorkerFleet {
    agent: Arc<dyn Agent>,
    settings: WorkerSettings,
}

impl WorkerFleet {
    pub fn new(agent: Arc<dyn Agent>, settings: WorkerSettings) -> Self {
        Self { agent, settings }
    }

    /// Execute every query in index order and join the outputs with a
    /// single space. An empty query list yields an empty string.
    ///
    /// Each worker is labeled `Worker-Search-Agent-<index>`, runs the
    /// query text verbatim as its task, and is bounded to a single loop.
    pub async fn execute_queries(&self, queries: &[String]) -> Result<String> {
        info!(queries = queries.len(), "starting worker fan-out");

        let mut outputs = Vec::with_capacity(queries.len());
        for (index, query) in queries.iter().enumerate() {
            debug!(index, query = %query, "dispatching worker search agent");

            let request = AgentRequest::new(
                format!("Worker-Search-Agent-{index}"),
                &self.settings.worker_model_name,
                query,
            )
            .with_max_tokens(self.settings.worker_max_tokens)
            .with_max_loops(1);

            let output = self.agent.execute(request).await?;
            outputs.push(output);
        }

        Ok(outputs.join(" "))
    }
}
