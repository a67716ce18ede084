//! Report generation — a single-loop pass that condenses accumulated
//! findings into one document.

use fieldscout_core::agent::{Agent, AgentRequest};
use fieldscout_core::error::AgentError;
use tracing::info;

/// Run the report-generator agent once over `task` and return its text.
pub async fn generate_report(
    agent: &dyn Agent,
    model_name: &str,
    task: &str,
    max_tokens: u32,
    image: Option<String>,
) -> Result<String, AgentError> {
    info!(model = %model_name, "generating consolidated report");

    agent
        .execute(
            AgentRequest::new("Report-Generator-Agent", model_name, task)
                .with_max_tokens(max_tokens)
                .with_image(image),
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::SequentialMockAgent;

    #[tokio::test]
    async fn report_runs_a_single_loop_generator() {
        let agent = SequentialMockAgent::new(vec![Ok("Test summary".into())]);

        let result = generate_report(&agent, "test-model", "Test task", 1000, None)
            .await
            .unwrap();

        assert_eq!(result, "Test summary");

        let seen = &agent.requests()[0];
        assert_eq!(seen.agent_name, "Report-Generator-Agent");
        assert_eq!(seen.model_name, "test-model");
        assert_eq!(seen.task, "Test task");
        assert_eq!(seen.max_tokens, 1000);
        assert_eq!(seen.max_loops, 1);
        assert!(seen.image.is_none());
    }
}
