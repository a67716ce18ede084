//! The research orchestrator — seed, loop, format, export.
//!
//! One orchestrator instance exclusively owns its conversation log and run
//! identity. Every collaborator call is awaited to completion before the
//! next begins; correctness relies solely on single-threaded sequencing.

use std::path::Path;
use std::sync::Arc;

use fieldscout_config::ResearchConfig;
use fieldscout_core::agent::{Agent, AgentRequest};
use fieldscout_core::conversation::{ConversationLog, HUMAN_ROLE};
use fieldscout_core::error::{Error, Result, StoreError};
use fieldscout_core::output::{OutputMode, RunOutput};
use fieldscout_core::run_id::RunId;
use serde_json::json;
use tracing::{debug, info};

/// Orchestrates director invocations over one accumulating conversation.
pub struct ResearchOrchestrator {
    config: ResearchConfig,
    director: Arc<dyn Agent>,
    conversation: ConversationLog,
    id: RunId,
}

impl ResearchOrchestrator {
    /// Create an orchestrator with a generated run identity.
    ///
    /// The configuration is immutable from here on — every knob the run
    /// needs is threaded in explicitly, no ambient global state.
    pub fn new(director: Arc<dyn Agent>, config: ResearchConfig) -> Self {
        Self {
            config,
            director,
            conversation: ConversationLog::new(),
            id: RunId::generate(),
        }
    }

    /// Replace the generated run identity with a caller-supplied one.
    pub fn with_id(mut self, id: RunId) -> Self {
        self.id = id;
        self
    }

    pub fn id(&self) -> &RunId {
        &self.id
    }

    pub fn conversation(&self) -> &ConversationLog {
        &self.conversation
    }

    /// The discoverable set of supported output modes.
    pub fn output_methods(&self) -> Vec<String> {
        OutputMode::names().iter().map(|s| s.to_string()).collect()
    }

    /// Run exactly one director invocation and append its answer.
    ///
    /// Does not seed the log — callers composing multiple `step`s are
    /// responsible for seeding.
    pub async fn step(&mut self, task: &str, image: Option<String>) -> Result<String> {
        debug!(agent = %self.config.director_agent_name, "running director step");

        let request = AgentRequest::new(
            &self.config.director_agent_name,
            &self.config.director_model_name,
            task,
        )
        .with_max_tokens(self.config.director_max_tokens)
        .with_max_loops(self.config.director_max_loops)
        .with_image(image);

        let output = self.director.execute(request).await?;
        self.conversation
            .add(self.config.director_agent_name.clone(), output.clone());

        Ok(output)
    }

    /// Seed the log with the task, loop the director `max_loops` times,
    /// format the result, and export if enabled.
    ///
    /// Every iteration receives the same original task — multi-loop
    /// iteration is repetition, not refinement-by-feedback.
    pub async fn run(&mut self, task: &str, image: Option<String>) -> Result<RunOutput> {
        if task.trim().is_empty() {
            return Err(Error::InvalidTask(
                "task argument is required and cannot be empty".into(),
            ));
        }

        info!(
            id = %self.id,
            max_loops = self.config.max_loops,
            "starting research run"
        );

        self.conversation.add(HUMAN_ROLE, task);

        for _ in 0..self.config.max_loops {
            self.step(task, image.clone()).await?;
        }

        let output = self.config.output_type.format(&self.conversation);
        self.export_conversation()?;

        Ok(output)
    }

    /// Run each task independently, in order, against the same
    /// accumulating log. Returns per-task results in input order.
    pub async fn batched_run(&mut self, tasks: &[String]) -> Result<Vec<RunOutput>> {
        let mut results = Vec::with_capacity(tasks.len());
        for task in tasks {
            results.push(self.run(task, None).await?);
        }
        Ok(results)
    }

    /// Write the conversation through the merge-store, if export is on.
    ///
    /// No-op (no file write, no directory creation) when export is
    /// disabled. Re-exporting the same identity merges keys into the
    /// existing document instead of clobbering it.
    pub fn export_conversation(&self) -> Result<()> {
        if !self.config.export.enabled {
            return Ok(());
        }

        let dir = Path::new(&self.config.export.dir);
        std::fs::create_dir_all(dir).map_err(|e| StoreError::Io {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut data = serde_json::Map::new();
        data.insert("id".into(), json!(self.id.as_str()));
        data.insert("name".into(), json!(self.config.name));
        data.insert("description".into(), json!(self.config.description));
        data.insert(
            "conversation".into(),
            serde_json::to_value(self.conversation.history())?,
        );

        let path = dir.join(format!("{}.json", self.id));
        fieldscout_store::merge_write(&data, &path)?;

        info!(path = %path.display(), "exported conversation");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::SequentialMockAgent;
    use fieldscout_config::ExportConfig;

    fn config() -> ResearchConfig {
        ResearchConfig::default()
    }

    #[tokio::test]
    async fn run_seeds_then_loops_the_director() {
        let director = Arc::new(SequentialMockAgent::repeating("Research output", 2));
        let mut orchestrator = ResearchOrchestrator::new(
            director.clone(),
            ResearchConfig {
                max_loops: 2,
                ..config()
            },
        );

        let result = orchestrator.run("Test research task", None).await.unwrap();

        assert_eq!(director.call_count(), 2);

        let history = orchestrator.conversation().history();
        assert_eq!(history.len(), 3); // human + 2 director entries
        assert_eq!(history[0].role, HUMAN_ROLE);
        assert_eq!(history[0].content, "Test research task");
        assert_eq!(history[1].role, "Director-Agent");
        assert_eq!(result, RunOutput::Text("Research output".into()));
    }

    #[tokio::test]
    async fn every_iteration_receives_the_original_task() {
        let director = Arc::new(SequentialMockAgent::repeating("answer", 3));
        let mut orchestrator = ResearchOrchestrator::new(
            director.clone(),
            ResearchConfig {
                max_loops: 3,
                ..config()
            },
        );

        orchestrator.run("the one task", None).await.unwrap();

        for request in director.requests() {
            assert_eq!(request.task, "the one task");
        }
    }

    #[tokio::test]
    async fn empty_task_fails_without_touching_the_log() {
        let director = Arc::new(SequentialMockAgent::new(vec![]));
        let mut orchestrator = ResearchOrchestrator::new(director.clone(), config());

        let result = orchestrator.run("", None).await;
        assert!(matches!(result, Err(Error::InvalidTask(_))));

        let result = orchestrator.run("   ", None).await;
        assert!(matches!(result, Err(Error::InvalidTask(_))));

        assert!(orchestrator.conversation().is_empty());
        assert_eq!(director.call_count(), 0);
    }

    #[tokio::test]
    async fn step_does_not_seed() {
        let director = Arc::new(SequentialMockAgent::new(vec![Ok("Step output".into())]));
        let mut orchestrator = ResearchOrchestrator::new(director.clone(), config());

        let output = orchestrator.step("Test task", None).await.unwrap();
        assert_eq!(output, "Step output");

        let history = orchestrator.conversation().history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].role, "Director-Agent");
        assert_eq!(orchestrator.conversation().final_message(), "Step output");

        let request = &director.requests()[0];
        assert_eq!(request.agent_name, "Director-Agent");
        assert_eq!(request.max_tokens, 8000);
        assert_eq!(request.max_loops, 1);
    }

    #[tokio::test]
    async fn batched_run_accumulates_across_tasks() {
        let director = Arc::new(SequentialMockAgent::repeating("Batch output", 3));
        let mut orchestrator = ResearchOrchestrator::new(director.clone(), config());

        let tasks: Vec<String> = ["Task 1", "Task 2", "Task 3"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let results = orchestrator.batched_run(&tasks).await.unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(director.call_count(), 3);
        // Each task contributes a seed entry plus one director entry.
        assert_eq!(orchestrator.conversation().len(), 6);
        assert_eq!(orchestrator.conversation().history()[0].content, "Task 1");
    }

    #[tokio::test]
    async fn output_mode_all_returns_the_transcript() {
        let director = Arc::new(SequentialMockAgent::repeating("entry", 1));
        let mut orchestrator = ResearchOrchestrator::new(
            director,
            ResearchConfig {
                output_type: OutputMode::All,
                ..config()
            },
        );

        match orchestrator.run("task", None).await.unwrap() {
            RunOutput::Transcript(entries) => assert_eq!(entries.len(), 2),
            other => panic!("expected transcript, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn export_disabled_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let export_dir = dir.path().join("exports");

        let director = Arc::new(SequentialMockAgent::repeating("output", 1));
        let mut orchestrator = ResearchOrchestrator::new(
            director,
            ResearchConfig {
                export: ExportConfig {
                    enabled: false,
                    dir: export_dir.to_string_lossy().into_owned(),
                },
                ..config()
            },
        );

        orchestrator.run("task", None).await.unwrap();

        // Not even the directory is created.
        assert!(!export_dir.exists());
    }

    #[tokio::test]
    async fn export_writes_one_file_named_after_the_run_id() {
        let dir = tempfile::tempdir().unwrap();
        let export_dir = dir.path().join("exports");

        let director = Arc::new(SequentialMockAgent::repeating("findings", 1));
        let mut orchestrator = ResearchOrchestrator::new(
            director,
            ResearchConfig {
                export: ExportConfig {
                    enabled: true,
                    dir: export_dir.to_string_lossy().into_owned(),
                },
                ..config()
            },
        )
        .with_id(RunId::custom("test-run"));

        orchestrator.run("task", None).await.unwrap();

        let path = export_dir.join("test-run.json");
        assert!(path.exists());

        let stored = fieldscout_store::read_object(&path).unwrap().unwrap();
        assert_eq!(stored["id"], "test-run");
        let conversation = stored["conversation"].as_array().unwrap();
        assert_eq!(conversation.len(), 2);
        assert_eq!(conversation[0]["role"], "human");
    }

    #[tokio::test]
    async fn re_export_merges_instead_of_clobbering() {
        let dir = tempfile::tempdir().unwrap();
        let export_dir = dir.path().join("exports");
        std::fs::create_dir_all(&export_dir).unwrap();

        // A key some other process left in the document.
        let path = export_dir.join("test-run.json");
        std::fs::write(&path, r#"{"annotation": "keep me"}"#).unwrap();

        let director = Arc::new(SequentialMockAgent::repeating("findings", 1));
        let mut orchestrator = ResearchOrchestrator::new(
            director,
            ResearchConfig {
                export: ExportConfig {
                    enabled: true,
                    dir: export_dir.to_string_lossy().into_owned(),
                },
                ..config()
            },
        )
        .with_id(RunId::custom("test-run"));

        orchestrator.run("task", None).await.unwrap();

        let stored = fieldscout_store::read_object(&path).unwrap().unwrap();
        assert_eq!(stored["annotation"], "keep me");
        assert_eq!(stored["id"], "test-run");
    }

    #[tokio::test]
    async fn output_methods_cover_the_documented_modes() {
        let director = Arc::new(SequentialMockAgent::new(vec![]));
        let orchestrator = ResearchOrchestrator::new(director, config());

        let methods = orchestrator.output_methods();
        for expected in ["final", "all", "last"] {
            assert!(methods.contains(&expected.to_string()));
        }
    }

    #[tokio::test]
    async fn generated_id_has_the_run_prefix() {
        let director = Arc::new(SequentialMockAgent::new(vec![]));
        let orchestrator = ResearchOrchestrator::new(director, config());
        assert!(orchestrator.id().as_str().starts_with("FieldScout-"));
    }
}
