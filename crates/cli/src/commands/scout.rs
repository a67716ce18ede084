//! `fieldscout scout` — Fan worker search agents out over explicit queries.

use std::sync::Arc;

use fieldscout_agents::{SearchAgent, WorkerFleet};
use fieldscout_config::AppConfig;

pub async fn run(queries: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    let inner = super::llm_agent(&config)?;
    let backend =
        fieldscout_search::backend_for(&config.search_backend, config.google_api_key.clone())?;

    let settings = config.research.worker.clone();
    let worker_agent = Arc::new(SearchAgent::new(inner, backend, &settings));

    let fleet = WorkerFleet::new(worker_agent, settings);
    let combined = fleet.execute_queries(&queries).await?;

    println!("{combined}");
    Ok(())
}
