//! `fieldscout search` — Query the configured search backend directly.

use fieldscout_config::AppConfig;

pub async fn run(
    query: String,
    results: Option<usize>,
    characters: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let backend =
        fieldscout_search::backend_for(&config.search_backend, config.google_api_key.clone())?;

    let worker = &config.research.worker;
    let num_results = results.unwrap_or(worker.exa_search_num_results);
    let max_characters = characters.unwrap_or(worker.exa_search_max_characters);

    let outcome = backend.search(&query, max_characters, num_results).await;
    println!("{}", outcome.into_report());

    Ok(())
}
