//! CLI command implementations.

pub mod onboard;
pub mod run;
pub mod scout;
pub mod search;

use std::sync::Arc;

use fieldscout_agents::LlmAgent;
use fieldscout_config::AppConfig;
use fieldscout_core::Agent;

/// Build the configured LLM agent, checking that credentials exist where
/// the provider needs them.
pub(crate) fn llm_agent(config: &AppConfig) -> Result<Arc<dyn Agent>, Box<dyn std::error::Error>> {
    if !config.has_api_key() && config.provider != "ollama" {
        return Err(
            "No API key configured. Set FIELDSCOUT_API_KEY or run `fieldscout onboard` \
             and edit the generated config."
                .into(),
        );
    }

    let api_key = config.api_key.clone().unwrap_or_default();
    let agent = match (config.provider.as_str(), config.base_url.as_deref()) {
        (provider, Some(base)) => LlmAgent::new(provider, base, api_key),
        ("openrouter", None) => LlmAgent::openrouter(api_key),
        ("openai", None) => LlmAgent::openai(api_key),
        ("ollama", None) => LlmAgent::ollama(None),
        (other, None) => return Err(format!("unknown provider '{other}'").into()),
    };

    Ok(Arc::new(agent))
}
