//! Web search backends for FieldScout worker agents.
//!
//! Each backend implements [`SearchBackend`] and never raises: transport
//! and API failures are folded into [`fieldscout_core::SearchOutcome`] so
//! a bad query degrades to low-quality text instead of aborting a
//! multi-query fan-out.

pub mod duckduckgo;
pub mod gemini;

use std::sync::Arc;

use fieldscout_core::{Error, SearchBackend};

pub use duckduckgo::DuckDuckGoBackend;
pub use gemini::GeminiBackend;

/// Construct a backend by its configured name.
pub fn backend_for(
    name: &str,
    google_api_key: Option<String>,
) -> Result<Arc<dyn SearchBackend>, Error> {
    match name {
        "duckduckgo" => Ok(Arc::new(DuckDuckGoBackend::new())),
        "gemini" => Ok(Arc::new(GeminiBackend::new(google_api_key))),
        other => Err(Error::Config {
            message: format!("unknown search backend '{other}' (expected duckduckgo or gemini)"),
        }),
    }
}

/// Truncate to at most `max_chars` characters, respecting char boundaries.
pub(crate) fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
