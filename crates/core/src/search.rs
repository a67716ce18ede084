//! Search backend trait and result types.
//!
//! Search failures are deliberately non-fatal: a backend never returns
//! `Err`. Instead every call yields a [`SearchOutcome`] that is either a
//! structured hit list or a captured [`SearchError`], and `into_report`
//! renders both to the text the worker agents consume. A failed query must
//! not abort a multi-query fan-out.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// A single search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,

    pub url: String,

    pub text: String,

    pub score: f32,

    #[serde(default)]
    pub id: String,

    #[serde(default, rename = "publishedDate")]
    pub published_date: String,
}

impl SearchHit {
    pub fn new(title: impl Into<String>, url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            text: text.into(),
            score: 0.0,
            id: String::new(),
            published_date: String::new(),
        }
    }

    pub fn with_score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }
}

/// The hit list wrapper matching the wire schema `{"results": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
}

/// What one search call produced — hits, or a captured failure.
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    Success(SearchResponse),
    Failure(SearchError),
}

impl SearchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SearchOutcome::Success(_))
    }

    /// Render the outcome to the text handed to worker agents.
    ///
    /// Successes serialize to the `{"results": [...]}` JSON document.
    /// Missing credentials render as `"Error: ..."`; every other failure
    /// as `"Search failed: ..."`. Downstream code treats both as ordinary
    /// (if low-quality) content, never as a control-flow signal.
    pub fn into_report(self) -> String {
        match self {
            SearchOutcome::Success(response) => serde_json::to_string_pretty(&response)
                .unwrap_or_else(|_| r#"{"results": []}"#.to_string()),
            SearchOutcome::Failure(err @ SearchError::MissingApiKey { .. }) => {
                format!("Error: {err}")
            }
            SearchOutcome::Failure(err) => format!("Search failed: {err}"),
        }
    }
}

/// The web-search collaborator.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// A human-readable name for this backend (e.g., "duckduckgo").
    fn name(&self) -> &str;

    /// Run one query. `max_characters` caps per-hit text length and
    /// `num_results` caps the hit count where the backend supports it.
    async fn search(&self, query: &str, max_characters: usize, num_results: usize)
    -> SearchOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_report_matches_wire_schema() {
        let outcome = SearchOutcome::Success(SearchResponse {
            results: vec![SearchHit::new(
                "Rust",
                "https://www.rust-lang.org/",
                "A language empowering everyone",
            )],
        });
        let report = outcome.into_report();
        assert!(report.contains("\"results\""));
        assert!(report.contains("\"title\""));
        assert!(report.contains("\"publishedDate\""));
        assert!(report.contains("rust-lang.org"));
    }

    #[test]
    fn missing_key_report_uses_error_prefix() {
        let outcome = SearchOutcome::Failure(SearchError::MissingApiKey {
            variable: "GOOGLE_API_KEY".into(),
        });
        let report = outcome.into_report();
        assert!(report.starts_with("Error:"));
        assert!(report.contains("GOOGLE_API_KEY"));
    }

    #[test]
    fn transport_failure_report_uses_search_failed_prefix() {
        let outcome = SearchOutcome::Failure(SearchError::Api {
            backend: "Gemini".into(),
            status_code: 500,
        });
        let report = outcome.into_report();
        assert!(report.starts_with("Search failed:"));
        assert!(report.contains("500"));
    }

    #[test]
    fn hit_roundtrips_published_date_key() {
        let hit = SearchHit {
            title: "t".into(),
            url: "u".into(),
            text: "x".into(),
            score: 0.8,
            id: "abc".into(),
            published_date: "2026-01-01".into(),
        };
        let json = serde_json::to_string(&hit).unwrap();
        assert!(json.contains("publishedDate"));
        let back: SearchHit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hit);
    }
}
