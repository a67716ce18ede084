//! DuckDuckGo search backend.
//!
//! Talks to the Instant Answer JSON API (`https://api.duckduckgo.com/`),
//! which needs no credentials. The abstract becomes the lead hit and the
//! related topics fill the remainder, each truncated to the configured
//! character budget.

use async_trait::async_trait;
use fieldscout_core::error::SearchError;
use fieldscout_core::search::{SearchBackend, SearchHit, SearchOutcome, SearchResponse};
use serde::Deserialize;
use tracing::{info, warn};

use crate::truncate_chars;

const API_URL: &str = "https://api.duckduckgo.com/";

pub struct DuckDuckGoBackend {
    client: reqwest::Client,
}

impl DuckDuckGoBackend {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    async fn fetch(
        &self,
        query: &str,
        max_characters: usize,
        num_results: usize,
    ) -> Result<SearchResponse, SearchError> {
        let response = self
            .client
            .get(API_URL)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(SearchError::Api {
                backend: "DuckDuckGo".into(),
                status_code: status,
            });
        }

        let answer: InstantAnswer = response
            .json()
            .await
            .map_err(|e| SearchError::Decode(e.to_string()))?;

        Ok(to_response(answer, max_characters, num_results))
    }
}

impl Default for DuckDuckGoBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchBackend for DuckDuckGoBackend {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    async fn search(
        &self,
        query: &str,
        max_characters: usize,
        num_results: usize,
    ) -> SearchOutcome {
        info!(query = %truncate_chars(query, 50), "searching DuckDuckGo");

        match self.fetch(query, max_characters, num_results).await {
            Ok(response) => SearchOutcome::Success(response),
            Err(e) => {
                warn!(error = %e, "DuckDuckGo search failed");
                SearchOutcome::Failure(e)
            }
        }
    }
}

/// Map the Instant Answer document into the shared result schema.
fn to_response(answer: InstantAnswer, max_characters: usize, num_results: usize) -> SearchResponse {
    let mut results = Vec::new();

    if !answer.abstract_text.is_empty() {
        let title = if answer.heading.is_empty() {
            "DuckDuckGo Abstract".to_string()
        } else {
            answer.heading.clone()
        };
        results.push(SearchHit::new(
            title,
            answer.abstract_url.clone(),
            truncate_chars(&answer.abstract_text, max_characters),
        ));
    }

    let mut flat = Vec::new();
    collect_topics(&answer.related_topics, &mut flat);

    for (text, url) in flat {
        if results.len() >= num_results {
            break;
        }
        let title = text.split(" - ").next().unwrap_or(&text).to_string();
        results.push(SearchHit::new(title, url, truncate_chars(&text, max_characters)));
    }

    results.truncate(num_results);
    SearchResponse { results }
}

/// Flatten topic groups into (text, url) pairs, preserving order.
fn collect_topics(topics: &[RelatedTopic], out: &mut Vec<(String, String)>) {
    for topic in topics {
        if let (Some(text), Some(url)) = (&topic.text, &topic.first_url) {
            if !text.is_empty() {
                out.push((text.clone(), url.clone()));
            }
        }
        collect_topics(&topic.topics, out);
    }
}

// --- Instant Answer API types (internal) ---

#[derive(Debug, Deserialize)]
struct InstantAnswer {
    #[serde(default, rename = "AbstractText")]
    abstract_text: String,

    #[serde(default, rename = "AbstractURL")]
    abstract_url: String,

    #[serde(default, rename = "Heading")]
    heading: String,

    #[serde(default, rename = "RelatedTopics")]
    related_topics: Vec<RelatedTopic>,
}

/// Either a plain topic (`Text` + `FirstURL`) or a named group of topics.
#[derive(Debug, Deserialize)]
struct RelatedTopic {
    #[serde(default, rename = "Text")]
    text: Option<String>,

    #[serde(default, rename = "FirstURL")]
    first_url: Option<String>,

    #[serde(default, rename = "Topics")]
    topics: Vec<RelatedTopic>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_answer() -> InstantAnswer {
        serde_json::from_str(
            r#"{
                "Heading": "Rust (programming language)",
                "AbstractText": "Rust is a general-purpose programming language emphasizing performance, type safety, and concurrency.",
                "AbstractURL": "https://en.wikipedia.org/wiki/Rust_(programming_language)",
                "RelatedTopics": [
                    {
                        "Text": "Cargo - The Rust package manager",
                        "FirstURL": "https://duckduckgo.com/Cargo"
                    },
                    {
                        "Name": "Related",
                        "Topics": [
                            {
                                "Text": "Servo - A browser engine written in Rust",
                                "FirstURL": "https://duckduckgo.com/Servo"
                            }
                        ]
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn abstract_becomes_lead_hit() {
        let response = to_response(sample_answer(), 200, 3);
        assert_eq!(response.results.len(), 3);
        assert_eq!(response.results[0].title, "Rust (programming language)");
        assert!(response.results[0].url.contains("wikipedia.org"));
        assert_eq!(response.results[0].score, 0.0);
    }

    #[test]
    fn nested_topic_groups_are_flattened_in_order() {
        let response = to_response(sample_answer(), 200, 3);
        assert_eq!(response.results[1].title, "Cargo");
        assert_eq!(response.results[2].title, "Servo");
    }

    #[test]
    fn num_results_caps_the_hit_count() {
        let response = to_response(sample_answer(), 200, 1);
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].title, "Rust (programming language)");
    }

    #[test]
    fn text_is_truncated_to_character_budget() {
        let response = to_response(sample_answer(), 10, 3);
        assert_eq!(response.results[0].text.chars().count(), 10);
    }

    #[test]
    fn empty_answer_yields_no_hits() {
        let answer: InstantAnswer = serde_json::from_str("{}").unwrap();
        let response = to_response(answer, 200, 3);
        assert!(response.results.is_empty());
    }
}
