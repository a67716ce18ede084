//! Shared test helpers.

use std::sync::Mutex;

use async_trait::async_trait;
use fieldscout_core::agent::{Agent, AgentRequest};
use fieldscout_core::error::AgentError;

/// A mock agent that returns a sequence of scripted results.
///
/// Each call to `execute` records the request and returns the next result
/// in the queue. Panics if more calls are made than results provided.
pub struct SequentialMockAgent {
    results: Mutex<Vec<Result<String, AgentError>>>,
    requests: Mutex<Vec<AgentRequest>>,
    call_count: Mutex<usize>,
}

impl SequentialMockAgent {
    pub fn new(results: Vec<Result<String, AgentError>>) -> Self {
        Self {
            results: Mutex::new(results),
            requests: Mutex::new(Vec::new()),
            call_count: Mutex::new(0),
        }
    }

    /// Create an agent that returns the same text on every call.
    pub fn repeating(text: &str, times: usize) -> Self {
        Self::new(vec![Ok(text.to_string()); times])
    }

    /// Every request seen so far, in call order.
    pub fn requests(&self) -> Vec<AgentRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl Agent for SequentialMockAgent {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn execute(&self, request: AgentRequest) -> Result<String, AgentError> {
        self.requests.lock().unwrap().push(request);

        let mut count = self.call_count.lock().unwrap();
        let results = self.results.lock().unwrap();

        if *count >= results.len() {
            panic!(
                "SequentialMockAgent: no more results (call #{}, have {})",
                *count,
                results.len()
            );
        }

        let result = results[*count].clone();
        *count += 1;
        result
    }
}
