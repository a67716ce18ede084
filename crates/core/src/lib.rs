//! # FieldScout Core
//!
//! Domain types, traits, and error definitions for the FieldScout research
//! orchestration runtime. This crate has **zero framework dependencies** —
//! it defines the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every collaborator is defined as a trait here. Implementations live in
//! their respective crates. This enables:
//! - Swapping agent/search implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod agent;
pub mod conversation;
pub mod error;
pub mod output;
pub mod run_id;
pub mod search;

// Re-export key types at crate root for ergonomics
pub use agent::{Agent, AgentRequest};
pub use conversation::{ConversationLog, Entry, HUMAN_ROLE};
pub use error::{AgentError, Error, Result, SearchError, StoreError};
pub use output::{OutputMode, RunOutput};
pub use run_id::{RunId, RUN_ID_PREFIX};
pub use search::{SearchBackend, SearchHit, SearchOutcome, SearchResponse};
