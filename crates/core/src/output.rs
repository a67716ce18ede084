//! Output formatting — mapping a finished conversation log to the shape
//! the caller asked for.
//!
//! The mode is a closed enum validated when configuration is parsed, so an
//! unsupported mode fails before any agent call is made, not at format
//! time.

use serde::{Deserialize, Serialize};

use crate::conversation::{ConversationLog, Entry};
use crate::error::Error;

/// Which shape a completed run returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// The content of the most recent entry
    #[default]
    Final,
    /// The full ordered sequence of (role, content) pairs
    All,
    /// Alias for `Final`
    Last,
    /// A serializable role/content representation
    Dict,
}

impl OutputMode {
    /// Every recognized mode name, in declaration order.
    pub fn names() -> &'static [&'static str] {
        &["final", "all", "last", "dict"]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Final => "final",
            OutputMode::All => "all",
            OutputMode::Last => "last",
            OutputMode::Dict => "dict",
        }
    }

    /// Render the log in this mode.
    pub fn format(&self, log: &ConversationLog) -> RunOutput {
        match self {
            OutputMode::Final | OutputMode::Last => {
                RunOutput::Text(log.final_message().to_string())
            }
            OutputMode::All => RunOutput::Transcript(log.history().to_vec()),
            OutputMode::Dict => RunOutput::Structured(
                serde_json::to_value(log.history()).unwrap_or_default(),
            ),
        }
    }
}

impl std::str::FromStr for OutputMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "final" => Ok(OutputMode::Final),
            "all" => Ok(OutputMode::All),
            "last" => Ok(OutputMode::Last),
            "dict" => Ok(OutputMode::Dict),
            other => Err(Error::Config {
                message: format!(
                    "unknown output mode '{other}' (expected one of: {})",
                    OutputMode::names().join(", ")
                ),
            }),
        }
    }
}

impl std::fmt::Display for OutputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A formatted run result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RunOutput {
    Text(String),
    Transcript(Vec<Entry>),
    Structured(serde_json::Value),
}

impl std::fmt::Display for RunOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunOutput::Text(text) => f.write_str(text),
            RunOutput::Transcript(entries) => {
                for entry in entries {
                    writeln!(f, "{}: {}", entry.role, entry.content)?;
                }
                Ok(())
            }
            RunOutput::Structured(value) => {
                f.write_str(&serde_json::to_string_pretty(value).unwrap_or_default())
            }
        }
    }
}
