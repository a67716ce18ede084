//! Run identifiers — process-unique names for one orchestration instance.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Fixed prefix for generated run identifiers.
pub const RUN_ID_PREFIX: &str = "FieldScout";

/// The unique name of one orchestration run.
///
/// Generated ids look like `FieldScout-time-20260806143015` — a fixed
/// prefix, the literal `-time-` separator, and a 14-digit UTC timestamp at
/// second resolution. Two ids generated in different seconds are distinct;
/// two generated within the same second may collide. Callers that need
/// strict uniqueness supply their own via [`RunId::custom`].
///
/// Immutable once created; used as the export filename stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(String);

impl RunId {
    /// Generate an id from the system clock.
    pub fn generate() -> Self {
        Self(format!(
            "{RUN_ID_PREFIX}-time-{}",
            Utc::now().format("%Y%m%d%H%M%S")
        ))
    }

    /// Use a caller-supplied id verbatim.
    pub fn custom(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::generate()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_id_has_prefix_and_timestamp() {
        let id = RunId::generate();
        let id = id.as_str();
        assert!(id.starts_with("FieldScout-"));
        assert!(id.contains("-time-"));

        let timestamp = id.split("-time-").nth(1).unwrap();
        assert_eq!(timestamp.len(), 14);
        assert!(timestamp.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn custom_id_is_used_verbatim() {
        let id = RunId::custom("my-run-01");
        assert_eq!(id.as_str(), "my-run-01");
        assert_eq!(id.to_string(), "my-run-01");
    }

    #[test]
    fn generated_ids_share_prefix_within_a_second() {
        // Same-second collisions are documented, so only the shape is
        // asserted here, not uniqueness.
        let a = RunId::generate();
        let b = RunId::generate();
        assert_eq!(
            a.as_str().split("-time-").next(),
            b.as_str().split("-time-").next()
        );
    }
}
