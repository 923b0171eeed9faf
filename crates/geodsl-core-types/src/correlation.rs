//! Evaluation correlation identifier
//!
//! Every top-level evaluation performed by the algebra façade is tagged with an
//! `EvalId` so that its log events and any recorded error can be tied together.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for a single evaluation call (UUIDv7, time ordered)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EvalId(String);

impl EvalId {
    /// Generate a fresh EvalId
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wrap an existing identifier (for replaying recorded sessions)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for EvalId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EvalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
