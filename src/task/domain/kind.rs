//! Task classification.

use super::ParseTaskKindError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What sort of work a task represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    /// A defect to fix.
    Bug,
    /// New functionality to build.
    Feature,
    /// A refinement of existing behaviour.
    Improvement,
}

impl TaskKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bug => "Bug",
            Self::Feature => "Feature",
            Self::Improvement => "Improvement",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskKind {
    type Error = ParseTaskKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "bug" => Ok(Self::Bug),
            "feature" => Ok(Self::Feature),
            "improvement" => Ok(Self::Improvement),
            _ => Err(ParseTaskKindError(value.to_owned())),
        }
    }
}
