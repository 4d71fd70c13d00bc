//! Validated task title and description.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest accepted title, matching the backing column width.
const TITLE_MAX_CHARS: usize = 255;

/// Longest accepted description.
const DESCRIPTION_MAX_CHARS: usize = 1000;

/// Validated, trimmed task title.
///
/// Titles keep their original casing for display; [`TaskTitle::normalized`]
/// yields the lowercase form used for case-insensitive uniqueness checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskTitle(String);

impl TaskTitle {
    /// Validates and normalizes a raw title.
    ///
    /// The input is trimmed; the result must be non-empty, at most 255
    /// characters, and contain only ASCII alphanumerics, whitespace, and
    /// hyphens.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the trimmed input is
    /// empty, [`TaskDomainError::InvalidTitle`] when it contains characters
    /// outside the accepted set, and [`TaskDomainError::TitleTooLong`] when
    /// it exceeds the limit.
    pub fn new(raw: &str) -> Result<Self, TaskDomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        if !trimmed
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch.is_whitespace() || ch == '-')
        {
            return Err(TaskDomainError::InvalidTitle(trimmed.to_owned()));
        }
        if trimmed.chars().count() > TITLE_MAX_CHARS {
            return Err(TaskDomainError::TitleTooLong(trimmed.to_owned()));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the title as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the lowercase form used as the uniqueness key.
    #[must_use]
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }
}

impl fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TaskTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validated, trimmed task description.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskDescription(String);

impl TaskDescription {
    /// Validates and trims a raw description.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::DescriptionTooLong`] when the trimmed
    /// input exceeds 1000 characters.
    pub fn new(raw: &str) -> Result<Self, TaskDomainError> {
        let trimmed = raw.trim();
        if trimmed.chars().count() > DESCRIPTION_MAX_CHARS {
            return Err(TaskDomainError::DescriptionTooLong);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the description as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TaskDescription {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
