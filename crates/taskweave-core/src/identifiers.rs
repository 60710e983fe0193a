//! Validated task identifiers.
//!
//! Task ids share one set of rules whether they are minted by a planner or
//! supplied by a caller:
//! - Non-empty, at most 128 characters
//! - No leading or trailing whitespace
//! - Only alphanumeric characters, hyphens (`-`), underscores (`_`) and dots (`.`)
//!
//! ```rust
//! use taskweave_core::identifiers::TaskId;
//!
//! let id = TaskId::parse("task-final").unwrap();
//! assert_eq!(id.as_str(), "task-final");
//!
//! assert!(TaskId::parse("").is_err());
//! assert!(TaskId::parse("task one").is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum length for task identifiers
pub const MAX_ID_LENGTH: usize = 128;

/// Error type for identifier validation failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdValidationError {
    /// The identifier string is empty
    #[error("Identifier cannot be empty")]
    Empty,
    /// The identifier has leading or trailing whitespace
    #[error("Identifier cannot have leading or trailing whitespace")]
    LeadingTrailingWhitespace,
    /// The identifier contains invalid characters
    #[error(
        "Identifier can only contain alphanumeric characters, hyphens, underscores, and dots"
    )]
    InvalidCharacters,
    /// The identifier exceeds the maximum length
    #[error("Identifier too long ({length} chars, max {max})")]
    TooLong { length: usize, max: usize },
}

fn validate(id: &str) -> Result<&str, IdValidationError> {
    if id.is_empty() {
        return Err(IdValidationError::Empty);
    }
    if id != id.trim() {
        return Err(IdValidationError::LeadingTrailingWhitespace);
    }
    if id.len() > MAX_ID_LENGTH {
        return Err(IdValidationError::TooLong {
            length: id.len(),
            max: MAX_ID_LENGTH,
        });
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(IdValidationError::InvalidCharacters);
    }
    Ok(id)
}

/// Unique identifier of a task within a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId(String);

impl TaskId {
    /// Parse and validate a task ID from a string
    pub fn parse(id: impl AsRef<str>) -> Result<Self, IdValidationError> {
        validate(id.as_ref()).map(|s| Self(s.to_string()))
    }

    /// Mint a fresh id of the form `task-<8 hex>`
    pub fn generate() -> Self {
        let uuid = uuid::Uuid::new_v4().simple().to_string();
        Self(format!("task-{}", &uuid[..8]))
    }

    /// Get the task ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = IdValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<TaskId> for String {
    fn from(id: TaskId) -> Self {
        id.0
    }
}

impl TryFrom<String> for TaskId {
    type Error = IdValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
