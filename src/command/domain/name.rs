//! Validated names and descriptions for commands, namespaces and options.

use super::SchemaValidationError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Maximum length of a command, namespace or option name.
pub const MAX_NAME_LENGTH: usize = 32;

/// Maximum length of any description or choice label.
pub const MAX_DESCRIPTION_LENGTH: usize = 100;

/// A validated node or option name.
///
/// Names are trimmed and lowercased, then restricted to 1–32 characters of
/// `[a-z0-9_-]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandName(String);

impl CommandName {
    /// Creates a validated name.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaValidationError::InvalidName`] when the normalised
    /// value is empty, longer than 32 characters, or contains characters
    /// outside `[a-z0-9_-]`.
    pub fn new(value: impl AsRef<str>) -> Result<Self, SchemaValidationError> {
        let normalized = value.as_ref().trim().to_lowercase();

        if normalized.is_empty() {
            return Err(invalid_name(normalized, "name must not be empty"));
        }

        if normalized.chars().count() > MAX_NAME_LENGTH {
            return Err(invalid_name(normalized, "name exceeds 32 characters"));
        }

        let is_valid = normalized
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_'));
        if !is_valid {
            return Err(invalid_name(
                normalized,
                "only lowercase letters, digits, '-' and '_' are allowed",
            ));
        }

        Ok(Self(normalized))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CommandName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for CommandName {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn invalid_name(name: String, reason: &str) -> SchemaValidationError {
    SchemaValidationError::InvalidName {
        name,
        reason: reason.to_owned(),
    }
}

/// Trims and validates a node description.
///
/// # Errors
///
/// Returns [`SchemaValidationError::MissingDescription`] for blank text and
/// [`SchemaValidationError::DescriptionTooLong`] beyond 100 characters.
pub fn validate_description(node: &str, text: &str) -> Result<String, SchemaValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SchemaValidationError::MissingDescription {
            node: node.to_owned(),
        });
    }
    let length = trimmed.chars().count();
    if length > MAX_DESCRIPTION_LENGTH {
        return Err(SchemaValidationError::DescriptionTooLong {
            node: node.to_owned(),
            length,
        });
    }
    Ok(trimmed.to_owned())
}
