//! Closed choice sets for string, integer and number options.

use super::SchemaValidationError;
use super::name::MAX_DESCRIPTION_LENGTH;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of members in a choice set.
pub const MAX_CHOICES: usize = 25;

/// The raw value of a choice, as exchanged with the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChoiceValue {
    /// A string choice value.
    String(String),
    /// An integer choice value.
    Integer(i64),
    /// A floating-point choice value.
    Number(f64),
}

impl ChoiceValue {
    /// Returns the value kind.
    #[must_use]
    pub const fn kind(&self) -> ChoiceKind {
        match self {
            Self::String(_) => ChoiceKind::String,
            Self::Integer(_) => ChoiceKind::Integer,
            Self::Number(_) => ChoiceKind::Number,
        }
    }
}

// Integers and integral floats compare equal: the platform may echo a
// number choice `2.0` back as `2`.
impl PartialEq for ChoiceValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::String(left), Self::String(right)) => left == right,
            (Self::Integer(left), Self::Integer(right)) => left == right,
            (Self::Number(left), Self::Number(right)) => left.total_cmp(right).is_eq(),
            (Self::Integer(integer), Self::Number(number))
            | (Self::Number(number), Self::Integer(integer)) => integral_eq(*integer, *number),
            _ => false,
        }
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "choice values are small enumerations well inside f64's exact range"
)]
fn integral_eq(integer: i64, number: f64) -> bool {
    number.fract() == 0.0 && (integer as f64).total_cmp(&number).is_eq()
}

impl fmt::Display for ChoiceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(value) => write!(f, "{value:?}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for ChoiceValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for ChoiceValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for ChoiceValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for ChoiceValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// The base kind shared by every member of a choice set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChoiceKind {
    /// String-valued choices.
    String,
    /// Integer-valued choices.
    Integer,
    /// Number-valued choices.
    Number,
}

impl fmt::Display for ChoiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
        })
    }
}

/// A single labelled member of a choice set.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    label: String,
    value: ChoiceValue,
}

impl Choice {
    /// Creates a choice with a user-facing label and a raw value.
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl Into<ChoiceValue>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Returns the user-facing label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn value(&self) -> &ChoiceValue {
        &self.value
    }
}

impl PartialEq<ChoiceValue> for Choice {
    fn eq(&self, other: &ChoiceValue) -> bool {
        self.value == *other
    }
}

/// A named, closed set of choices.
///
/// An inbound value is valid for the set iff it equals one member's raw
/// value.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceSet {
    name: String,
    kind: ChoiceKind,
    members: Vec<Choice>,
}

impl ChoiceSet {
    /// Creates a validated choice set.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaValidationError`] when the set has fewer than 1 or
    /// more than 25 members, members mix value kinds, values repeat, or a
    /// label or value breaks platform limits.
    pub fn new(
        name: impl Into<String>,
        choices: impl IntoIterator<Item = Choice>,
    ) -> Result<Self, SchemaValidationError> {
        let set = name.into();
        let members: Vec<Choice> = choices.into_iter().collect();

        if members.is_empty() || members.len() > MAX_CHOICES {
            return Err(SchemaValidationError::ChoiceCount {
                set,
                count: members.len(),
            });
        }

        let mut shared_kind = None;
        for (index, member) in members.iter().enumerate() {
            validate_member(&set, member)?;

            let member_kind = member.value.kind();
            match shared_kind {
                None => shared_kind = Some(member_kind),
                Some(expected) if expected != member_kind => {
                    return Err(SchemaValidationError::MixedChoiceKinds {
                        set,
                        member: member.label.clone(),
                    });
                }
                Some(_) => {}
            }

            if members
                .iter()
                .take(index)
                .any(|earlier| earlier.value == member.value)
            {
                return Err(SchemaValidationError::DuplicateChoiceValue {
                    set,
                    value: member.value.to_string(),
                });
            }
        }

        let kind = shared_kind.ok_or_else(|| SchemaValidationError::ChoiceCount {
            set: set.clone(),
            count: 0,
        })?;
        Ok(Self {
            name: set,
            kind,
            members,
        })
    }

    /// Creates a string choice set from `(label, value)` pairs.
    ///
    /// The label is what users see; the value is what handlers receive.
    ///
    /// # Errors
    ///
    /// See [`ChoiceSet::new`].
    pub fn strings<'a>(
        name: impl Into<String>,
        members: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, SchemaValidationError> {
        Self::new(
            name,
            members
                .into_iter()
                .map(|(label, value)| Choice::new(label, value)),
        )
    }

    /// Creates an integer choice set from `(label, value)` pairs.
    ///
    /// # Errors
    ///
    /// See [`ChoiceSet::new`].
    pub fn integers<'a>(
        name: impl Into<String>,
        members: impl IntoIterator<Item = (&'a str, i64)>,
    ) -> Result<Self, SchemaValidationError> {
        Self::new(
            name,
            members
                .into_iter()
                .map(|(label, value)| Choice::new(label, value)),
        )
    }

    /// Creates a number choice set from `(label, value)` pairs.
    ///
    /// # Errors
    ///
    /// See [`ChoiceSet::new`].
    pub fn numbers<'a>(
        name: impl Into<String>,
        members: impl IntoIterator<Item = (&'a str, f64)>,
    ) -> Result<Self, SchemaValidationError> {
        Self::new(
            name,
            members
                .into_iter()
                .map(|(label, value)| Choice::new(label, value)),
        )
    }

    /// Returns the set name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value kind shared by every member.
    #[must_use]
    pub const fn kind(&self) -> ChoiceKind {
        self.kind
    }

    /// Returns the members in declaration order.
    #[must_use]
    pub fn members(&self) -> &[Choice] {
        &self.members
    }

    /// Finds the member whose raw value equals `value`.
    #[must_use]
    pub fn find(&self, value: &ChoiceValue) -> Option<&Choice> {
        self.members.iter().find(|member| member.value == *value)
    }

    /// Finds a member by label.
    #[must_use]
    pub fn member(&self, label: &str) -> Option<&Choice> {
        self.members.iter().find(|member| member.label == label)
    }
}

fn validate_member(set: &str, member: &Choice) -> Result<(), SchemaValidationError> {
    let label_length = member.label.trim().chars().count();
    if label_length == 0 || label_length > MAX_DESCRIPTION_LENGTH {
        return Err(SchemaValidationError::InvalidChoice {
            set: set.to_owned(),
            reason: format!("label '{}' must be 1-100 characters", member.label),
        });
    }
    match &member.value {
        ChoiceValue::String(value)
            if value.is_empty() || value.chars().count() > MAX_DESCRIPTION_LENGTH =>
        {
            Err(SchemaValidationError::InvalidChoice {
                set: set.to_owned(),
                reason: format!("value of '{}' must be 1-100 characters", member.label),
            })
        }
        ChoiceValue::Number(value) if !value.is_finite() => {
            Err(SchemaValidationError::InvalidChoice {
                set: set.to_owned(),
                reason: format!("value of '{}' must be finite", member.label),
            })
        }
        _ => Ok(()),
    }
}

/// A coerced choice argument: the member of `set` the user picked.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedChoice {
    set: String,
    choice: Choice,
}

impl SelectedChoice {
    /// Records that `choice` of `set` was selected.
    #[must_use]
    pub fn new(set: impl Into<String>, choice: Choice) -> Self {
        Self {
            set: set.into(),
            choice,
        }
    }

    /// Returns the name of the set the choice belongs to.
    #[must_use]
    pub fn set(&self) -> &str {
        &self.set
    }

    /// Returns the user-facing label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.choice.label()
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn value(&self) -> &ChoiceValue {
        self.choice.value()
    }
}

impl PartialEq<ChoiceValue> for SelectedChoice {
    fn eq(&self, other: &ChoiceValue) -> bool {
        self.choice.value == *other
    }
}

impl PartialEq<Choice> for SelectedChoice {
    fn eq(&self, other: &Choice) -> bool {
        self.choice == *other
    }
}
