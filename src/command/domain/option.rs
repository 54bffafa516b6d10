//! The option model: one typed, named parameter of a command.

use super::{ChoiceKind, ChoiceSet, CommandName};
use std::fmt;

/// Platform type code for a subcommand entry.
pub const SUB_COMMAND_TYPE: u8 = 1;

/// Platform type code for a subcommand group entry.
pub const SUB_COMMAND_GROUP_TYPE: u8 = 2;

/// Maximum string length the platform accepts for string bounds.
pub const MAX_STRING_LENGTH: u16 = 6000;

/// The kind of value an option accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
    /// Free-form text.
    String,
    /// Whole number.
    Integer,
    /// Real number.
    Number,
    /// Flag.
    Boolean,
    /// A user.
    User,
    /// A role.
    Role,
    /// A channel.
    Channel,
    /// A user or a role.
    Mentionable,
    /// One of a closed set of strings.
    StringChoice,
    /// One of a closed set of integers.
    IntegerChoice,
    /// One of a closed set of numbers.
    NumberChoice,
}

impl OptionKind {
    /// Returns the platform type code.
    ///
    /// Choice kinds share the code of their base kind.
    #[must_use]
    pub const fn type_code(self) -> u8 {
        match self {
            Self::String | Self::StringChoice => 3,
            Self::Integer | Self::IntegerChoice => 4,
            Self::Boolean => 5,
            Self::User => 6,
            Self::Channel => 7,
            Self::Role => 8,
            Self::Mentionable => 9,
            Self::Number | Self::NumberChoice => 10,
        }
    }

    /// Returns the choice kind for a choice set's base kind.
    #[must_use]
    pub const fn for_choices(kind: ChoiceKind) -> Self {
        match kind {
            ChoiceKind::String => Self::StringChoice,
            ChoiceKind::Integer => Self::IntegerChoice,
            ChoiceKind::Number => Self::NumberChoice,
        }
    }

    /// Returns `true` for the three choice kinds.
    #[must_use]
    pub const fn is_choice(self) -> bool {
        matches!(
            self,
            Self::StringChoice | Self::IntegerChoice | Self::NumberChoice
        )
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::User => "user",
            Self::Role => "role",
            Self::Channel => "channel",
            Self::Mentionable => "mentionable",
            Self::StringChoice => "string choice",
            Self::IntegerChoice => "integer choice",
            Self::NumberChoice => "number choice",
        })
    }
}

/// Value bounds for numeric options, or length bounds for string options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OptionBounds {
    /// Inclusive bounds for integer options.
    Integer {
        /// Smallest accepted value.
        min: Option<i64>,
        /// Largest accepted value.
        max: Option<i64>,
    },
    /// Inclusive bounds for number options.
    Number {
        /// Smallest accepted value.
        min: Option<f64>,
        /// Largest accepted value.
        max: Option<f64>,
    },
    /// Inclusive length bounds for string options.
    Length {
        /// Shortest accepted length.
        min: Option<u16>,
        /// Longest accepted length.
        max: Option<u16>,
    },
}

impl OptionBounds {
    /// Bounds for an integer option.
    #[must_use]
    pub const fn integer(min: Option<i64>, max: Option<i64>) -> Self {
        Self::Integer { min, max }
    }

    /// Bounds for a number option.
    #[must_use]
    pub const fn number(min: Option<f64>, max: Option<f64>) -> Self {
        Self::Number { min, max }
    }

    /// Length bounds for a string option.
    #[must_use]
    pub const fn length(min: Option<u16>, max: Option<u16>) -> Self {
        Self::Length { min, max }
    }

    /// Checks the bounds are well formed and fit `kind`.
    ///
    /// Returns the rejection reason on failure.
    pub(crate) fn check_against(&self, kind: OptionKind) -> Result<(), String> {
        match (self, kind) {
            (Self::Integer { min, max }, OptionKind::Integer) => {
                ordered(min.as_ref(), max.as_ref())
            }
            (Self::Number { min, max }, OptionKind::Number) => {
                if min.is_some_and(|value| !value.is_finite())
                    || max.is_some_and(|value| !value.is_finite())
                {
                    return Err("number bounds must be finite".to_owned());
                }
                ordered(min.as_ref(), max.as_ref())
            }
            (Self::Length { min, max }, OptionKind::String) => {
                if min.is_some_and(|value| value > MAX_STRING_LENGTH)
                    || max.is_some_and(|value| value == 0 || value > MAX_STRING_LENGTH)
                {
                    return Err(format!(
                        "length bounds must lie within 0-{MAX_STRING_LENGTH} and allow at least one character"
                    ));
                }
                ordered(min.as_ref(), max.as_ref())
            }
            (_, other) => Err(format!("{other} options do not accept these bounds")),
        }
    }

    /// Checks an integer against the bounds.
    pub(crate) fn admits_integer(&self, value: i64) -> Result<(), String> {
        match self {
            Self::Integer { min, max } => within(value, min.as_ref(), max.as_ref()),
            _ => Ok(()),
        }
    }

    /// Checks a number against the bounds.
    pub(crate) fn admits_number(&self, value: f64) -> Result<(), String> {
        match self {
            Self::Number { min, max } => within(value, min.as_ref(), max.as_ref()),
            _ => Ok(()),
        }
    }

    /// Checks a string's character count against the bounds.
    pub(crate) fn admits_length(&self, value: &str) -> Result<(), String> {
        match self {
            Self::Length { min, max } => {
                let length = value.chars().count();
                within(
                    length,
                    min.map(usize::from).as_ref(),
                    max.map(usize::from).as_ref(),
                )
            }
            _ => Ok(()),
        }
    }
}

fn ordered<T: PartialOrd>(min: Option<&T>, max: Option<&T>) -> Result<(), String> {
    match (min, max) {
        (Some(low), Some(high)) if low > high => Err("minimum exceeds maximum".to_owned()),
        _ => Ok(()),
    }
}

fn within<T: PartialOrd + fmt::Display>(
    value: T,
    min: Option<&T>,
    max: Option<&T>,
) -> Result<(), String> {
    if let Some(low) = min.filter(|low| value < **low) {
        return Err(format!("{value} is below the minimum of {low}"));
    }
    if let Some(high) = max.filter(|high| value > **high) {
        return Err(format!("{value} is above the maximum of {high}"));
    }
    Ok(())
}

/// A validated command option.
///
/// Options are produced by the signature introspector; the fields mirror
/// what the platform is told about the parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOption {
    name: CommandName,
    description: String,
    kind: OptionKind,
    required: bool,
    choices: Option<ChoiceSet>,
    bounds: Option<OptionBounds>,
}

impl CommandOption {
    pub(crate) const fn new(
        name: CommandName,
        description: String,
        kind: OptionKind,
        required: bool,
    ) -> Self {
        Self {
            name,
            description,
            kind,
            required,
            choices: None,
            bounds: None,
        }
    }

    pub(crate) fn with_choices(mut self, choices: ChoiceSet) -> Self {
        self.choices = Some(choices);
        self
    }

    pub(crate) const fn with_bounds(mut self, bounds: OptionBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Returns the option name.
    #[must_use]
    pub const fn name(&self) -> &CommandName {
        &self.name
    }

    /// Returns the option description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the option kind.
    #[must_use]
    pub const fn kind(&self) -> OptionKind {
        self.kind
    }

    /// Returns `true` when the option must be provided.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the choice set for choice kinds.
    #[must_use]
    pub const fn choices(&self) -> Option<&ChoiceSet> {
        self.choices.as_ref()
    }

    /// Returns the declared bounds.
    #[must_use]
    pub const fn bounds(&self) -> Option<&OptionBounds> {
        self.bounds.as_ref()
    }
}
