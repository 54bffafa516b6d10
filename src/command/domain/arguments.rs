//! The coerced argument set passed to a handler.

use super::{
    ArgumentError, ChoiceValue, SelectedChoice,
    entity::{Channel, Mentionable, ResolvedEntity, Role, User},
};

/// A coerced option value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentValue {
    /// A string.
    String(String),
    /// An integer.
    Integer(i64),
    /// A number.
    Number(f64),
    /// A flag.
    Boolean(bool),
    /// A resolved user.
    User(ResolvedEntity),
    /// A resolved role.
    Role(ResolvedEntity),
    /// A resolved channel.
    Channel(ResolvedEntity),
    /// A resolved user or role.
    Mentionable(ResolvedEntity),
    /// A member of a choice set.
    Choice(SelectedChoice),
}

impl ArgumentValue {
    /// Returns a short name of the value's kind.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Integer(_) => "integer",
            Self::Number(_) => "number",
            Self::Boolean(_) => "boolean",
            Self::User(_) => "user",
            Self::Role(_) => "role",
            Self::Channel(_) => "channel",
            Self::Mentionable(_) => "mentionable",
            Self::Choice(_) => "choice",
        }
    }
}

/// Conversion from a coerced value into a handler-facing type.
pub trait FromArgument: Sized {
    /// Kind name used in mismatch errors.
    const EXPECTED: &'static str;

    /// Converts `value`, returning `None` when the kind differs.
    fn from_argument(value: &ArgumentValue) -> Option<Self>;
}

impl FromArgument for String {
    const EXPECTED: &'static str = "string";

    fn from_argument(value: &ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::String(text) => Some(text.clone()),
            ArgumentValue::Choice(choice) => match choice.value() {
                ChoiceValue::String(text) => Some(text.clone()),
                _ => None,
            },
            _ => None,
        }
    }
}

impl FromArgument for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_argument(value: &ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::Integer(number) => Some(*number),
            ArgumentValue::Choice(choice) => match choice.value() {
                ChoiceValue::Integer(number) => Some(*number),
                _ => None,
            },
            _ => None,
        }
    }
}

impl FromArgument for f64 {
    const EXPECTED: &'static str = "number";

    fn from_argument(value: &ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::Number(number) => Some(*number),
            ArgumentValue::Choice(choice) => match choice.value() {
                ChoiceValue::Number(number) => Some(*number),
                _ => None,
            },
            _ => None,
        }
    }
}

impl FromArgument for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_argument(value: &ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::Boolean(flag) => Some(*flag),
            _ => None,
        }
    }
}

impl FromArgument for User {
    const EXPECTED: &'static str = "user";

    fn from_argument(value: &ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::User(entity) => Some(Self(entity.clone())),
            _ => None,
        }
    }
}

impl FromArgument for Role {
    const EXPECTED: &'static str = "role";

    fn from_argument(value: &ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::Role(entity) => Some(Self(entity.clone())),
            _ => None,
        }
    }
}

impl FromArgument for Channel {
    const EXPECTED: &'static str = "channel";

    fn from_argument(value: &ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::Channel(entity) => Some(Self(entity.clone())),
            _ => None,
        }
    }
}

impl FromArgument for Mentionable {
    const EXPECTED: &'static str = "mentionable";

    fn from_argument(value: &ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::Mentionable(entity) => Some(Self(entity.clone())),
            _ => None,
        }
    }
}

impl FromArgument for SelectedChoice {
    const EXPECTED: &'static str = "choice";

    fn from_argument(value: &ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::Choice(choice) => Some(choice.clone()),
            _ => None,
        }
    }
}

/// Ordered, named arguments for one invocation.
///
/// Holds exactly one entry per declared option, in declared order. An
/// option the user did not provide is stored as `None`, never as a
/// default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    entries: Vec<(String, Option<ArgumentValue>)>,
}

impl Arguments {
    pub(crate) fn push(&mut self, name: impl Into<String>, value: Option<ArgumentValue>) {
        self.entries.push((name.into(), value));
    }

    /// Returns the raw entry for `name`.
    ///
    /// The outer `Option` is `None` for undeclared names; the inner one is
    /// `None` when the option was not provided.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<Option<&ArgumentValue>> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, value)| value.as_ref())
    }

    /// Returns the typed value of an optional argument.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::Unknown`] for undeclared names and
    /// [`ArgumentError::TypeMismatch`] when the value has another kind.
    pub fn get<T: FromArgument>(&self, name: &str) -> Result<Option<T>, ArgumentError> {
        let Some(slot) = self.value(name) else {
            return Err(ArgumentError::Unknown(name.to_owned()));
        };
        slot.map(|value| {
            T::from_argument(value).ok_or_else(|| ArgumentError::TypeMismatch {
                name: name.to_owned(),
                expected: T::EXPECTED,
                found: value.kind_name(),
            })
        })
        .transpose()
    }

    /// Returns the typed value of an argument that must be present.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::Missing`] when the option was not provided,
    /// in addition to the errors of [`Arguments::get`].
    pub fn require<T: FromArgument>(&self, name: &str) -> Result<T, ArgumentError> {
        self.get(name)?
            .ok_or_else(|| ArgumentError::Missing(name.to_owned()))
    }

    /// Iterates over entries in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&ArgumentValue>)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_ref()))
    }

    /// Returns the number of declared options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the command declares no options.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
