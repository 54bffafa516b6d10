//! Coerces raw event option values into a command's declared argument set.

use crate::command::{
    domain::{
        ArgumentValue, Arguments, ChoiceValue, CommandOption, DispatchError, OptionBounds,
        OptionKind, RawOption, SelectedChoice, Snowflake,
    },
    ports::EntityLookup,
};
use serde::Deserialize;
use serde_json::Value;

/// Builds the argument set for `options`, one entry per declared option.
///
/// Absent and `null` values become `None`; they never default.
pub(crate) fn coerce_arguments(
    command: &str,
    options: &[CommandOption],
    raw: &[RawOption],
    lookup: &impl EntityLookup,
) -> Result<Arguments, DispatchError> {
    let is_declared = |value: &RawOption| {
        options
            .iter()
            .any(|option| option.name().as_str() == value.name)
    };
    if let Some(unknown) = raw.iter().find(|&value| !is_declared(value)) {
        return Err(DispatchError::UnknownOption {
            command: command.to_owned(),
            option: unknown.name.clone(),
        });
    }

    let mut arguments = Arguments::default();
    for option in options {
        let provided = raw
            .iter()
            .find(|value| value.name == option.name().as_str())
            .filter(|value| !value.value.is_null());

        let Some(value) = provided else {
            if option.is_required() {
                return Err(DispatchError::MissingRequiredOption {
                    command: command.to_owned(),
                    option: option.name().to_string(),
                });
            }
            arguments.push(option.name().as_str(), None);
            continue;
        };

        let expected = option.kind().type_code();
        if let Some(found) = value.kind.filter(|code| *code != expected) {
            return Err(DispatchError::KindMismatch {
                command: command.to_owned(),
                option: option.name().to_string(),
                expected,
                found,
            });
        }

        let coerced = OptionCoercer {
            command,
            option,
            lookup,
        }
        .coerce(&value.value)?;
        arguments.push(option.name().as_str(), Some(coerced));
    }
    Ok(arguments)
}

struct OptionCoercer<'a, L> {
    command: &'a str,
    option: &'a CommandOption,
    lookup: &'a L,
}

impl<L: EntityLookup> OptionCoercer<'_, L> {
    fn coerce(&self, value: &Value) -> Result<ArgumentValue, DispatchError> {
        match self.option.kind() {
            OptionKind::String => {
                let text = value
                    .as_str()
                    .ok_or_else(|| self.invalid("expected a string"))?;
                self.check_bounds(|bounds| bounds.admits_length(text))?;
                Ok(ArgumentValue::String(text.to_owned()))
            }
            OptionKind::Integer => {
                let number = value
                    .as_i64()
                    .ok_or_else(|| self.invalid("expected an integer"))?;
                self.check_bounds(|bounds| bounds.admits_integer(number))?;
                Ok(ArgumentValue::Integer(number))
            }
            OptionKind::Number => {
                let number = value
                    .as_f64()
                    .ok_or_else(|| self.invalid("expected a number"))?;
                self.check_bounds(|bounds| bounds.admits_number(number))?;
                Ok(ArgumentValue::Number(number))
            }
            OptionKind::Boolean => value
                .as_bool()
                .map(ArgumentValue::Boolean)
                .ok_or_else(|| self.invalid("expected a boolean")),
            OptionKind::User => self
                .resolve(value, |id| self.lookup.user(id))
                .map(ArgumentValue::User),
            OptionKind::Role => self
                .resolve(value, |id| self.lookup.role(id))
                .map(ArgumentValue::Role),
            OptionKind::Channel => self
                .resolve(value, |id| self.lookup.channel(id))
                .map(ArgumentValue::Channel),
            OptionKind::Mentionable => self
                .resolve(value, |id| self.lookup.mentionable(id))
                .map(ArgumentValue::Mentionable),
            OptionKind::StringChoice | OptionKind::IntegerChoice | OptionKind::NumberChoice => {
                self.select(value).map(ArgumentValue::Choice)
            }
        }
    }

    fn resolve<T>(
        &self,
        value: &Value,
        find: impl FnOnce(Snowflake) -> Option<T>,
    ) -> Result<T, DispatchError> {
        let id = Snowflake::deserialize(value)
            .map_err(|error| self.invalid(&format!("expected an entity id: {error}")))?;
        find(id).ok_or_else(|| DispatchError::UnresolvedEntity {
            command: self.command.to_owned(),
            option: self.option.name().to_string(),
            id,
        })
    }

    fn select(&self, value: &Value) -> Result<SelectedChoice, DispatchError> {
        let set = self
            .option
            .choices()
            .ok_or_else(|| self.invalid("no choice set is declared"))?;
        let raw = ChoiceValue::deserialize(value)
            .map_err(|_| self.invalid("expected a string or number choice"))?;
        set.find(&raw)
            .map(|choice| SelectedChoice::new(set.name(), choice.clone()))
            .ok_or_else(|| DispatchError::UnknownChoice {
                command: self.command.to_owned(),
                option: self.option.name().to_string(),
                value: raw.to_string(),
            })
    }

    fn check_bounds(
        &self,
        admits: impl FnOnce(&OptionBounds) -> Result<(), String>,
    ) -> Result<(), DispatchError> {
        self.option
            .bounds()
            .map_or(Ok(()), admits)
            .map_err(|reason| DispatchError::OutOfBounds {
                command: self.command.to_owned(),
                option: self.option.name().to_string(),
                reason,
            })
    }

    fn invalid(&self, reason: &str) -> DispatchError {
        DispatchError::InvalidValue {
            command: self.command.to_owned(),
            option: self.option.name().to_string(),
            reason: reason.to_owned(),
        }
    }
}
