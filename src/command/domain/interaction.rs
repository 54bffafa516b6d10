//! Inbound interaction events.

use super::{
    DispatchError, Snowflake,
    option::{SUB_COMMAND_GROUP_TYPE, SUB_COMMAND_TYPE},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// One raw option value carried by an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawOption {
    /// Option name.
    pub name: String,
    /// Raw JSON value.
    pub value: Value,
    /// Type code reported by the platform, when present.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<u8>,
}

impl RawOption {
    /// Creates a raw option without a type code.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            kind: None,
        }
    }

    /// Attaches the platform type code.
    #[must_use]
    pub const fn with_type(mut self, code: u8) -> Self {
        self.kind = Some(code);
        self
    }
}

/// Entities referenced by an event, grouped by kind and keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedData {
    /// Users by id.
    #[serde(default)]
    pub users: HashMap<Snowflake, Value>,
    /// Guild member data by user id.
    #[serde(default)]
    pub members: HashMap<Snowflake, Value>,
    /// Roles by id.
    #[serde(default)]
    pub roles: HashMap<Snowflake, Value>,
    /// Channels by id.
    #[serde(default)]
    pub channels: HashMap<Snowflake, Value>,
}

impl ResolvedData {
    /// Returns `true` when no entity was resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
            && self.members.is_empty()
            && self.roles.is_empty()
            && self.channels.is_empty()
    }
}

/// A user invoking a registered command.
///
/// The path is `command_name`, then optionally `group_name`, then
/// optionally `subcommand_name`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionEvent {
    /// Root node name.
    pub command_name: String,
    /// Subgroup name for three-tier paths.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    /// Leaf name under a group or subgroup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcommand_name: Option<String>,
    /// Raw option values in the order the platform sent them.
    #[serde(default)]
    pub options: Vec<RawOption>,
    /// Entities referenced by entity-kind options.
    #[serde(default, skip_serializing_if = "ResolvedData::is_empty")]
    pub resolved: ResolvedData,
}

impl InteractionEvent {
    /// Creates an event for a root command.
    #[must_use]
    pub fn new(command_name: impl Into<String>) -> Self {
        Self {
            command_name: command_name.into(),
            ..Self::default()
        }
    }

    /// Sets the subgroup name.
    #[must_use]
    pub fn group(mut self, name: impl Into<String>) -> Self {
        self.group_name = Some(name.into());
        self
    }

    /// Sets the leaf name under a group.
    #[must_use]
    pub fn subcommand(mut self, name: impl Into<String>) -> Self {
        self.subcommand_name = Some(name.into());
        self
    }

    /// Appends a raw option.
    #[must_use]
    pub fn option(mut self, option: RawOption) -> Self {
        self.options.push(option);
        self
    }

    /// Replaces the resolved-entity table.
    #[must_use]
    pub fn resolved(mut self, resolved: ResolvedData) -> Self {
        self.resolved = resolved;
        self
    }

    /// Returns the path components in tree order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.command_name.as_str())
            .chain(self.group_name.as_deref())
            .chain(self.subcommand_name.as_deref())
    }

    /// Returns the space-separated invocation path.
    #[must_use]
    pub fn path(&self) -> String {
        self.segments().collect::<Vec<_>>().join(" ")
    }

    /// Flattens the platform's nested application-command payload.
    ///
    /// Accepts either the `data` object or a whole interaction carrying
    /// one. Subcommand groups and subcommands arrive as nested options of
    /// type 2 and 1; they become the event path.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::MalformedEvent`] when the payload does not
    /// describe exactly one path through at most three tiers.
    pub fn from_application_command(payload: &Value) -> Result<Self, DispatchError> {
        let data = payload
            .get("data")
            .filter(|data| data.is_object())
            .unwrap_or(payload);
        let native = NativeData::deserialize(data)
            .map_err(|error| DispatchError::MalformedEvent(error.to_string()))?;

        let mut event = Self {
            command_name: native.name,
            resolved: native.resolved,
            ..Self::default()
        };

        let mut options = native.options;
        if let Some(group) = take_nested(&mut options, SUB_COMMAND_GROUP_TYPE)? {
            event.group_name = Some(group.name);
            let mut inner = group.options;
            let leaf = take_nested(&mut inner, SUB_COMMAND_TYPE)?.ok_or_else(|| {
                DispatchError::MalformedEvent("subcommand group carries no subcommand".to_owned())
            })?;
            event.subcommand_name = Some(leaf.name);
            options = leaf.options;
        } else if let Some(leaf) = take_nested(&mut options, SUB_COMMAND_TYPE)? {
            event.subcommand_name = Some(leaf.name);
            options = leaf.options;
        }

        event.options = options
            .into_iter()
            .map(|option| {
                if option.kind == SUB_COMMAND_TYPE || option.kind == SUB_COMMAND_GROUP_TYPE {
                    return Err(DispatchError::MalformedEvent(format!(
                        "'{}' is nested below a command",
                        option.name
                    )));
                }
                let value = option.value.ok_or_else(|| {
                    DispatchError::MalformedEvent(format!("option '{}' has no value", option.name))
                })?;
                Ok(RawOption {
                    name: option.name,
                    value,
                    kind: Some(option.kind),
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(event)
    }
}

#[derive(Deserialize)]
struct NativeData {
    name: String,
    #[serde(default)]
    options: Vec<NativeOption>,
    #[serde(default)]
    resolved: ResolvedData,
}

#[derive(Deserialize)]
struct NativeOption {
    name: String,
    #[serde(rename = "type")]
    kind: u8,
    #[serde(default)]
    value: Option<Value>,
    #[serde(default)]
    options: Vec<NativeOption>,
}

/// Removes the single nested entry of type `code`, if the options are one.
fn take_nested(
    options: &mut Vec<NativeOption>,
    code: u8,
) -> Result<Option<NativeOption>, DispatchError> {
    if !options.iter().any(|option| option.kind == code) {
        return Ok(None);
    }
    if options.len() != 1 {
        return Err(DispatchError::MalformedEvent(
            "a subcommand must be the only option at its level".to_owned(),
        ));
    }
    Ok(options.pop())
}
