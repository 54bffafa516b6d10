//! Wire schema for command registration, and the serializer producing it.
//!
//! Serialisation is a pure function of the tree. Two nodes are equivalent
//! exactly when their payloads compare equal, which is what the registrar
//! diffs on. Legacy permission overlays are never emitted.

use super::{
    ChoiceValue, Command, CommandNode, CommandOption, CommandTree, GroupMember, OptionBounds,
    SubGroup,
    option::{SUB_COMMAND_GROUP_TYPE, SUB_COMMAND_TYPE},
};
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Platform type code for a chat-input command.
pub const CHAT_INPUT_TYPE: u8 = 1;

const fn chat_input() -> u8 {
    CHAT_INPUT_TYPE
}

/// The registration payload of one root node.
///
/// Unknown fields returned by the platform (ids, versions, permission
/// fields) are ignored on deserialisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandPayload {
    /// Root node name.
    pub name: String,
    /// Root node description.
    pub description: String,
    /// Command type, always chat input.
    #[serde(rename = "type", default = "chat_input")]
    pub kind: u8,
    /// Options, or subcommand entries for groups.
    #[serde(default)]
    pub options: Vec<OptionPayload>,
}

/// One option, subcommand or subcommand group entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionPayload {
    /// Entry name.
    pub name: String,
    /// Entry description.
    pub description: String,
    /// Platform type code.
    #[serde(rename = "type")]
    pub kind: u8,
    /// Whether the option must be provided.
    #[serde(default)]
    pub required: bool,
    /// Allowed values, for choice kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<ChoicePayload>>,
    /// Nested entries, for subcommands and subcommand groups.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<Self>,
    /// Smallest accepted value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<Number>,
    /// Largest accepted value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<Number>,
    /// Shortest accepted string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u16>,
    /// Longest accepted string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u16>,
}

impl OptionPayload {
    fn entry(name: &str, description: &str, kind: u8) -> Self {
        Self {
            name: name.to_owned(),
            description: description.to_owned(),
            kind,
            required: false,
            choices: None,
            options: Vec::new(),
            min_value: None,
            max_value: None,
            min_length: None,
            max_length: None,
        }
    }
}

/// One member of a choice list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoicePayload {
    /// User-facing label.
    pub name: String,
    /// Raw value.
    pub value: ChoiceValue,
}

/// Serialises a root node.
#[must_use]
pub fn serialize_node<C>(node: &CommandNode<C>) -> CommandPayload {
    match node {
        CommandNode::Command(command) => CommandPayload {
            name: command.name().to_string(),
            description: command.description().to_owned(),
            kind: CHAT_INPUT_TYPE,
            options: command.options().iter().map(serialize_option).collect(),
        },
        CommandNode::Group(group) => CommandPayload {
            name: group.name().to_string(),
            description: group.description().to_owned(),
            kind: CHAT_INPUT_TYPE,
            options: group
                .members()
                .map(|member| match member {
                    GroupMember::Command(command) => subcommand_entry(command),
                    GroupMember::SubGroup(subgroup) => subgroup_entry(subgroup),
                })
                .collect(),
        },
    }
}

/// Serialises every root node of `tree` in declaration order.
#[must_use]
pub fn serialize_tree<C>(tree: &CommandTree<C>) -> Vec<CommandPayload> {
    tree.roots().map(serialize_node).collect()
}

fn subcommand_entry<C>(command: &Command<C>) -> OptionPayload {
    let mut entry = OptionPayload::entry(
        command.name().as_str(),
        command.description(),
        SUB_COMMAND_TYPE,
    );
    entry.options = command.options().iter().map(serialize_option).collect();
    entry
}

fn subgroup_entry<C>(subgroup: &SubGroup<C>) -> OptionPayload {
    let mut entry = OptionPayload::entry(
        subgroup.name().as_str(),
        subgroup.description(),
        SUB_COMMAND_GROUP_TYPE,
    );
    entry.options = subgroup.commands().map(subcommand_entry).collect();
    entry
}

fn serialize_option(option: &CommandOption) -> OptionPayload {
    let mut entry = OptionPayload::entry(
        option.name().as_str(),
        option.description(),
        option.kind().type_code(),
    );
    entry.required = option.is_required();
    entry.choices = option.choices().map(|set| {
        set.members()
            .iter()
            .map(|choice| ChoicePayload {
                name: choice.label().to_owned(),
                value: choice.value().clone(),
            })
            .collect()
    });
    match option.bounds() {
        Some(OptionBounds::Integer { min, max }) => {
            entry.min_value = min.map(Number::from);
            entry.max_value = max.map(Number::from);
        }
        Some(OptionBounds::Number { min, max }) => {
            entry.min_value = min.and_then(Number::from_f64);
            entry.max_value = max.and_then(Number::from_f64);
        }
        Some(OptionBounds::Length { min, max }) => {
            entry.min_length = *min;
            entry.max_length = *max;
        }
        None => {}
    }
    entry
}
