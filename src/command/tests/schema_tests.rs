//! Tests for the registration schema serializer.

use rstest::rstest;
use serde_json::json;

use super::support::{leaf, noop, roll_signature};
use crate::command::domain::{
    ChoiceSet, CommandDecl, CommandPayload, CommandTree, CommandTreeBuilder, HandlerSignature,
    LegacyPermissions, NamespaceDecl, OptionBounds, Parameter, serialize_tree,
};

fn tree_of(commands: Vec<CommandDecl<()>>, namespaces: Vec<NamespaceDecl<()>>) -> CommandTree<()> {
    let mut builder = CommandTreeBuilder::new();
    for command in commands {
        builder.add_command(command).expect("valid command");
    }
    for namespace in namespaces {
        builder.add_namespace(namespace).expect("valid namespace");
    }
    builder.build()
}

#[rstest]
fn roll_serializes_to_the_platform_shape() {
    let tree = tree_of(vec![CommandDecl::new(roll_signature(), noop())], vec![]);

    let payload = serde_json::to_value(tree.schema()).expect("schema serializes");

    assert_eq!(
        payload,
        json!([{
            "name": "roll",
            "description": "Roll a die.",
            "type": 1,
            "options": [{
                "name": "sides",
                "description": "How many sides (default 6).",
                "type": 4,
                "required": false
            }]
        }])
    );
}

#[rstest]
fn groups_and_subgroups_use_entry_type_codes() {
    let admin = NamespaceDecl::new("admin")
        .doc("Administration.")
        .command(leaf("ping"))
        .namespace(
            NamespaceDecl::new("roles")
                .description("Role management.")
                .command(leaf("add")),
        );
    let tree = tree_of(vec![], vec![admin]);

    let payload = serde_json::to_value(serialize_tree(&tree)).expect("schema serializes");

    assert_eq!(
        payload,
        json!([{
            "name": "admin",
            "description": "Administration.",
            "type": 1,
            "options": [
                {
                    "name": "ping",
                    "description": "Runs ping.",
                    "type": 1,
                    "required": false
                },
                {
                    "name": "roles",
                    "description": "Role management.",
                    "type": 2,
                    "required": false,
                    "options": [{
                        "name": "add",
                        "description": "Runs add.",
                        "type": 1,
                        "required": false
                    }]
                }
            ]
        }])
    );
}

#[rstest]
fn choices_and_bounds_appear_only_when_declared() {
    let colours = ChoiceSet::strings("colour", [("Red", "red"), ("Blue", "blue")])
        .expect("valid set");
    let signature = HandlerSignature::new("paint")
        .doc("Paint.\n:colour: Colour.\n:coats: Coats.\n:note: Note.\n:plain: Plain.")
        .parameter(Parameter::choice("colour", colours))
        .parameter(
            Parameter::of::<i64>("coats").with_bounds(OptionBounds::integer(Some(1), Some(3))),
        )
        .parameter(
            Parameter::of::<Option<String>>("note")
                .with_bounds(OptionBounds::length(None, Some(50))),
        )
        .parameter(Parameter::of::<Option<bool>>("plain"));
    let tree = tree_of(vec![CommandDecl::new(signature, noop())], vec![]);

    let payload = serde_json::to_value(tree.schema()).expect("schema serializes");

    assert_eq!(
        payload.pointer("/0/options"),
        Some(&json!([
            {
                "name": "colour",
                "description": "Colour.",
                "type": 3,
                "required": true,
                "choices": [
                    {"name": "Red", "value": "red"},
                    {"name": "Blue", "value": "blue"}
                ]
            },
            {
                "name": "coats",
                "description": "Coats.",
                "type": 4,
                "required": true,
                "min_value": 1,
                "max_value": 3
            },
            {
                "name": "note",
                "description": "Note.",
                "type": 3,
                "required": false,
                "max_length": 50
            },
            {
                "name": "plain",
                "description": "Plain.",
                "type": 5,
                "required": false
            }
        ]))
    );
}

#[rstest]
fn legacy_permissions_are_never_emitted() {
    let overlay = LegacyPermissions::new()
        .default_permission(false)
        .allow_roles([42]);
    let tree = tree_of(vec![leaf("ping").permissions(overlay)], vec![]);

    let payload = serde_json::to_value(tree.schema()).expect("schema serializes");

    assert_eq!(
        payload,
        json!([{"name": "ping", "description": "Runs ping.", "type": 1, "options": []}])
    );
}

#[rstest]
fn remote_payload_with_extra_fields_equals_local_schema() {
    let tree = tree_of(vec![CommandDecl::new(roll_signature(), noop())], vec![]);
    let remote = json!({
        "id": "1043",
        "application_id": "775799577604522054",
        "version": "1043",
        "default_member_permissions": null,
        "dm_permission": true,
        "name": "roll",
        "description": "Roll a die.",
        "type": 1,
        "options": [{
            "name": "sides",
            "description": "How many sides (default 6).",
            "type": 4
        }]
    });

    let decoded: CommandPayload = serde_json::from_value(remote).expect("remote payload decodes");

    assert_eq!(tree.schema(), vec![decoded]);
}

#[rstest]
fn changed_description_is_a_different_payload() {
    let before = tree_of(vec![leaf("ping")], vec![]);
    let after = tree_of(
        vec![CommandDecl::new(
            HandlerSignature::new("ping").doc("Check latency."),
            noop(),
        )],
        vec![],
    );

    assert_ne!(before.schema(), after.schema());
}

#[rstest]
fn serialization_is_deterministic() {
    let first = tree_of(
        vec![CommandDecl::new(roll_signature(), noop()), leaf("ping")],
        vec![],
    );
    let second = tree_of(
        vec![CommandDecl::new(roll_signature(), noop()), leaf("ping")],
        vec![],
    );

    assert_eq!(
        serde_json::to_string(&first.schema()).expect("serializes"),
        serde_json::to_string(&second.schema()).expect("serializes"),
    );
}
