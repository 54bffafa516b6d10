//! Tests for the command tree builder and path resolution.

use rstest::{fixture, rstest};

use super::support::{leaf, noop, roll_signature};
use crate::command::domain::{
    CommandDecl, CommandNode, CommandTree, CommandTreeBuilder, DeploymentScope, GroupMember,
    GuildId, HandlerSignature, MAX_ROOT_NODES, NamespaceDecl, SchemaValidationError,
};

const TEST_GUILD: DeploymentScope = DeploymentScope::Guild(GuildId::new(7));

#[fixture]
fn images() -> NamespaceDecl<()> {
    NamespaceDecl::new("images")
        .doc("Fetch random images.")
        .command(leaf("cat"))
        .command(leaf("dog"))
        .command(leaf("any"))
}

#[fixture]
fn tree(images: NamespaceDecl<()>) -> CommandTree<()> {
    let mut builder = CommandTreeBuilder::new();
    builder
        .add_command(CommandDecl::new(roll_signature(), noop()))
        .expect("roll should be accepted");
    builder
        .add_namespace(images)
        .expect("images should be accepted");
    builder.build()
}

#[rstest]
fn roots_keep_declaration_order(tree: CommandTree<()>) {
    let names: Vec<&str> = tree.roots().map(|node| node.name().as_str()).collect();

    assert_eq!(names, ["roll", "images"]);
    assert_eq!(tree.len(), 2);
}

#[rstest]
fn namespace_becomes_group_with_three_leaves(tree: CommandTree<()>) {
    let Some(CommandNode::Group(group)) = tree.get("images") else {
        panic!("images should be a group");
    };

    let members: Vec<&str> = group
        .members()
        .map(|member| match member {
            GroupMember::Command(command) => command.name().as_str(),
            GroupMember::SubGroup(subgroup) => subgroup.name().as_str(),
        })
        .collect();
    assert_eq!(members, ["cat", "dog", "any"]);
    assert_eq!(group.description(), "Fetch random images.");
}

#[rstest]
#[case(&["images", "cat"], Some("images cat"))]
#[case(&["images", "any"], Some("images any"))]
#[case(&["roll"], Some("roll"))]
#[case(&["images"], None)]
#[case(&["images", "cat", "extra"], None)]
#[case(&["roll", "extra"], None)]
#[case(&["images", "fox"], None)]
#[case(&[], None)]
fn resolve_matches_exact_leaf_paths(
    tree: CommandTree<()>,
    #[case] path: &[&str],
    #[case] expected: Option<&str>,
) {
    let resolved = tree.resolve(path.iter().copied());

    assert_eq!(resolved.map(|command| command.path()), expected);
}

#[rstest]
fn subgroup_leaves_resolve_at_depth_three() {
    let admin = NamespaceDecl::new("admin")
        .doc("Administration.")
        .namespace(
            NamespaceDecl::new("roles")
                .doc("Role management.")
                .command(leaf("add"))
                .command(leaf("del")),
        )
        .command(leaf("ping"));
    let mut builder = CommandTreeBuilder::new();
    builder
        .add_namespace(admin)
        .expect("admin should be accepted");
    let tree = builder.build();

    let resolved = tree.resolve(["admin", "roles", "del"]);

    assert_eq!(resolved.map(|command| command.path()), Some("admin roles del"));
    assert!(tree.resolve(["admin", "roles"]).is_none());
    assert!(tree.resolve(["admin", "ping"]).is_some());
}

#[rstest]
fn third_namespace_level_is_rejected() {
    let admin = NamespaceDecl::new("admin").doc("Administration.").namespace(
        NamespaceDecl::new("roles")
            .doc("Role management.")
            .command(leaf("del"))
            .namespace(
                NamespaceDecl::new("colours")
                    .doc("Colour roles.")
                    .command(leaf("set")),
            ),
    );
    let mut builder = CommandTreeBuilder::<()>::new();

    let error = builder
        .add_namespace(admin)
        .expect_err("three namespace levels should fail");

    assert_eq!(
        error,
        SchemaValidationError::NestingTooDeep {
            path: "admin roles colours".to_owned()
        }
    );
    assert!(builder.build().is_empty());
}

#[rstest]
fn duplicate_root_name_is_rejected() {
    let mut builder = CommandTreeBuilder::new();
    builder.add_command(leaf("ping")).expect("first ping");

    let error = builder
        .add_command(leaf("PING"))
        .expect_err("second ping should fail");

    assert_eq!(
        error,
        SchemaValidationError::DuplicateName {
            parent: "<root>".to_owned(),
            name: "ping".to_owned(),
        }
    );
}

#[rstest]
fn command_and_namespace_share_the_root_namespace(images: NamespaceDecl<()>) {
    let mut builder = CommandTreeBuilder::new();
    builder.add_command(leaf("images")).expect("leaf images");

    let error = builder
        .add_namespace(images)
        .expect_err("namespace images should collide");

    assert!(matches!(
        error,
        SchemaValidationError::DuplicateName { ref parent, .. } if parent == "<root>"
    ));
}

#[rstest]
fn duplicate_member_names_are_rejected() {
    let namespace = NamespaceDecl::new("images")
        .doc("Images.")
        .command(leaf("cat"))
        .command(leaf("cat"));
    let mut builder = CommandTreeBuilder::new();

    let error = builder
        .add_namespace(namespace)
        .expect_err("duplicate member should fail");

    assert_eq!(
        error,
        SchemaValidationError::DuplicateName {
            parent: "images".to_owned(),
            name: "cat".to_owned(),
        }
    );
}

#[rstest]
fn empty_namespace_is_rejected() {
    let mut builder = CommandTreeBuilder::<()>::new();

    let error = builder
        .add_namespace(NamespaceDecl::new("empty").doc("Nothing here."))
        .expect_err("empty namespace should fail");

    assert_eq!(
        error,
        SchemaValidationError::EmptyNamespace {
            namespace: "empty".to_owned()
        }
    );
}

#[rstest]
fn namespace_without_description_is_rejected() {
    let mut builder = CommandTreeBuilder::new();

    let error = builder
        .add_namespace(NamespaceDecl::new("images").command(leaf("cat")))
        .expect_err("undescribed namespace should fail");

    assert_eq!(
        error,
        SchemaValidationError::MissingDescription {
            node: "images".to_owned()
        }
    );
}

#[rstest]
fn namespace_with_too_many_children_is_rejected() {
    let namespace = (0..26).fold(
        NamespaceDecl::new("wide").description("Too many commands."),
        |namespace, index| namespace.command(leaf(&format!("c{index}"))),
    );
    let mut builder = CommandTreeBuilder::new();

    let error = builder
        .add_namespace(namespace)
        .expect_err("26 children should fail");

    assert_eq!(
        error,
        SchemaValidationError::TooManyChildren {
            parent: "wide".to_owned(),
            count: 26,
        }
    );
}

#[rstest]
fn root_node_limit_is_enforced() {
    let mut builder = CommandTreeBuilder::new();
    for index in 0..MAX_ROOT_NODES {
        builder
            .add_command(leaf(&format!("c{index}")))
            .expect("within the limit");
    }

    let error = builder
        .add_command(leaf("overflow"))
        .expect_err("the 101st root should fail");

    assert_eq!(
        error,
        SchemaValidationError::TooManyRootNodes { count: 101 }
    );
}

#[rstest]
fn member_errors_carry_the_qualified_path() {
    let namespace = NamespaceDecl::new("images")
        .doc("Images.")
        .command(CommandDecl::new(HandlerSignature::new("cat"), noop()));
    let mut builder = CommandTreeBuilder::new();

    let error = builder
        .add_namespace(namespace)
        .expect_err("undescribed member should fail");

    assert_eq!(
        error,
        SchemaValidationError::MissingDescription {
            node: "images cat".to_owned()
        }
    );
}

#[rstest]
fn scopes_list_the_default_first_then_overrides_once() {
    let mut builder = CommandTreeBuilder::new();
    builder
        .add_command(leaf("ping").scope(TEST_GUILD))
        .expect("ping");
    builder.add_command(leaf("pong")).expect("pong");
    builder
        .add_namespace(
            NamespaceDecl::new("images")
                .doc("Fetch random images.")
                .command(leaf("cat"))
                .scope(TEST_GUILD),
        )
        .expect("images");
    let tree = builder.build();

    assert_eq!(
        tree.scopes(DeploymentScope::Global),
        [DeploymentScope::Global, TEST_GUILD]
    );
    assert_eq!(tree.scopes(TEST_GUILD), [TEST_GUILD]);
    let guild_roots: Vec<&str> = tree
        .roots_in(TEST_GUILD, DeploymentScope::Global)
        .map(|node| node.name().as_str())
        .collect();
    assert_eq!(guild_roots, ["ping", "images"]);
    let global_roots: Vec<&str> = tree
        .roots_in(DeploymentScope::Global, DeploymentScope::Global)
        .map(|node| node.name().as_str())
        .collect();
    assert_eq!(global_roots, ["pong"]);
}

#[rstest]
fn root_names_stay_unique_across_scopes() {
    let mut builder = CommandTreeBuilder::new();
    builder.add_command(leaf("ping")).expect("global ping");

    let error = builder
        .add_command(leaf("ping").scope(TEST_GUILD))
        .expect_err("guild ping should clash");

    assert!(matches!(error, SchemaValidationError::DuplicateName { .. }));
}

#[rstest]
#[case::member_command(
    NamespaceDecl::new("admin")
        .doc("Administration.")
        .command(leaf("ban").scope(TEST_GUILD)),
    "admin ban"
)]
#[case::member_namespace(
    NamespaceDecl::new("admin").doc("Administration.").namespace(
        NamespaceDecl::new("roles")
            .doc("Role management.")
            .command(leaf("del"))
            .scope(TEST_GUILD),
    ),
    "admin roles"
)]
fn members_cannot_choose_a_scope(#[case] namespace: NamespaceDecl<()>, #[case] path: &str) {
    let mut builder = CommandTreeBuilder::new();

    let error = builder
        .add_namespace(namespace)
        .expect_err("scoped member should fail");

    assert_eq!(
        error,
        SchemaValidationError::ScopedMember {
            path: path.to_owned()
        }
    );
}

struct UserProfiles;

#[rstest]
fn namespace_can_be_named_after_a_type() {
    let namespace = NamespaceDecl::<()>::for_type::<UserProfiles>();

    assert_eq!(namespace.name(), "user_profiles");
}
