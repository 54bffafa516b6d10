//! Domain model for slash commands.
//!
//! Pure types and functions: the option model, choice sets, signature
//! introspection, the command tree, the wire schema and inbound events.

pub mod arguments;
pub mod choice;
pub mod declaration;
pub mod doc;
pub mod entity;
pub mod error;
pub mod ids;
pub mod interaction;
pub mod name;
pub mod option;
pub mod permission;
pub mod schema;
pub mod scope;
pub mod signature;
pub mod tree;

pub use arguments::{ArgumentValue, Arguments, FromArgument};
pub use choice::{Choice, ChoiceKind, ChoiceSet, ChoiceValue, MAX_CHOICES, SelectedChoice};
pub use declaration::{CommandDecl, NamespaceDecl, NamespaceMember};
pub use doc::{DocCommentParser, FieldListParser, ParsedDoc, RustdocParser};
pub use entity::{Channel, EntityKind, Mentionable, ResolvedEntity, Role, User};
pub use error::{
    ArgumentError, DispatchError, HandlerError, HandlerPanicked, InvocationError,
    SchemaValidationError,
};
pub use ids::{CommandId, GuildId, Snowflake};
pub use interaction::{InteractionEvent, RawOption, ResolvedData};
pub use name::{CommandName, MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH, validate_description};
pub use option::{CommandOption, MAX_STRING_LENGTH, OptionBounds, OptionKind};
pub use permission::{LegacyPermissions, PermissionOverwrite, PermissionTarget};
pub use schema::{
    CHAT_INPUT_TYPE, ChoicePayload, CommandPayload, OptionPayload, serialize_node, serialize_tree,
};
pub use scope::DeploymentScope;
pub use signature::{
    DeclaredType, HandlerSignature, IntrospectedSignature, MAX_OPTIONS, OptionType, Parameter,
    SignatureIntrospector,
};
pub use tree::{
    Command, CommandNode, CommandTree, CommandTreeBuilder, Group, GroupMember, MAX_CHILDREN,
    MAX_ROOT_NODES, SubGroup,
};
