//! The command tree and its builder.
//!
//! The tree has at most three tiers: a root command, a group holding
//! commands, or a group holding a subgroup holding commands. The builder is
//! the only way to construct a tree and validates every declaration as it
//! is added. A built tree is never mutated.
//!
//! Root names are unique across the whole tree, even when roots are
//! registered into different deployment scopes, because inbound events are
//! routed by name alone.

use super::{
    CommandDecl, CommandName, CommandOption, CommandPayload, DeploymentScope, DocCommentParser,
    FieldListParser, LegacyPermissions, NamespaceDecl, NamespaceMember, SchemaValidationError,
    SignatureIntrospector, schema, signature::qualify,
};
use crate::command::ports::CommandHandler;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Maximum number of root nodes in one tree.
pub const MAX_ROOT_NODES: usize = 100;

/// Maximum number of children of a group or subgroup.
pub const MAX_CHILDREN: usize = 25;

const ROOT_PARENT: &str = "<root>";

/// A directly invocable leaf.
pub struct Command<C> {
    name: CommandName,
    path: String,
    description: String,
    options: Vec<CommandOption>,
    handler: Arc<dyn CommandHandler<C>>,
    permissions: LegacyPermissions,
    scope: Option<DeploymentScope>,
}

impl<C> Command<C> {
    /// Returns the command name.
    #[must_use]
    pub const fn name(&self) -> &CommandName {
        &self.name
    }

    /// Returns the space-separated path from the root.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the options in declared order.
    #[must_use]
    pub fn options(&self) -> &[CommandOption] {
        &self.options
    }

    /// Returns the handler.
    #[must_use]
    pub fn handler(&self) -> Arc<dyn CommandHandler<C>> {
        Arc::clone(&self.handler)
    }

    /// Returns the inert legacy permission overlay.
    #[must_use]
    pub const fn permissions(&self) -> &LegacyPermissions {
        &self.permissions
    }
}

impl<C> fmt::Debug for Command<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("path", &self.path)
            .field("description", &self.description)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// A second-tier namespace holding commands only.
#[derive(Debug)]
pub struct SubGroup<C> {
    name: CommandName,
    description: String,
    commands: IndexMap<CommandName, Command<C>>,
}

impl<C> SubGroup<C> {
    /// Returns the subgroup name.
    #[must_use]
    pub const fn name(&self) -> &CommandName {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Iterates over commands in declaration order.
    pub fn commands(&self) -> impl Iterator<Item = &Command<C>> {
        self.commands.values()
    }
}

/// A child of a group.
#[derive(Debug)]
pub enum GroupMember<C> {
    /// A command.
    Command(Command<C>),
    /// A subgroup.
    SubGroup(SubGroup<C>),
}

/// A root namespace.
#[derive(Debug)]
pub struct Group<C> {
    name: CommandName,
    description: String,
    members: IndexMap<CommandName, GroupMember<C>>,
    permissions: LegacyPermissions,
    scope: Option<DeploymentScope>,
}

impl<C> Group<C> {
    /// Returns the group name.
    #[must_use]
    pub const fn name(&self) -> &CommandName {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Iterates over members in declaration order.
    pub fn members(&self) -> impl Iterator<Item = &GroupMember<C>> {
        self.members.values()
    }

    /// Returns the inert legacy permission overlay.
    #[must_use]
    pub const fn permissions(&self) -> &LegacyPermissions {
        &self.permissions
    }
}

/// A root node.
#[derive(Debug)]
pub enum CommandNode<C> {
    /// A root command.
    Command(Command<C>),
    /// A group.
    Group(Group<C>),
}

impl<C> CommandNode<C> {
    /// Returns the node name.
    #[must_use]
    pub const fn name(&self) -> &CommandName {
        match self {
            Self::Command(command) => &command.name,
            Self::Group(group) => &group.name,
        }
    }

    /// Returns the scope the node overrides the client default with.
    #[must_use]
    pub const fn scope(&self) -> Option<DeploymentScope> {
        match self {
            Self::Command(command) => command.scope,
            Self::Group(group) => group.scope,
        }
    }

    /// Serialises the node for registration.
    #[must_use]
    pub fn to_payload(&self) -> CommandPayload {
        schema::serialize_node(self)
    }
}

/// The frozen set of root nodes for one client.
#[derive(Debug)]
pub struct CommandTree<C> {
    roots: IndexMap<CommandName, CommandNode<C>>,
}

impl<C> CommandTree<C> {
    /// Iterates over root nodes in declaration order.
    pub fn roots(&self) -> impl Iterator<Item = &CommandNode<C>> {
        self.roots.values()
    }

    /// Returns the root node named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CommandNode<C>> {
        self.roots.get(name)
    }

    /// Returns every scope the tree registers into, `default` first and
    /// the rest in declaration order.
    ///
    /// `default` is always included so that its stale commands are removed
    /// even when every root overrides it.
    #[must_use]
    pub fn scopes(&self, default: DeploymentScope) -> Vec<DeploymentScope> {
        let mut scopes = vec![default];
        for scope in self.roots().filter_map(CommandNode::scope) {
            if !scopes.contains(&scope) {
                scopes.push(scope);
            }
        }
        scopes
    }

    /// Iterates over the root nodes registered into `scope`, treating
    /// nodes without an override as belonging to `default`.
    pub fn roots_in(
        &self,
        scope: DeploymentScope,
        default: DeploymentScope,
    ) -> impl Iterator<Item = &CommandNode<C>> {
        self.roots()
            .filter(move |node| node.scope().unwrap_or(default) == scope)
    }

    /// Returns the number of root nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Returns `true` when no command was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Walks the tree to the command leaf at `path`.
    ///
    /// Returns `None` unless the path ends exactly on a command.
    #[must_use]
    pub fn resolve<'a>(&self, path: impl IntoIterator<Item = &'a str>) -> Option<&Command<C>> {
        let mut segments = path.into_iter();
        let leaf = match self.roots.get(segments.next()?)? {
            CommandNode::Command(command) => command,
            CommandNode::Group(group) => match group.members.get(segments.next()?)? {
                GroupMember::Command(command) => command,
                GroupMember::SubGroup(subgroup) => subgroup.commands.get(segments.next()?)?,
            },
        };
        segments.next().is_none().then_some(leaf)
    }

    /// Serialises every root node for registration.
    #[must_use]
    pub fn schema(&self) -> Vec<CommandPayload> {
        schema::serialize_tree(self)
    }
}

/// Assembles declarations into a validated [`CommandTree`].
///
/// Every `add_*` call validates its declaration immediately, so a failing
/// declaration is reported at the point it was made.
pub struct CommandTreeBuilder<C, P = FieldListParser> {
    introspector: SignatureIntrospector<P>,
    roots: IndexMap<CommandName, CommandNode<C>>,
}

impl<C> CommandTreeBuilder<C> {
    /// Creates a builder using the default doc-comment parser.
    #[must_use]
    pub fn new() -> Self {
        Self::with_parser(FieldListParser)
    }
}

impl<C> Default for CommandTreeBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, P> fmt::Debug for CommandTreeBuilder<C, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandTreeBuilder")
            .field("roots", &self.roots.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl<C, P: DocCommentParser> CommandTreeBuilder<C, P> {
    /// Creates a builder with a custom doc-comment parser.
    #[must_use]
    pub fn with_parser(parser: P) -> Self {
        Self {
            introspector: SignatureIntrospector::with_parser(parser),
            roots: IndexMap::new(),
        }
    }

    /// Adds a root command.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaValidationError`] when the declaration is invalid,
    /// its name is taken, or the tree is full.
    pub fn add_command(
        &mut self,
        declaration: CommandDecl<C>,
    ) -> Result<(), SchemaValidationError> {
        let command = self.build_command("", declaration)?;
        self.insert_root(CommandNode::Command(command))
    }

    /// Adds a root namespace as a group.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaValidationError`] when any member is invalid, the
    /// namespace is empty or nested too deeply, its name is taken, or the
    /// tree is full.
    pub fn add_namespace(
        &mut self,
        declaration: NamespaceDecl<C>,
    ) -> Result<(), SchemaValidationError> {
        let group = self.build_group(declaration)?;
        self.insert_root(CommandNode::Group(group))
    }

    /// Freezes the tree.
    #[must_use]
    pub fn build(self) -> CommandTree<C> {
        CommandTree { roots: self.roots }
    }

    fn insert_root(&mut self, node: CommandNode<C>) -> Result<(), SchemaValidationError> {
        if self.roots.contains_key(node.name()) {
            return Err(SchemaValidationError::DuplicateName {
                parent: ROOT_PARENT.to_owned(),
                name: node.name().to_string(),
            });
        }
        if self.roots.len() >= MAX_ROOT_NODES {
            return Err(SchemaValidationError::TooManyRootNodes {
                count: self.roots.len() + 1,
            });
        }
        self.roots.insert(node.name().clone(), node);
        Ok(())
    }

    fn build_command(
        &self,
        parent: &str,
        declaration: CommandDecl<C>,
    ) -> Result<Command<C>, SchemaValidationError> {
        let introspected = self
            .introspector
            .introspect(parent, &declaration.signature)?;
        let path = qualify(parent, introspected.name.as_str());
        declaration.permissions.validate(&path)?;
        if !parent.is_empty() {
            reject_member_scope(&path, declaration.scope)?;
        }
        Ok(Command {
            name: introspected.name,
            path,
            description: introspected.description,
            options: introspected.options,
            handler: declaration.handler,
            permissions: declaration.permissions,
            scope: declaration.scope,
        })
    }

    fn build_group(
        &self,
        declaration: NamespaceDecl<C>,
    ) -> Result<Group<C>, SchemaValidationError> {
        let name = CommandName::new(&declaration.name)?;
        let path = name.to_string();
        let description = self.introspector.namespace_description(
            &path,
            declaration.doc.as_deref(),
            declaration.description.as_deref(),
        )?;
        declaration.permissions.validate(&path)?;
        check_member_count(&path, declaration.members.len())?;

        let mut members = IndexMap::with_capacity(declaration.members.len());
        for member in declaration.members {
            let built = match member {
                NamespaceMember::Command(command) => {
                    GroupMember::Command(self.build_command(&path, command)?)
                }
                NamespaceMember::Namespace(namespace) => {
                    GroupMember::SubGroup(self.build_subgroup(&path, namespace)?)
                }
            };
            let key = match &built {
                GroupMember::Command(command) => command.name.clone(),
                GroupMember::SubGroup(subgroup) => subgroup.name.clone(),
            };
            insert_unique(&mut members, &path, key, built)?;
        }

        Ok(Group {
            name,
            description,
            members,
            permissions: declaration.permissions,
            scope: declaration.scope,
        })
    }

    fn build_subgroup(
        &self,
        parent: &str,
        declaration: NamespaceDecl<C>,
    ) -> Result<SubGroup<C>, SchemaValidationError> {
        let name = CommandName::new(&declaration.name)?;
        let path = qualify(parent, name.as_str());
        let description = self.introspector.namespace_description(
            &path,
            declaration.doc.as_deref(),
            declaration.description.as_deref(),
        )?;
        declaration.permissions.validate(&path)?;
        reject_member_scope(&path, declaration.scope)?;
        check_member_count(&path, declaration.members.len())?;

        let mut commands = IndexMap::with_capacity(declaration.members.len());
        for member in declaration.members {
            match member {
                NamespaceMember::Command(command) => {
                    let built = self.build_command(&path, command)?;
                    insert_unique(&mut commands, &path, built.name.clone(), built)?;
                }
                NamespaceMember::Namespace(namespace) => {
                    return Err(SchemaValidationError::NestingTooDeep {
                        path: qualify(&path, namespace.name.trim()),
                    });
                }
            }
        }

        Ok(SubGroup {
            name,
            description,
            commands,
        })
    }
}

fn reject_member_scope(
    path: &str,
    scope: Option<DeploymentScope>,
) -> Result<(), SchemaValidationError> {
    match scope {
        Some(_) => Err(SchemaValidationError::ScopedMember {
            path: path.to_owned(),
        }),
        None => Ok(()),
    }
}

fn check_member_count(path: &str, count: usize) -> Result<(), SchemaValidationError> {
    if count == 0 {
        return Err(SchemaValidationError::EmptyNamespace {
            namespace: path.to_owned(),
        });
    }
    if count > MAX_CHILDREN {
        return Err(SchemaValidationError::TooManyChildren {
            parent: path.to_owned(),
            count,
        });
    }
    Ok(())
}

fn insert_unique<T>(
    map: &mut IndexMap<CommandName, T>,
    parent: &str,
    key: CommandName,
    value: T,
) -> Result<(), SchemaValidationError> {
    if map.contains_key(&key) {
        return Err(SchemaValidationError::DuplicateName {
            parent: parent.to_owned(),
            name: key.to_string(),
        });
    }
    map.insert(key, value);
    Ok(())
}
