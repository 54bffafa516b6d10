//! Command and namespace declarations, the input to the tree builder.
//!
//! Namespaces are composed rather than derived: a [`NamespaceDecl`] lists
//! its member commands and at most one further level of namespaces. Only
//! root declarations may choose their own deployment scope; members always
//! live where their root does.

use super::{DeploymentScope, HandlerSignature, LegacyPermissions};
use crate::command::ports::CommandHandler;
use heck::ToSnakeCase;
use std::fmt;
use std::sync::Arc;

/// A handler signature paired with its body.
pub struct CommandDecl<C> {
    pub(crate) signature: HandlerSignature,
    pub(crate) handler: Arc<dyn CommandHandler<C>>,
    pub(crate) permissions: LegacyPermissions,
    pub(crate) scope: Option<DeploymentScope>,
}

impl<C> CommandDecl<C> {
    /// Declares a command.
    #[must_use]
    pub fn new(signature: HandlerSignature, handler: impl CommandHandler<C> + 'static) -> Self {
        Self {
            signature,
            handler: Arc::new(handler),
            permissions: LegacyPermissions::default(),
            scope: None,
        }
    }

    /// Registers the command into `scope` instead of the client's default.
    #[must_use]
    pub const fn scope(mut self, scope: DeploymentScope) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Attaches a legacy permission overlay.
    ///
    /// The overlay is shape-checked and then ignored.
    #[must_use]
    pub fn permissions(mut self, permissions: LegacyPermissions) -> Self {
        self.permissions = permissions;
        self
    }

    /// Returns the declared signature.
    #[must_use]
    pub const fn signature(&self) -> &HandlerSignature {
        &self.signature
    }
}

impl<C> fmt::Debug for CommandDecl<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDecl")
            .field("signature", &self.signature)
            .field("permissions", &self.permissions)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// A member of a namespace.
#[derive(Debug)]
pub enum NamespaceMember<C> {
    /// A command.
    Command(CommandDecl<C>),
    /// A nested namespace.
    Namespace(NamespaceDecl<C>),
}

/// A namespace of commands.
///
/// At the root a namespace becomes a group; nested once it becomes a
/// subgroup. Nesting deeper is rejected when the tree is built.
#[derive(Debug)]
pub struct NamespaceDecl<C> {
    pub(crate) name: String,
    pub(crate) doc: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) members: Vec<NamespaceMember<C>>,
    pub(crate) permissions: LegacyPermissions,
    pub(crate) scope: Option<DeploymentScope>,
}

impl<C> NamespaceDecl<C> {
    /// Declares an empty namespace.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            description: None,
            members: Vec::new(),
            permissions: LegacyPermissions::default(),
            scope: None,
        }
    }

    /// Declares a namespace named after a Rust type, in snake case.
    ///
    /// ```
    /// use slashgate::command::domain::NamespaceDecl;
    ///
    /// struct UserProfiles;
    ///
    /// let namespace = NamespaceDecl::<()>::for_type::<UserProfiles>();
    /// assert_eq!(namespace.name(), "user_profiles");
    /// ```
    #[must_use]
    pub fn for_type<T: ?Sized>() -> Self {
        let full = std::any::type_name::<T>();
        let path = full.split('<').next().unwrap_or(full);
        let last = path.rsplit("::").next().unwrap_or(path);
        Self::new(last.to_snake_case())
    }

    /// Sets the structured doc comment; its summary becomes the description.
    #[must_use]
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Sets an explicit description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a command.
    #[must_use]
    pub fn command(mut self, command: CommandDecl<C>) -> Self {
        self.members.push(NamespaceMember::Command(command));
        self
    }

    /// Adds a nested namespace.
    #[must_use]
    pub fn namespace(mut self, namespace: Self) -> Self {
        self.members.push(NamespaceMember::Namespace(namespace));
        self
    }

    /// Attaches a legacy permission overlay.
    #[must_use]
    pub fn permissions(mut self, permissions: LegacyPermissions) -> Self {
        self.permissions = permissions;
        self
    }

    /// Registers the group into `scope` instead of the client's default.
    #[must_use]
    pub const fn scope(mut self, scope: DeploymentScope) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Returns the declared name, as written.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}
