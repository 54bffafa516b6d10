//! Legacy permission overlay.
//!
//! Role and user allow/deny lists used to be attachable to root commands
//! and groups. The platform no longer lets bots configure them, so the
//! overlay is parsed and shape-checked for compatibility but never
//! serialised and never enforced.

use super::{SchemaValidationError, Snowflake};
use tracing::warn;

/// Whom a permission overwrite targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionTarget {
    /// A role.
    Role(Snowflake),
    /// A user.
    User(Snowflake),
}

/// One allow/deny entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionOverwrite {
    /// The role or user affected.
    pub target: PermissionTarget,
    /// `true` to allow, `false` to deny.
    pub allow: bool,
}

/// Inert permission declarations kept for source compatibility.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyPermissions {
    default_permission: Option<bool>,
    overwrites: Vec<PermissionOverwrite>,
}

impl LegacyPermissions {
    /// Creates an empty overlay.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the legacy default-permission flag.
    #[must_use]
    pub const fn default_permission(mut self, allowed: bool) -> Self {
        self.default_permission = Some(allowed);
        self
    }

    /// Allows the given roles.
    #[must_use]
    pub fn allow_roles(self, roles: impl IntoIterator<Item = u64>) -> Self {
        self.extend(roles, PermissionTarget::Role, true)
    }

    /// Denies the given roles.
    #[must_use]
    pub fn disallow_roles(self, roles: impl IntoIterator<Item = u64>) -> Self {
        self.extend(roles, PermissionTarget::Role, false)
    }

    /// Allows the given users.
    #[must_use]
    pub fn allow_users(self, users: impl IntoIterator<Item = u64>) -> Self {
        self.extend(users, PermissionTarget::User, true)
    }

    /// Denies the given users.
    #[must_use]
    pub fn disallow_users(self, users: impl IntoIterator<Item = u64>) -> Self {
        self.extend(users, PermissionTarget::User, false)
    }

    fn extend(
        mut self,
        ids: impl IntoIterator<Item = u64>,
        target: fn(Snowflake) -> PermissionTarget,
        allow: bool,
    ) -> Self {
        self.overwrites
            .extend(ids.into_iter().map(|id| PermissionOverwrite {
                target: target(Snowflake::new(id)),
                allow,
            }));
        self
    }

    /// Returns `true` when nothing was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.default_permission.is_none() && self.overwrites.is_empty()
    }

    /// Returns the declared overwrites.
    #[must_use]
    pub fn overwrites(&self) -> &[PermissionOverwrite] {
        &self.overwrites
    }

    /// Checks the overlay's shape and warns that it has no effect.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaValidationError::InvalidPermission`] for a zero id or
    /// a target that is both allowed and denied.
    pub(crate) fn validate(&self, node: &str) -> Result<(), SchemaValidationError> {
        if self.is_empty() {
            return Ok(());
        }

        for (index, overwrite) in self.overwrites.iter().enumerate() {
            let id = match overwrite.target {
                PermissionTarget::Role(id) | PermissionTarget::User(id) => id,
            };
            if id.get() == 0 {
                return Err(SchemaValidationError::InvalidPermission {
                    node: node.to_owned(),
                    reason: "target id must be non-zero".to_owned(),
                });
            }
            let conflicting = self
                .overwrites
                .iter()
                .take(index)
                .any(|earlier| {
                    earlier.target == overwrite.target && earlier.allow != overwrite.allow
                });
            if conflicting {
                return Err(SchemaValidationError::InvalidPermission {
                    node: node.to_owned(),
                    reason: format!("{id} is both allowed and denied"),
                });
            }
        }

        warn!(
            node,
            "permission configuration is deprecated and has no effect; the platform no longer lets bots configure command permissions"
        );
        Ok(())
    }
}
