//! Resolved platform entities referenced by user, role, channel and
//! mentionable options.
//!
//! The core never interprets entity payloads; it only carries them from the
//! event's resolved table to the handler.

use super::Snowflake;
use serde_json::Value;
use std::fmt;

/// The kind of a resolved entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A user, optionally with guild member data attached.
    User,
    /// A guild role.
    Role,
    /// A guild channel.
    Channel,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::User => "user",
            Self::Role => "role",
            Self::Channel => "channel",
        })
    }
}

/// An entity looked up from an interaction's resolved table.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEntity {
    id: Snowflake,
    kind: EntityKind,
    data: Value,
    member: Option<Value>,
}

impl ResolvedEntity {
    /// Creates a resolved entity.
    #[must_use]
    pub const fn new(id: Snowflake, kind: EntityKind, data: Value) -> Self {
        Self {
            id,
            kind,
            data,
            member: None,
        }
    }

    /// Attaches guild member data to a user entity.
    #[must_use]
    pub fn with_member(mut self, member: Value) -> Self {
        self.member = Some(member);
        self
    }

    /// Returns the entity id.
    #[must_use]
    pub const fn id(&self) -> Snowflake {
        self.id
    }

    /// Returns the entity kind.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Returns the raw entity payload.
    #[must_use]
    pub const fn data(&self) -> &Value {
        &self.data
    }

    /// Returns guild member data, when the entity is a user in a guild.
    #[must_use]
    pub const fn member(&self) -> Option<&Value> {
        self.member.as_ref()
    }
}

/// A user argument.
#[derive(Debug, Clone, PartialEq)]
pub struct User(pub ResolvedEntity);

/// A role argument.
#[derive(Debug, Clone, PartialEq)]
pub struct Role(pub ResolvedEntity);

/// A channel argument.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel(pub ResolvedEntity);

/// A mentionable argument: either a user or a role.
#[derive(Debug, Clone, PartialEq)]
pub struct Mentionable(pub ResolvedEntity);

impl Mentionable {
    /// Returns `true` when the mention resolved to a role.
    #[must_use]
    pub const fn is_role(&self) -> bool {
        matches!(self.0.kind, EntityKind::Role)
    }
}
