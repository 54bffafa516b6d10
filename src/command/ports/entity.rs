//! Resolved-entity lookup capability.

use crate::command::domain::{EntityKind, ResolvedData, ResolvedEntity, Snowflake};

/// Looks up entities referenced by entity-kind options.
pub trait EntityLookup {
    /// Finds a user, attaching guild member data when known.
    fn user(&self, id: Snowflake) -> Option<ResolvedEntity>;

    /// Finds a role.
    fn role(&self, id: Snowflake) -> Option<ResolvedEntity>;

    /// Finds a channel.
    fn channel(&self, id: Snowflake) -> Option<ResolvedEntity>;

    /// Finds a role, falling back to a user.
    fn mentionable(&self, id: Snowflake) -> Option<ResolvedEntity> {
        self.role(id).or_else(|| self.user(id))
    }
}

impl EntityLookup for ResolvedData {
    fn user(&self, id: Snowflake) -> Option<ResolvedEntity> {
        let data = self.users.get(&id)?;
        let mut entity = ResolvedEntity::new(id, EntityKind::User, data.clone());
        if let Some(member) = self.members.get(&id) {
            entity = entity.with_member(member.clone());
        }
        Some(entity)
    }

    fn role(&self, id: Snowflake) -> Option<ResolvedEntity> {
        self.roles
            .get(&id)
            .map(|data| ResolvedEntity::new(id, EntityKind::Role, data.clone()))
    }

    fn channel(&self, id: Snowflake) -> Option<ResolvedEntity> {
        self.channels
            .get(&id)
            .map(|data| ResolvedEntity::new(id, EntityKind::Channel, data.clone()))
    }
}
