//! Principal Entities
//!
//! Role-bearing principals: users, services, groups, and API tokens.
//! Principals are owned and persisted by the backing directory; this crate
//! reads their identity and mutates only their role membership.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of role-bearing principal.
///
/// A closed set: association tables are selected by matching on this enum,
/// so adding a principal kind is a compile-time change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    User,
    Service,
    Group,
    Token,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Service => "service",
            Self::Group => "group",
            Self::Token => "token",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a role-bearing principal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Stable row id
    pub id: String,

    /// Principal kind
    #[serde(rename = "type")]
    pub kind: EntityKind,

    /// Unique name within the kind. For tokens this is the token's
    /// identifying prefix rather than a human-chosen name.
    pub name: String,

    /// Admin flag. Reconciled with `admin` role membership by the default
    /// role policy, never read anywhere else in this crate.
    #[serde(default)]
    pub admin: bool,
}

impl Entity {
    pub fn new(kind: EntityKind, name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            name: name.into(),
            admin: false,
        }
    }

    pub fn with_admin(mut self, admin: bool) -> Self {
        self.admin = admin;
        self
    }

    pub fn is_user(&self) -> bool {
        self.kind == EntityKind::User
    }

    pub fn is_group(&self) -> bool {
        self.kind == EntityKind::Group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display() {
        assert_eq!(EntityKind::User.to_string(), "user");
        assert_eq!(EntityKind::Token.to_string(), "token");
    }

    #[test]
    fn test_entity_creation() {
        let alice = Entity::new(EntityKind::User, "alice");
        assert!(alice.is_user());
        assert!(!alice.admin);
        assert!(!alice.id.is_empty());

        let admin = Entity::new(EntityKind::User, "root").with_admin(true);
        assert!(admin.admin);
    }
}
