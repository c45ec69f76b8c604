//! Built-in Role Definitions
//!
//! The four default roles every deployment carries. They are created at
//! startup, cannot be deleted, and `admin` additionally cannot be
//! redefined.

use super::entity::RoleDefinition;

/// Code-defined role specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinRole {
    pub name: &'static str,
    pub description: &'static str,
    pub scopes: &'static [&'static str],
}

impl BuiltinRole {
    pub fn to_definition(&self) -> RoleDefinition {
        RoleDefinition::named(self.name)
            .with_description(self.description)
            .with_scopes(self.scopes.iter().copied())
    }

    pub fn scopes_match(&self, scopes: &[String]) -> bool {
        scopes.len() == self.scopes.len()
            && scopes
                .iter()
                .zip(self.scopes)
                .all(|(a, b)| a.as_str() == *b)
    }
}

/// Standard user privileges.
pub const USER: BuiltinRole = BuiltinRole {
    name: "user",
    description: "Standard user privileges",
    scopes: &["self"],
};

/// Elevated privileges (can do anything).
pub const ADMIN: BuiltinRole = BuiltinRole {
    name: "admin",
    description: "Elevated privileges (can do anything)",
    scopes: &[
        "admin-ui",
        "admin:users",
        "admin:servers",
        "admin:services",
        "tokens",
        "admin:groups",
        "list:services",
        "read:services",
        "read:hub",
        "proxy",
        "shutdown",
        "access:services",
        "access:servers",
        "read:roles",
        "read:metrics",
        "shares",
    ],
};

/// Post activity only.
pub const SERVER: BuiltinRole = BuiltinRole {
    name: "server",
    description: "Post activity only",
    scopes: &["users:activity!user", "access:servers!server"],
};

/// Token with the same permissions as its owner.
pub const TOKEN: BuiltinRole = BuiltinRole {
    name: "token",
    description: "Token with same permissions as its owner",
    scopes: &["inherit"],
};

pub const DEFAULT_ROLES: &[&BuiltinRole] = &[&USER, &ADMIN, &SERVER, &TOKEN];

/// Immutable role policy configuration.
///
/// Constructed once at process start and shared by reference across the
/// services; there is no module-level mutable state behind it.
#[derive(Debug, Clone)]
pub struct RoleConfig {
    defaults: Vec<&'static BuiltinRole>,
}

impl RoleConfig {
    /// The standard table: `user`, `admin`, `server`, `token`.
    pub fn standard() -> Self {
        Self {
            defaults: DEFAULT_ROLES.to_vec(),
        }
    }

    pub fn default_roles(&self) -> impl Iterator<Item = &BuiltinRole> {
        self.defaults.iter().copied()
    }

    /// Definitions for seeding via `create_role`.
    pub fn definitions(&self) -> Vec<RoleDefinition> {
        self.defaults.iter().map(|r| r.to_definition()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&BuiltinRole> {
        self.defaults.iter().find(|r| r.name == name).copied()
    }

    pub fn is_default(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Whether a caller-supplied definition is exactly one of the
    /// built-in defaults.
    pub fn matches_default(&self, def: &RoleDefinition) -> bool {
        let Some(name) = def.name.as_deref() else {
            return false;
        };
        let Some(builtin) = self.get(name) else {
            return false;
        };
        def.description.as_deref() == Some(builtin.description)
            && def
                .scopes
                .as_deref()
                .is_some_and(|scopes| builtin.scopes_match(scopes))
    }

    pub fn user_role(&self) -> &'static str {
        USER.name
    }

    pub fn admin_role(&self) -> &'static str {
        ADMIN.name
    }

    pub fn token_role(&self) -> &'static str {
        TOKEN.name
    }
}

impl Default for RoleConfig {
    fn default() -> Self {
        Self::standard()
    }
}
