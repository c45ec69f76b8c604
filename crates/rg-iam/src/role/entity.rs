//! Role Entity
//!
//! Named bundles of scopes grantable to principals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named bundle of raw (unexpanded) scopes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    /// Unique role name, immutable after creation
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Scopes granted by this role, in definition order
    #[serde(default)]
    pub scopes: Vec<String>,

    /// Whether the role definition is owned by an external auth provider
    #[serde(default)]
    pub managed_by_auth: bool,

    /// Audit fields
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            description: None,
            scopes: Vec::new(),
            managed_by_auth: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_scopes(mut self, scopes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_managed_by_auth(mut self, managed_by_auth: bool) -> Self {
        self.managed_by_auth = managed_by_auth;
        self
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }
}

/// Caller-supplied role definition consumed by
/// [`RoleService::create_role`](crate::role::service::RoleService::create_role).
///
/// `scopes` distinguishes absent (fall back to the attribute default) from
/// an explicitly empty list (a role with no privileges).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleDefinition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<String>>,

    #[serde(default)]
    pub managed_by_auth: bool,
}

impl RoleDefinition {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_scopes(mut self, scopes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.scopes = Some(scopes.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_managed_by_auth(mut self, managed_by_auth: bool) -> Self {
        self.managed_by_auth = managed_by_auth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_builders() {
        let role = Role::new("data-scientist")
            .with_description("Notebook access for the data team")
            .with_scopes(["access:servers!user"]);

        assert_eq!(role.name, "data-scientist");
        assert!(role.has_scope("access:servers!user"));
        assert!(!role.has_scope("access:servers"));
        assert!(!role.managed_by_auth);
    }

    #[test]
    fn test_definition_serialization() {
        let def = RoleDefinition::named("data-scientist")
            .with_scopes(["access:servers!user", "read:users"]);

        let json = serde_json::to_string(&def).unwrap();
        assert!(json.contains("data-scientist"));
        assert!(json.contains("access:servers!user"));
        // absent description is omitted, not serialized as null
        assert!(!json.contains("description"));
    }

    #[test]
    fn test_definition_absent_vs_empty_scopes() {
        let absent: RoleDefinition = serde_json::from_str(r#"{"name": "abc"}"#).unwrap();
        assert_eq!(absent.scopes, None);

        let empty: RoleDefinition =
            serde_json::from_str(r#"{"name": "abc", "scopes": []}"#).unwrap();
        assert_eq!(empty.scopes, Some(vec![]));
    }
}
