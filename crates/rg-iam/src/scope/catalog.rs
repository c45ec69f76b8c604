//! Hub Scope Registry
//!
//! Reference [`ScopeCatalog`] backed by the hub's static scope table.
//! Deployments integrating a different authorizer supply their own
//! catalog implementation.

use std::collections::HashSet;

use tracing::debug;

use crate::entity::{Entity, EntityKind};

use super::{split_filter, ScopeCatalog};

/// Metascope expanded to the owner's identity scope set.
pub const SELF_SCOPE: &str = "self";

/// Metascope resolved by the token authorizer to the permissions of the
/// token's owner. Passes through this catalog unexpanded.
pub const INHERIT_SCOPE: &str = "inherit";

/// Scopes known to the hub. Filterable scopes appear here by their base
/// name; `access:servers!user` validates against `access:servers`.
const HUB_SCOPES: &[&str] = &[
    "admin-ui",
    "admin:users",
    "admin:servers",
    "admin:services",
    "admin:groups",
    "users",
    "read:users",
    "list:users",
    "users:activity",
    "servers",
    "read:servers",
    "delete:servers",
    "tokens",
    "read:tokens",
    "groups",
    "read:groups",
    "list:groups",
    "services",
    "read:services",
    "list:services",
    "read:roles",
    "read:hub",
    "read:metrics",
    "access:servers",
    "access:services",
    "proxy",
    "shutdown",
    "shares",
    "read:shares",
];

/// Identity scopes granted by `self` for a user, each filtered to the
/// owner on expansion.
const USER_SELF_SCOPES: &[&str] = &[
    "access:servers",
    "delete:servers",
    "read:servers",
    "servers",
    "read:tokens",
    "tokens",
    "read:users",
    "users",
    "users:activity",
    "shares",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct HubScopeCatalog;

impl HubScopeCatalog {
    pub fn new() -> Self {
        Self
    }

    fn expand_one(&self, scope: &str, owner: &Entity, out: &mut HashSet<String>) {
        if scope == SELF_SCOPE {
            if owner.kind == EntityKind::User {
                for base in USER_SELF_SCOPES {
                    out.insert(format!("{base}!user={}", owner.name));
                }
            } else {
                debug!("'self' does not expand for {} {}", owner.kind, owner.name);
            }
            return;
        }
        if scope == INHERIT_SCOPE {
            out.insert(scope.to_string());
            return;
        }
        match split_filter(scope) {
            // bare entity filter, e.g. `users:activity!user`
            (base, Some(filter)) if !filter.contains('=') => {
                out.insert(format!("{base}!{filter}={}", owner.name));
            }
            _ => {
                out.insert(scope.to_string());
            }
        }
    }
}

impl ScopeCatalog for HubScopeCatalog {
    fn scope_exists(&self, scope: &str) -> bool {
        if scope == SELF_SCOPE || scope == INHERIT_SCOPE {
            return true;
        }
        let (base, _) = split_filter(scope);
        HUB_SCOPES.contains(&base)
    }

    fn expand_scopes(&self, raw: &HashSet<String>, owner: &Entity) -> HashSet<String> {
        let mut expanded = HashSet::new();
        for scope in raw {
            self.expand_one(scope, owner, &mut expanded);
        }
        expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(scopes: &[&str]) -> HashSet<String> {
        scopes.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_scope_existence() {
        let catalog = HubScopeCatalog::new();
        assert!(catalog.scope_exists("access:servers"));
        assert!(catalog.scope_exists("access:servers!user"));
        assert!(catalog.scope_exists("access:servers!server"));
        assert!(catalog.scope_exists("self"));
        assert!(catalog.scope_exists("inherit"));
        assert!(!catalog.scope_exists("no-such-scope"));
        assert!(!catalog.scope_exists("no-such-scope!user"));
    }

    #[test]
    fn test_bare_filter_expansion() {
        let catalog = HubScopeCatalog::new();
        let alice = Entity::new(EntityKind::User, "alice");

        let expanded = catalog.expand_scopes(&raw(&["users:activity!user"]), &alice);
        assert!(expanded.contains("users:activity!user=alice"));
        assert_eq!(expanded.len(), 1);
    }

    #[test]
    fn test_qualified_filter_passes_through() {
        let catalog = HubScopeCatalog::new();
        let alice = Entity::new(EntityKind::User, "alice");

        let expanded = catalog.expand_scopes(&raw(&["access:servers!user=bob"]), &alice);
        assert!(expanded.contains("access:servers!user=bob"));
    }

    #[test]
    fn test_self_expands_for_users_only() {
        let catalog = HubScopeCatalog::new();

        let alice = Entity::new(EntityKind::User, "alice");
        let expanded = catalog.expand_scopes(&raw(&["self"]), &alice);
        assert!(expanded.contains("access:servers!user=alice"));
        assert!(expanded.contains("tokens!user=alice"));
        assert!(!expanded.contains("self"));

        let svc = Entity::new(EntityKind::Service, "announcer");
        assert!(catalog.expand_scopes(&raw(&["self"]), &svc).is_empty());
    }

    #[test]
    fn test_inherit_passes_through() {
        let catalog = HubScopeCatalog::new();
        let token = Entity::new(EntityKind::Token, "t-abc123");

        let expanded = catalog.expand_scopes(&raw(&["inherit"]), &token);
        assert_eq!(expanded, raw(&["inherit"]));
    }
}
