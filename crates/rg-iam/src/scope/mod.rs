//! Scopes
//!
//! Permission strings, optionally parameterized with a filter (`!user`) or
//! a metascope (`self`, `inherit`). Roles bundle raw scopes; expansion
//! resolves them relative to an owning entity and is delegated to the
//! deployment's [`ScopeCatalog`].

use std::collections::HashSet;

use crate::entity::Entity;
use crate::role::entity::Role;

pub mod catalog;

pub use catalog::HubScopeCatalog;

/// Scope validation and expansion, supplied by the surrounding deployment.
pub trait ScopeCatalog: Send + Sync {
    /// Whether `scope` names a scope known to the system (any `!filter`
    /// suffix is ignored for the existence check).
    fn scope_exists(&self, scope: &str) -> bool;

    /// Fully expand a raw scope set relative to its owner, resolving
    /// metascopes and entity-relative filters.
    fn expand_scopes(&self, raw: &HashSet<String>, owner: &Entity) -> HashSet<String>;
}

/// Union of raw (unexpanded) scopes across a collection of roles.
pub fn roles_to_scopes(roles: &[Role]) -> HashSet<String> {
    let mut raw = HashSet::new();
    for role in roles {
        raw.extend(role.scopes.iter().cloned());
    }
    raw
}

/// Fully expanded scope set for a collection of roles held by `owner`.
pub fn roles_to_expanded_scopes(
    catalog: &dyn ScopeCatalog,
    roles: &[Role],
    owner: &Entity,
) -> HashSet<String> {
    catalog.expand_scopes(&roles_to_scopes(roles), owner)
}

/// Split a scope into its base and optional `!filter` suffix.
pub fn split_filter(scope: &str) -> (&str, Option<&str>) {
    match scope.split_once('!') {
        Some((base, filter)) => (base, Some(filter)),
        None => (scope, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_to_scopes_unions() {
        let a = Role::new("a").with_scopes(["read:users", "tokens"]);
        let b = Role::new("b").with_scopes(["tokens", "read:hub"]);

        let raw = roles_to_scopes(&[a, b]);
        assert_eq!(raw.len(), 3);
        assert!(raw.contains("read:users"));
        assert!(raw.contains("tokens"));
        assert!(raw.contains("read:hub"));
    }

    #[test]
    fn test_split_filter() {
        assert_eq!(split_filter("access:servers"), ("access:servers", None));
        assert_eq!(
            split_filter("access:servers!user"),
            ("access:servers", Some("user"))
        );
        assert_eq!(
            split_filter("access:servers!user=alice"),
            ("access:servers", Some("user=alice"))
        );
    }
}
