//! Role Associations
//!
//! Grants and revocations of roles to principals, including grants whose
//! lifecycle is owned by an external authentication provider.

use std::sync::Arc;

use tracing::{debug, info};

use crate::entity::{Entity, EntityKind};
use crate::role::entity::Role;
use crate::shared::error::{IamError, Result};
use crate::store::RoleDirectory;

/// Role argument accepted by grant/strip: a resolved role or a name to
/// look up. Normalized to a [`Role`] before any mutation.
#[derive(Debug, Clone, Copy)]
pub enum RoleArg<'a> {
    Role(&'a Role),
    Name(&'a str),
}

impl<'a> From<&'a Role> for RoleArg<'a> {
    fn from(role: &'a Role) -> Self {
        Self::Role(role)
    }
}

impl<'a> From<&'a str> for RoleArg<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

/// Options for [`AssociationManager::grant_role`] and
/// [`AssociationManager::strip_role`].
///
/// `managed` does not gate removal on strip; it exists there for
/// call-signature symmetry with grant.
#[derive(Debug, Clone, Copy)]
pub struct GrantOptions {
    /// Mark the association as owned by an external auth provider.
    pub managed: bool,
    /// Commit the surrounding transaction after mutating.
    pub commit: bool,
}

impl Default for GrantOptions {
    fn default() -> Self {
        Self {
            managed: false,
            commit: true,
        }
    }
}

impl GrantOptions {
    pub fn managed() -> Self {
        Self {
            managed: true,
            ..Self::default()
        }
    }
}

pub struct AssociationManager {
    store: Arc<dyn RoleDirectory>,
}

impl AssociationManager {
    pub fn new(store: Arc<dyn RoleDirectory>) -> Self {
        Self { store }
    }

    /// Look up a principal by kind and name, failing if absent.
    pub async fn find_entity(&self, kind: EntityKind, name: &str) -> Result<Entity> {
        self.store
            .find_entity(kind, name)
            .await?
            .ok_or_else(|| IamError::entity_not_found(kind, name))
    }

    /// Resolve a role argument, failing if a named role does not exist.
    async fn resolve(&self, role: RoleArg<'_>) -> Result<Role> {
        match role {
            RoleArg::Role(role) => Ok(role.clone()),
            RoleArg::Name(name) => self
                .store
                .find_role(name)
                .await?
                .ok_or_else(|| IamError::role_not_found(name)),
        }
    }

    /// Grant a role to a principal.
    ///
    /// Safe to call repeatedly: an existing association is left alone
    /// unless its managed flag needs raising, in which case the flag is
    /// reconciled in place rather than a second row created.
    pub async fn grant_role<'a>(
        &self,
        entity: &Entity,
        role: impl Into<RoleArg<'a>>,
        opts: GrantOptions,
    ) -> Result<()> {
        let role = self.resolve(role.into()).await?;
        match self.store.association(entity, &role.name).await? {
            Some(existing) => {
                if opts.managed && !existing.managed_by_auth {
                    self.store.set_managed(entity, &role.name, true).await?;
                    info!(
                        "Marking role {} as managed for {} {}",
                        role.name, entity.kind, entity.name
                    );
                    if opts.commit {
                        self.store.commit().await?;
                    }
                } else {
                    debug!(
                        "{} {} already holds role {}",
                        entity.kind, entity.name, role.name
                    );
                }
            }
            None => {
                self.store
                    .insert_association(entity, &role.name, opts.managed)
                    .await?;
                info!(
                    "Adding role {} for {} {}",
                    role.name, entity.kind, entity.name
                );
                if opts.commit {
                    self.store.commit().await?;
                }
            }
        }
        Ok(())
    }

    /// Remove a role from a principal.
    ///
    /// A missing association is a no-op; removal is unconditional
    /// regardless of the managed flag.
    pub async fn strip_role<'a>(
        &self,
        entity: &Entity,
        role: impl Into<RoleArg<'a>>,
        opts: GrantOptions,
    ) -> Result<()> {
        let role = self.resolve(role.into()).await?;
        if self.store.delete_association(entity, &role.name).await? {
            if opts.commit {
                self.store.commit().await?;
            }
            info!(
                "Removing role {} for {} {}",
                role.name, entity.kind, entity.name
            );
        }
        Ok(())
    }

    /// Grant each named role in sequence.
    ///
    /// The first unknown name aborts the remaining grants; pre-validate
    /// the list when partial application must be avoided.
    pub async fn update_roles(&self, entity: &Entity, names: &[&str]) -> Result<()> {
        for name in names {
            self.grant_role(entity, *name, GrantOptions::default())
                .await?;
        }
        Ok(())
    }

    /// Roles held by a principal. Users additionally inherit the roles of
    /// every group they belong to; the result is deduplicated by name.
    pub async fn get_roles_for(&self, entity: &Entity) -> Result<Vec<Role>> {
        let mut roles = self.store.roles_of(entity).await?;
        if entity.kind == EntityKind::User {
            for group in self.store.member_groups(entity).await? {
                for role in self.store.roles_of(&group).await? {
                    if !roles.iter().any(|r| r.name == role.name) {
                        roles.push(role);
                    }
                }
            }
        }
        Ok(roles)
    }
}
