//! Persistence Seam
//!
//! The backing directory exclusively owns all role, principal, and
//! association rows; the services in this crate hold no authoritative
//! in-memory state and read/write everything through this contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entity::{Entity, EntityKind};
use crate::role::entity::Role;

pub mod memory;

pub use memory::MemoryDirectory;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Backend failure: {message}")]
    Backend { message: String },

    #[error("Constraint violation: {message}")]
    Constraint { message: String },
}

impl StoreError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    pub fn constraint(message: impl Into<String>) -> Self {
        Self::Constraint {
            message: message.into(),
        }
    }
}

/// Join row between a principal and a role.
///
/// At most one association exists per `(entity, role)` pair. The
/// `managed_by_auth` flag records whether the grant is owned by an
/// external authentication provider rather than manual administration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAssociation {
    pub entity_id: String,
    pub role_name: String,
    #[serde(default)]
    pub managed_by_auth: bool,
}

/// Relational persistence contract consumed by the IAM services.
///
/// One queryable association table exists per entity kind
/// (`user↔role`, `service↔role`, `group↔role`, `token↔role`);
/// implementations select the table with a fixed match on [`EntityKind`].
///
/// Each method is a single atomic statement. `commit` flushes the
/// surrounding transaction: services take an explicit commit flag so
/// callers can batch several mutations and commit once at the end.
/// Uniqueness on `(entity_id, role_name)` is enforced at this layer.
#[async_trait]
pub trait RoleDirectory: Send + Sync {
    async fn find_role(&self, name: &str) -> Result<Option<Role>, StoreError>;

    async fn insert_role(&self, role: &Role) -> Result<(), StoreError>;

    async fn update_role(&self, role: &Role) -> Result<(), StoreError>;

    /// Deletes the role and every association referencing it.
    /// Returns false if no such role exists.
    async fn delete_role(&self, name: &str) -> Result<bool, StoreError>;

    async fn find_entity(
        &self,
        kind: EntityKind,
        name: &str,
    ) -> Result<Option<Entity>, StoreError>;

    /// Entities of `kind` currently holding zero roles.
    async fn entities_without_roles(&self, kind: EntityKind) -> Result<Vec<Entity>, StoreError>;

    /// Groups the given user belongs to.
    async fn member_groups(&self, user: &Entity) -> Result<Vec<Entity>, StoreError>;

    /// Roles directly associated with the entity.
    async fn roles_of(&self, entity: &Entity) -> Result<Vec<Role>, StoreError>;

    async fn association(
        &self,
        entity: &Entity,
        role_name: &str,
    ) -> Result<Option<RoleAssociation>, StoreError>;

    /// Inserts the `(entity, role)` join row. Fails with a constraint
    /// violation if the association already exists.
    async fn insert_association(
        &self,
        entity: &Entity,
        role_name: &str,
        managed_by_auth: bool,
    ) -> Result<(), StoreError>;

    /// Updates the managed flag on an existing association.
    async fn set_managed(
        &self,
        entity: &Entity,
        role_name: &str,
        managed_by_auth: bool,
    ) -> Result<(), StoreError>;

    /// Removes the association. Returns false if it did not exist.
    async fn delete_association(
        &self,
        entity: &Entity,
        role_name: &str,
    ) -> Result<bool, StoreError>;

    /// Flush the surrounding transaction.
    async fn commit(&self) -> Result<(), StoreError>;
}
