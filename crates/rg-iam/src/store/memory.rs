//! In-Memory Directory
//!
//! Write-through backing store for tests and development seeding. Four
//! association tables, one per entity kind, mirror the relational layout
//! production deployments wire up.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::entity::{Entity, EntityKind};
use crate::role::entity::Role;

use super::{RoleAssociation, RoleDirectory, StoreError};

/// Keyed by `(entity_id, role_name)`.
type AssociationTable = RwLock<HashMap<(String, String), RoleAssociation>>;

#[derive(Default)]
pub struct MemoryDirectory {
    roles: RwLock<HashMap<String, Role>>,
    entities: RwLock<HashMap<(EntityKind, String), Entity>>,
    /// group id -> member user ids
    group_members: RwLock<HashMap<String, Vec<String>>>,
    user_roles: AssociationTable,
    service_roles: AssociationTable,
    group_roles: AssociationTable,
    token_roles: AssociationTable,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a principal. Returns the stored snapshot.
    pub fn add_entity(&self, entity: Entity) -> Entity {
        self.entities
            .write()
            .insert((entity.kind, entity.name.clone()), entity.clone());
        entity
    }

    /// Record group membership for a user.
    pub fn add_group_member(&self, group: &Entity, user: &Entity) {
        let mut members = self.group_members.write();
        let ids = members.entry(group.id.clone()).or_default();
        if !ids.contains(&user.id) {
            ids.push(user.id.clone());
        }
    }

    fn table(&self, kind: EntityKind) -> &AssociationTable {
        match kind {
            EntityKind::User => &self.user_roles,
            EntityKind::Service => &self.service_roles,
            EntityKind::Group => &self.group_roles,
            EntityKind::Token => &self.token_roles,
        }
    }
}

#[async_trait]
impl RoleDirectory for MemoryDirectory {
    async fn find_role(&self, name: &str) -> Result<Option<Role>, StoreError> {
        Ok(self.roles.read().get(name).cloned())
    }

    async fn insert_role(&self, role: &Role) -> Result<(), StoreError> {
        let mut roles = self.roles.write();
        if roles.contains_key(&role.name) {
            return Err(StoreError::constraint(format!(
                "role {} already exists",
                role.name
            )));
        }
        roles.insert(role.name.clone(), role.clone());
        Ok(())
    }

    async fn update_role(&self, role: &Role) -> Result<(), StoreError> {
        let mut roles = self.roles.write();
        match roles.get_mut(&role.name) {
            Some(stored) => {
                *stored = role.clone();
                Ok(())
            }
            None => Err(StoreError::backend(format!(
                "role {} is not persisted",
                role.name
            ))),
        }
    }

    async fn delete_role(&self, name: &str) -> Result<bool, StoreError> {
        let existed = self.roles.write().remove(name).is_some();
        if existed {
            for kind in [
                EntityKind::User,
                EntityKind::Service,
                EntityKind::Group,
                EntityKind::Token,
            ] {
                self.table(kind)
                    .write()
                    .retain(|(_, role_name), _| role_name.as_str() != name);
            }
        }
        Ok(existed)
    }

    async fn find_entity(
        &self,
        kind: EntityKind,
        name: &str,
    ) -> Result<Option<Entity>, StoreError> {
        Ok(self
            .entities
            .read()
            .get(&(kind, name.to_string()))
            .cloned())
    }

    async fn entities_without_roles(&self, kind: EntityKind) -> Result<Vec<Entity>, StoreError> {
        let table = self.table(kind).read();
        Ok(self
            .entities
            .read()
            .values()
            .filter(|e| e.kind == kind)
            .filter(|e| !table.keys().any(|(entity_id, _)| *entity_id == e.id))
            .cloned()
            .collect())
    }

    async fn member_groups(&self, user: &Entity) -> Result<Vec<Entity>, StoreError> {
        let members = self.group_members.read();
        Ok(self
            .entities
            .read()
            .values()
            .filter(|e| e.is_group())
            .filter(|g| {
                members
                    .get(&g.id)
                    .is_some_and(|ids| ids.contains(&user.id))
            })
            .cloned()
            .collect())
    }

    async fn roles_of(&self, entity: &Entity) -> Result<Vec<Role>, StoreError> {
        let roles = self.roles.read();
        Ok(self
            .table(entity.kind)
            .read()
            .keys()
            .filter(|(entity_id, _)| *entity_id == entity.id)
            .filter_map(|(_, role_name)| roles.get(role_name).cloned())
            .collect())
    }

    async fn association(
        &self,
        entity: &Entity,
        role_name: &str,
    ) -> Result<Option<RoleAssociation>, StoreError> {
        Ok(self
            .table(entity.kind)
            .read()
            .get(&(entity.id.clone(), role_name.to_string()))
            .cloned())
    }

    async fn insert_association(
        &self,
        entity: &Entity,
        role_name: &str,
        managed_by_auth: bool,
    ) -> Result<(), StoreError> {
        let mut table = self.table(entity.kind).write();
        let key = (entity.id.clone(), role_name.to_string());
        if table.contains_key(&key) {
            return Err(StoreError::constraint(format!(
                "association ({}, {}) already exists",
                entity.name, role_name
            )));
        }
        table.insert(
            key,
            RoleAssociation {
                entity_id: entity.id.clone(),
                role_name: role_name.to_string(),
                managed_by_auth,
            },
        );
        Ok(())
    }

    async fn set_managed(
        &self,
        entity: &Entity,
        role_name: &str,
        managed_by_auth: bool,
    ) -> Result<(), StoreError> {
        let mut table = self.table(entity.kind).write();
        match table.get_mut(&(entity.id.clone(), role_name.to_string())) {
            Some(association) => {
                association.managed_by_auth = managed_by_auth;
                Ok(())
            }
            None => Err(StoreError::backend(format!(
                "association ({}, {}) is not persisted",
                entity.name, role_name
            ))),
        }
    }

    async fn delete_association(
        &self,
        entity: &Entity,
        role_name: &str,
    ) -> Result<bool, StoreError> {
        Ok(self
            .table(entity.kind)
            .write()
            .remove(&(entity.id.clone(), role_name.to_string()))
            .is_some())
    }

    /// Mutations are write-through; nothing is buffered.
    async fn commit(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_association_uniqueness() {
        let store = MemoryDirectory::new();
        let alice = store.add_entity(Entity::new(EntityKind::User, "alice"));
        store
            .insert_role(&Role::new("custom"))
            .await
            .unwrap();

        store
            .insert_association(&alice, "custom", false)
            .await
            .unwrap();
        let err = store
            .insert_association(&alice, "custom", false)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Constraint { .. }));
    }

    #[tokio::test]
    async fn test_delete_role_cascades_associations() {
        let store = MemoryDirectory::new();
        let alice = store.add_entity(Entity::new(EntityKind::User, "alice"));
        store.insert_role(&Role::new("custom")).await.unwrap();
        store
            .insert_association(&alice, "custom", false)
            .await
            .unwrap();

        assert!(store.delete_role("custom").await.unwrap());
        assert!(store.association(&alice, "custom").await.unwrap().is_none());
        assert!(!store.delete_role("custom").await.unwrap());
    }

    #[tokio::test]
    async fn test_tables_are_separate_per_kind() {
        let store = MemoryDirectory::new();
        let alice = store.add_entity(Entity::new(EntityKind::User, "shared-name"));
        let svc = store.add_entity(Entity::new(EntityKind::Service, "shared-name"));
        store.insert_role(&Role::new("custom")).await.unwrap();

        store
            .insert_association(&alice, "custom", false)
            .await
            .unwrap();
        assert!(store.association(&svc, "custom").await.unwrap().is_none());
    }
}
