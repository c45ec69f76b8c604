//! Default Role Policy
//!
//! Keeps every principal role-compliant: bootstrap defaults for new
//! principals and repair drift after bulk imports or migrations.

use std::sync::Arc;

use tracing::debug;

use crate::association::{AssociationManager, GrantOptions};
use crate::entity::{Entity, EntityKind};
use crate::role::defaults::RoleConfig;
use crate::shared::error::Result;
use crate::store::RoleDirectory;

pub struct DefaultRolePolicy {
    store: Arc<dyn RoleDirectory>,
    associations: Arc<AssociationManager>,
    config: Arc<RoleConfig>,
}

impl DefaultRolePolicy {
    pub fn new(
        store: Arc<dyn RoleDirectory>,
        associations: Arc<AssociationManager>,
        config: Arc<RoleConfig>,
    ) -> Self {
        Self {
            store,
            associations,
            config,
        }
    }

    /// Assign the default role set for a principal:
    ///
    /// - groups carry no default role
    /// - tokens get `token`
    /// - users and services get `admin` iff their admin flag is set
    ///   (stripped otherwise)
    /// - users always get `user`
    ///
    /// This is the sole rule reconciling the admin flag with `admin` role
    /// membership; re-invoke it whenever the flag changes. Idempotent.
    pub async fn assign_default_roles(&self, entity: &Entity) -> Result<()> {
        match entity.kind {
            EntityKind::Group => return Ok(()),
            EntityKind::Token => {
                self.associations
                    .grant_role(entity, self.config.token_role(), GrantOptions::default())
                    .await?;
                return Ok(());
            }
            EntityKind::User | EntityKind::Service => {}
        }

        debug!("Assigning default roles to {} {}", entity.kind, entity.name);
        let admin_role = self.config.admin_role();
        if entity.admin {
            self.associations
                .grant_role(entity, admin_role, GrantOptions::default())
                .await?;
        } else if self.store.association(entity, admin_role).await?.is_some() {
            self.associations
                .strip_role(entity, admin_role, GrantOptions::default())
                .await?;
        }
        if entity.kind == EntityKind::User {
            self.associations
                .grant_role(entity, self.config.user_role(), GrantOptions::default())
                .await?;
        }
        Ok(())
    }

    /// Repair sweep: every persisted entity of `kind` holding zero roles
    /// gets its defaults assigned. Groups and services are permitted to
    /// hold zero roles and are exempt.
    ///
    /// Not a continuous invariant: run after bulk imports or migrations.
    /// Idempotent and safe to re-run.
    pub async fn check_for_default_roles(&self, kind: EntityKind) -> Result<()> {
        if matches!(kind, EntityKind::Group | EntityKind::Service) {
            return Ok(());
        }
        for entity in self.store.entities_without_roles(kind).await? {
            self.assign_default_roles(&entity).await?;
        }
        self.store.commit().await?;
        Ok(())
    }
}
