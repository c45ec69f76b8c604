//! Role Service
//!
//! Insert-or-update and deletion of role definitions.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::scope::ScopeCatalog;
use crate::shared::error::{IamError, Result};
use crate::store::RoleDirectory;

use super::defaults::RoleConfig;
use super::entity::{Role, RoleDefinition};
use super::validate::{validate_admin_immutability, validate_role_name};

/// Options for [`RoleService::create_role`].
#[derive(Debug, Clone, Copy)]
pub struct CreateRoleOptions {
    /// Commit the surrounding transaction after mutating.
    pub commit: bool,
    /// When reapplying a partial definition over an existing role, also
    /// reset omitted attributes back to their defaults. Pass false to
    /// reapply a definition without wiping customizations.
    pub reset_to_defaults: bool,
}

impl Default for CreateRoleOptions {
    fn default() -> Self {
        Self {
            commit: true,
            reset_to_defaults: true,
        }
    }
}

pub struct RoleService {
    store: Arc<dyn RoleDirectory>,
    catalog: Arc<dyn ScopeCatalog>,
    config: Arc<RoleConfig>,
}

impl RoleService {
    pub fn new(
        store: Arc<dyn RoleDirectory>,
        catalog: Arc<dyn ScopeCatalog>,
        config: Arc<RoleConfig>,
    ) -> Self {
        Self {
            store,
            catalog,
            config,
        }
    }

    /// Adds a new role or modifies an existing one (matched by name).
    ///
    /// Fails with [`IamError::MissingRoleName`] when the definition lacks a
    /// name, [`IamError::InvalidRoleName`] on a malformed name,
    /// [`IamError::AdminImmutable`] when redefining the admin role, and
    /// [`IamError::ScopeNotFound`] when the definition references scopes
    /// unknown to the catalog. Nothing is written on a validation failure.
    pub async fn create_role(
        &self,
        def: &RoleDefinition,
        opts: CreateRoleOptions,
    ) -> Result<Role> {
        let name = def.name.as_deref().ok_or(IamError::MissingRoleName)?;
        validate_role_name(name)?;
        validate_admin_immutability(def, &self.config)?;

        match def.scopes.as_deref() {
            Some(scopes) if !scopes.is_empty() => {
                let unknown: Vec<String> = scopes
                    .iter()
                    .filter(|s| !self.catalog.scope_exists(s))
                    .cloned()
                    .collect();
                if !unknown.is_empty() {
                    return Err(IamError::ScopeNotFound {
                        role: name.to_string(),
                        scopes: unknown,
                    });
                }
            }
            _ => warn!("Role {} will have no scopes", name),
        }

        let role = match self.store.find_role(name).await? {
            None => {
                let mut role = Role::new(name);
                role.description = def.description.clone();
                role.scopes = def.scopes.clone().unwrap_or_default();
                role.managed_by_auth = def.managed_by_auth;
                self.store.insert_role(&role).await?;
                if !self.config.matches_default(def) {
                    info!("Role {} added to database", name);
                }
                role
            }
            Some(existing) => self.apply_definition(existing, def, opts).await?,
        };

        if opts.commit {
            self.store.commit().await?;
        }
        Ok(role)
    }

    /// Update an existing role's attributes from a (possibly partial)
    /// definition. Attribute defaults mirror the column defaults:
    /// `description -> None`, `scopes -> []`.
    async fn apply_definition(
        &self,
        mut role: Role,
        def: &RoleDefinition,
        opts: CreateRoleOptions,
    ) -> Result<Role> {
        let mut changed = false;

        let new_description = def.description.clone();
        if new_description != role.description
            && (opts.reset_to_defaults || new_description.is_some())
        {
            info!("Role attribute {}.description has been changed", role.name);
            debug!(
                "Role attribute {}.description changed from {:?} to {:?}",
                role.name, role.description, new_description
            );
            role.description = new_description;
            changed = true;
        }

        let new_scopes = def.scopes.clone().unwrap_or_default();
        if new_scopes != role.scopes && (opts.reset_to_defaults || !new_scopes.is_empty()) {
            info!("Role attribute {}.scopes has been changed", role.name);
            debug!(
                "Role attribute {}.scopes changed from {:?} to {:?}",
                role.name, role.scopes, new_scopes
            );
            role.scopes = new_scopes;
            changed = true;
        }

        if changed {
            role.updated_at = Utc::now();
            self.store.update_role(&role).await?;
        }
        Ok(role)
    }

    /// Removes a role.
    ///
    /// The four built-in default roles are protected; deleting an unknown
    /// role is an error rather than a no-op.
    pub async fn delete_role(&self, name: &str) -> Result<()> {
        if self.config.is_default(name) {
            return Err(IamError::protected_role(name));
        }
        if !self.store.delete_role(name).await? {
            return Err(IamError::role_not_found(name));
        }
        self.store.commit().await?;
        info!("Role {} has been deleted", name);
        Ok(())
    }

    /// Ensure the built-in default roles exist with their fixed
    /// definitions. Call at startup, before any grants.
    pub async fn sync_default_roles(&self) -> Result<()> {
        for def in self.config.definitions() {
            self.create_role(
                &def,
                CreateRoleOptions {
                    commit: false,
                    ..Default::default()
                },
            )
            .await?;
        }
        self.store.commit().await?;
        Ok(())
    }
}
