//! Rolegate IAM
//!
//! Role-based access control core for a multi-user hub:
//! - Named roles carrying raw scope sets
//! - Role associations for users, services, groups, and API tokens, with
//!   auth-provider-managed grants reconciled against manual ones
//! - Default-role bootstrapping and drift repair
//! - Scope validation and expansion delegated to a pluggable catalog
//!
//! The backing database is an external collaborator behind the
//! [`RoleDirectory`] trait; this crate holds no authoritative in-memory
//! state.
//!
//! ## Module Organization
//!
//! - `role` - role entity, built-in definitions, validation, service
//! - `association` - grants and revocations
//! - `policy` - default-role bootstrapping and repair
//! - `scope` - scope catalog contract and reference registry
//! - `store` - persistence seam and in-memory directory
//! - `entity` - principal snapshots
//! - `shared` - cross-cutting error types

pub mod association;
pub mod entity;
pub mod policy;
pub mod role;
pub mod scope;
pub mod shared;
pub mod store;

// Re-export common types from shared
pub use shared::error::{IamError, Result};

// Re-export main entity types for convenience
pub use entity::{Entity, EntityKind};
pub use role::defaults::{BuiltinRole, RoleConfig, DEFAULT_ROLES};
pub use role::entity::{Role, RoleDefinition};

// Re-export services
pub use association::{AssociationManager, GrantOptions, RoleArg};
pub use policy::DefaultRolePolicy;
pub use role::service::{CreateRoleOptions, RoleService};
pub use role::validate::validate_role_name;

// Re-export the scope and store seams
pub use scope::{roles_to_expanded_scopes, roles_to_scopes, HubScopeCatalog, ScopeCatalog};
pub use store::{MemoryDirectory, RoleAssociation, RoleDirectory, StoreError};
