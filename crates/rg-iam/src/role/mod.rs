//! Role Aggregate
//!
//! Role definitions and their lifecycle.

pub mod defaults;
pub mod entity;
pub mod service;
pub mod validate;

// Re-export main types
pub use defaults::{BuiltinRole, RoleConfig, DEFAULT_ROLES};
pub use entity::{Role, RoleDefinition};
pub use service::{CreateRoleOptions, RoleService};
