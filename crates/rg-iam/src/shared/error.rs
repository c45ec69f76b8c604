//! IAM Error Types

use thiserror::Error;

use crate::entity::EntityKind;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum IamError {
    #[error(
        "Invalid role name {name:?}: role names must be 3-255 characters, \
         contain only lowercase ascii letters, digits, and the URL-unreserved \
         characters '-.~_', start with a letter, and end with a letter or digit"
    )]
    InvalidRoleName { name: String },

    #[error("Cannot override admin role admin.{attribute} = {value}")]
    AdminImmutable {
        attribute: &'static str,
        value: String,
    },

    #[error("Role {role} refers to scopes that do not exist: {scopes:?}")]
    ScopeNotFound { role: String, scopes: Vec<String> },

    #[error("Role definition must have a name")]
    MissingRoleName,

    #[error("Role {name:?} does not exist")]
    RoleNotFound { name: String },

    #[error("{kind} {name:?} does not exist")]
    EntityNotFound { kind: EntityKind, name: String },

    #[error("Default role {name:?} cannot be removed")]
    ProtectedRole { name: String },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl IamError {
    pub fn invalid_role_name(name: impl Into<String>) -> Self {
        Self::InvalidRoleName { name: name.into() }
    }

    pub fn role_not_found(name: impl Into<String>) -> Self {
        Self::RoleNotFound { name: name.into() }
    }

    pub fn entity_not_found(kind: EntityKind, name: impl Into<String>) -> Self {
        Self::EntityNotFound {
            kind,
            name: name.into(),
        }
    }

    pub fn protected_role(name: impl Into<String>) -> Self {
        Self::ProtectedRole { name: name.into() }
    }
}

pub type Result<T> = std::result::Result<T, IamError>;
