//! Role Definition Validation

use regex::Regex;

use crate::shared::error::{IamError, Result};

use super::defaults::{RoleConfig, ADMIN};
use super::entity::RoleDefinition;

/// Role name format: 3-255 chars, lowercase ascii letters, digits, and the
/// URL-unreserved characters `-.~_`; starts with a letter, ends with a
/// letter or digit.
fn role_name_pattern() -> &'static Regex {
    static PATTERN: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z][a-z0-9\-_~.]{1,253}[a-z0-9]$").unwrap())
}

pub fn validate_role_name(name: &str) -> Result<()> {
    if role_name_pattern().is_match(name) {
        Ok(())
    } else {
        Err(IamError::invalid_role_name(name))
    }
}

/// The built-in `admin` role cannot be redefined: a definition naming it
/// may not carry a `description` or `scopes` differing from the built-in
/// specification. Omitted attributes are fine.
pub fn validate_admin_immutability(def: &RoleDefinition, config: &RoleConfig) -> Result<()> {
    if def.name.as_deref() != Some(ADMIN.name) {
        return Ok(());
    }
    let Some(spec) = config.get(ADMIN.name) else {
        return Ok(());
    };

    if let Some(description) = &def.description {
        if description != spec.description {
            return Err(IamError::AdminImmutable {
                attribute: "description",
                value: description.clone(),
            });
        }
    }
    if let Some(scopes) = &def.scopes {
        if !spec.scopes_match(scopes) {
            return Err(IamError::AdminImmutable {
                attribute: "scopes",
                value: format!("{scopes:?}"),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_role_names() {
        for name in [
            "abc",
            "data-scientist",
            "team.alpha",
            "a-b_c~d.e2",
            "user2",
            "abc123",
        ] {
            assert!(validate_role_name(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn test_invalid_role_names() {
        for name in [
            "ab",            // too short
            "Admin",         // uppercase
            "9lives",        // leading digit
            "trailing-",     // trailing hyphen
            "has space",     // embedded whitespace
            "-leading",      // leading hyphen
            "",              // empty
        ] {
            let err = validate_role_name(name).unwrap_err();
            assert!(
                matches!(err, IamError::InvalidRoleName { .. }),
                "{name} should be invalid"
            );
        }
    }

    #[test]
    fn test_max_length_boundary() {
        let ok = format!("a{}z", "b".repeat(253));
        assert_eq!(ok.len(), 255);
        assert!(validate_role_name(&ok).is_ok());

        let too_long = format!("a{}z", "b".repeat(254));
        assert!(validate_role_name(&too_long).is_err());
    }

    #[test]
    fn test_admin_override_rejected() {
        let config = RoleConfig::standard();

        let scopes = RoleDefinition::named("admin").with_scopes(["tokens"]);
        assert!(matches!(
            validate_admin_immutability(&scopes, &config),
            Err(IamError::AdminImmutable {
                attribute: "scopes",
                ..
            })
        ));

        let description = RoleDefinition::named("admin").with_description("mine now");
        assert!(matches!(
            validate_admin_immutability(&description, &config),
            Err(IamError::AdminImmutable {
                attribute: "description",
                ..
            })
        ));
    }

    #[test]
    fn test_admin_matching_or_absent_attributes_accepted() {
        let config = RoleConfig::standard();

        // bare reference to the role
        let bare = RoleDefinition::named("admin");
        assert!(validate_admin_immutability(&bare, &config).is_ok());

        // restating the built-in definition verbatim
        let verbatim = ADMIN.to_definition();
        assert!(validate_admin_immutability(&verbatim, &config).is_ok());

        // other roles are not constrained
        let other = RoleDefinition::named("custom").with_scopes(["tokens"]);
        assert!(validate_admin_immutability(&other, &config).is_ok());
    }
}
