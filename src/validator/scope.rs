//! OAuth2-style scope enforcement. Swagger 2.0's `security` field is an
//! array of requirement objects; scopes are AND'd within one requirement
//! object and OR'd across the array (the first fully-satisfied requirement
//! wins).

use crate::error::ValidationErrorType;
use crate::traverser::OpenApiTraverser;
use serde_json::Value;
use std::collections::HashSet;

/// Validates `requested_scopes` against `security` (an operation's
/// effective `security` array, already resolved to fall back to the
/// document's global `security` at model-construction time).
pub fn validate_scopes(
    security: &[Value],
    requested_scopes: &[String],
    operation_id: &str,
) -> Result<(), ValidationErrorType> {
    if security.is_empty() {
        log::debug!("operation '{}' declares no security requirements", operation_id);
        return Ok(());
    }

    let requested: HashSet<&str> = requested_scopes.iter().map(|s| s.as_str()).collect();

    for requirement in security {
        let requirement = OpenApiTraverser::require_object(requirement)?;

        let mut requirement_satisfied = true;
        for (scheme_name, scope_list) in requirement {
            let scope_list = OpenApiTraverser::require_array(scope_list)?;

            for scope in scope_list {
                let scope = OpenApiTraverser::require_str(scope)?;
                if !requested.contains(scope) {
                    requirement_satisfied = false;
                    break;
                }
            }

            if !requirement_satisfied {
                break;
            }
            log::debug!("scopes satisfy security scheme '{}'", scheme_name);
        }

        if requirement_satisfied {
            return Ok(());
        }
    }

    Err(ValidationErrorType::assertion_failed(&format!(
        "request scopes [{}] did not satisfy any security requirement of operation '{}'",
        requested_scopes.join(", "),
        operation_id
    )))
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_security_always_passes() {
        assert!(validate_scopes(&[], &[], "op").is_ok());
    }

    #[test]
    fn satisfied_requirement_passes() {
        let security = vec![json!({"oauth2": ["read", "write"]})];
        let requested = vec!["read".to_string(), "write".to_string(), "admin".to_string()];
        assert!(validate_scopes(&security, &requested, "op").is_ok());
    }

    #[test]
    fn missing_scope_fails() {
        let security = vec![json!({"oauth2": ["read", "write"]})];
        let requested = vec!["read".to_string()];
        assert!(validate_scopes(&security, &requested, "op").is_err());
    }

    #[test]
    fn or_across_requirements() {
        let security = vec![
            json!({"oauth2": ["admin"]}),
            json!({"oauth2": ["read"]}),
        ];
        let requested = vec!["read".to_string()];
        assert!(validate_scopes(&security, &requested, "op").is_ok());
    }

    #[test]
    fn empty_scope_list_in_requirement_auto_satisfies() {
        let security = vec![json!({"apiKey": []})];
        assert!(validate_scopes(&security, &[], "op").is_ok());
    }

    #[test]
    fn malformed_requirement_errors() {
        let security = vec![json!("malformed")];
        let result = validate_scopes(&security, &[], "op");
        assert!(result.is_err());
    }
}
