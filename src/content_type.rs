//! Component C: negotiates request/response content types against an
//! operation's effective `consumes`/`produces` list.

use crate::error::{PayloadSection, Section, ValidationErrorType};

/// Strips parameters (e.g. `; charset=utf-8`) from a `Content-Type` header
/// value, returning the bare media type. Mirrors the teacher's
/// `extract_content_type` helper.
pub fn strip_parameters(raw: &str) -> Option<&str> {
    raw.split(';').map(str::trim).find(|part| part.contains('/'))
}

/// Default media type substituted for an absent `Content-Type` header.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Checks `content_type` (already stripped of parameters) against the
/// operation's `supported` media types. Swagger 2.0 negotiation is exact
/// string match, no q-value/wildcard parsing. An absent `content_type` is
/// treated as [`DEFAULT_CONTENT_TYPE`], so it can legitimately match a
/// declared `application/octet-stream` entry.
pub fn negotiate_request(
    content_type: Option<&str>,
    supported: &[String],
) -> Result<(), ValidationErrorType> {
    // No declared `consumes` and no body/formData parameter means there is
    // nothing to negotiate against.
    if supported.is_empty() {
        return Ok(());
    }

    let content_type = content_type.unwrap_or(DEFAULT_CONTENT_TYPE);

    if supported.iter().any(|s| s == content_type) {
        Ok(())
    } else {
        Err(ValidationErrorType::InvalidContentType(
            format!(
                "Invalid Content-Type ({}). These are supported: {}",
                content_type,
                supported.join(", ")
            ),
            Section::Payload(PayloadSection::Header),
        ))
    }
}

/// Response-side negotiation skips entirely when the response has no body
/// schema (nothing to negotiate) or the status is one of the well-known
/// bodyless codes (204 No Content, 304 Not Modified).
pub fn should_validate_response_body(status_code: &str, has_schema: bool) -> bool {
    has_schema && status_code != "204" && status_code != "304"
}

pub fn negotiate_response(
    content_type: Option<&str>,
    supported: &[String],
) -> Result<(), ValidationErrorType> {
    negotiate_request(content_type, supported)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn strips_charset_parameter() {
        assert_eq!(
            strip_parameters("application/json; charset=utf-8"),
            Some("application/json")
        );
    }

    #[test]
    fn accepts_exact_match() {
        let supported = vec!["application/json".to_string(), "application/xml".to_string()];
        assert!(negotiate_request(Some("application/json"), &supported).is_ok());
    }

    #[test]
    fn rejects_unsupported_content_type_with_exact_message() {
        let supported = vec!["application/json".to_string(), "application/xml".to_string()];
        let err = negotiate_request(Some("application/x-yaml"), &supported).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid Content-Type in payload --> header: Invalid Content-Type (application/x-yaml). These are supported: application/json, application/xml"
        );
    }

    #[test]
    fn skips_negotiation_when_nothing_is_declared() {
        assert!(negotiate_request(None, &[]).is_ok());
    }

    #[test]
    fn absent_content_type_defaults_to_octet_stream_and_is_reported_as_such() {
        let supported = vec!["application/json".to_string()];
        let err = negotiate_request(None, &supported).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid Content-Type in payload --> header: Invalid Content-Type (application/octet-stream). These are supported: application/json"
        );
    }

    #[test]
    fn absent_content_type_matches_declared_octet_stream() {
        let supported = vec!["application/octet-stream".to_string()];
        assert!(negotiate_request(None, &supported).is_ok());
    }

    #[test]
    fn skips_body_validation_for_204() {
        assert!(!should_validate_response_body("204", true));
    }

    #[test]
    fn skips_body_validation_when_no_schema() {
        assert!(!should_validate_response_body("200", false));
    }
}
