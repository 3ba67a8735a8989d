//! Component A: compiles an OpenAPI path template (e.g. `/pets/{id}`) into a
//! [`regex::Regex`] with one named capture group per `{name}` token, so
//! dispatch is a single `is_match`/`captures` call instead of a segment
//! walk.

use crate::error::ValidationErrorType;
use regex::Regex;
use std::collections::HashMap;

#[derive(Debug)]
pub struct PathMatcher {
    template: String,
    regex: Regex,
    /// Parameter names in the order their capture groups appear.
    param_names: Vec<String>,
}

impl PathMatcher {
    /// Compiles `template` into a matcher. Fails if the same `{name}` token
    /// appears more than once in the template -- a template can't
    /// unambiguously map a path segment back to more than one parameter.
    pub fn compile(template: &str) -> Result<Self, ValidationErrorType> {
        let mut pattern = String::from("^");
        let mut param_names = Vec::new();

        for segment in template.split('/') {
            if segment.is_empty() {
                continue;
            }
            pattern.push('/');
            if segment.starts_with('{') && segment.ends_with('}') && segment.len() > 2 {
                let name = &segment[1..segment.len() - 1];
                if param_names.iter().any(|existing: &String| existing == name) {
                    return Err(ValidationErrorType::assertion_failed(&format!(
                        "path template '{}' uses parameter name '{}' more than once",
                        template, name
                    )));
                }
                param_names.push(name.to_string());
                pattern.push_str(&format!("(?P<{}>[^/]+)", sanitize_group_name(name)));
            } else {
                pattern.push_str(&regex::escape(segment));
            }
        }
        pattern.push('$');

        let regex = Regex::new(&pattern).map_err(|e| {
            ValidationErrorType::assertion_failed(&format!(
                "failed to compile path template '{}': {}",
                template, e
            ))
        })?;

        Ok(Self {
            template: template.to_string(),
            regex,
            param_names,
        })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Returns `true` if `path` matches this template.
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Matches `path` and returns the captured path-parameter values keyed
    /// by parameter name.
    pub fn captures(&self, path: &str) -> Option<HashMap<String, String>> {
        let caps = self.regex.captures(path)?;
        Some(
            self.param_names
                .iter()
                .map(|name| {
                    let value = caps
                        .name(sanitize_group_name(name).as_str())
                        .unwrap()
                        .as_str()
                        .to_string();
                    (name.clone(), value)
                })
                .collect(),
        )
    }
}

/// Regex named groups only allow `[0-9A-Za-z_]`; OpenAPI parameter names are
/// unrestricted, so sanitize to a safe group name. Uniqueness is already
/// guaranteed by `compile`'s duplicate-name check operating on the raw name.
fn sanitize_group_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn matches_literal_path() {
        let matcher = PathMatcher::compile("/pets").unwrap();
        assert!(matcher.is_match("/pets"));
        assert!(!matcher.is_match("/pets/1"));
    }

    #[test]
    fn captures_single_parameter() {
        let matcher = PathMatcher::compile("/pets/{petId}").unwrap();
        let caps = matcher.captures("/pets/42").unwrap();
        assert_eq!(caps.get("petId"), Some(&"42".to_string()));
    }

    #[test]
    fn captures_multiple_parameters_in_order() {
        let matcher = PathMatcher::compile("/users/{userId}/posts/{postId}").unwrap();
        let caps = matcher.captures("/users/7/posts/99").unwrap();
        assert_eq!(caps.get("userId"), Some(&"7".to_string()));
        assert_eq!(caps.get("postId"), Some(&"99".to_string()));
    }

    #[test]
    fn rejects_duplicate_parameter_names() {
        let result = PathMatcher::compile("/a/{id}/b/{id}");
        assert!(result.is_err());
    }

    #[test]
    fn does_not_match_wrong_segment_count() {
        let matcher = PathMatcher::compile("/pets/{petId}").unwrap();
        assert!(!matcher.is_match("/pets/42/extra"));
    }
}
