//! Component J: routes an incoming (path, method) pair to the
//! [`crate::model::Operation`] that should validate it.

use crate::model::Api;
use crate::model::operation::Operation;

/// Strips `base_path` from `request_path` if present, then finds the first
/// [`crate::model::Path`] whose compiled matcher accepts the remainder.
/// Swagger 2.0 does not define a precedence rule between overlapping
/// templates (e.g. `/pets/{id}` vs `/pets/mine`), so the first match in
/// document order wins, mirroring the teacher's linear scan.
pub fn dispatch<'api>(api: &'api Api, request_path: &str, method: &str) -> Option<&'api Operation> {
    let normalized = strip_base_path(request_path, &api.base_path);
    let method = method.to_lowercase();

    for path in &api.paths {
        if path.matcher().is_match(normalized) {
            if let Some(operation) = path.operation(&method) {
                return Some(operation);
            }
        }
    }
    None
}

fn strip_base_path<'a>(request_path: &'a str, base_path: &str) -> &'a str {
    if base_path.is_empty() || base_path == "/" {
        return request_path;
    }
    request_path.strip_prefix(base_path).unwrap_or(request_path)
}

#[cfg(test)]
mod test {
    use super::strip_base_path;

    #[test]
    fn strips_base_path_prefix() {
        assert_eq!(strip_base_path("/v1/pets/1", "/v1"), "/pets/1");
    }

    #[test]
    fn leaves_path_untouched_when_base_path_absent() {
        assert_eq!(strip_base_path("/pets/1", ""), "/pets/1");
    }

    #[test]
    fn leaves_path_untouched_when_prefix_does_not_match() {
        assert_eq!(strip_base_path("/pets/1", "/v2"), "/pets/1");
    }
}
