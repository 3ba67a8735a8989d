use crate::content_type;
use crate::error::{ErrorRecord, ValidationErrorType, ValidationResult};
use crate::model::parameter::{ParamContext, Parameter};
use crate::model::request::RawRequest;
use crate::model::response::Response;
use crate::path_matcher::PathMatcher;
use crate::traverser::OpenApiTraverser;
use crate::types::ParameterLocation;
use crate::types::case_insensitive::CaseInsensitiveMap;
use crate::validator::scope;
use crate::{
    CONSUMES_FIELD, OPERATION_ID_FIELD, PARAMETERS_FIELD, PRODUCES_FIELD, RESPONSES_FIELD,
    SECURITY_FIELD,
};
use jsonschema::ValidationOptions;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A single (path, method) operation, with its parameters, responses and
/// effective `consumes`/`produces`/`security` already resolved against the
/// document's global defaults -- resolving those once here means request
/// validation never needs to walk back up to the owning [`crate::model::Api`].
#[derive(Debug, Clone)]
pub struct Operation {
    pub path_template: String,
    pub method: String,
    pub operation_id: String,
    pub consumes: Vec<String>,
    pub produces: Vec<String>,
    pub security: Vec<Value>,
    pub parameters: Vec<Parameter>,
    pub responses: HashMap<String, Response>,
    matcher: Arc<PathMatcher>,
}

impl Operation {
    pub fn from_definition(
        traverser: &OpenApiTraverser,
        path_template: &str,
        method: &str,
        def: &Value,
        matcher: Arc<PathMatcher>,
        global_consumes: &[String],
        global_produces: &[String],
        global_security: &[Value],
    ) -> Result<Self, ValidationErrorType> {
        let operation_id = def
            .get(OPERATION_ID_FIELD)
            .and_then(|v| v.as_str())
            .unwrap_or("default_operation_id")
            .to_string();

        let consumes = string_array_field(def, CONSUMES_FIELD)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| global_consumes.to_vec());
        let produces = string_array_field(def, PRODUCES_FIELD)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| global_produces.to_vec());

        let security = match traverser.get_optional(def, SECURITY_FIELD)? {
            Some(found) => OpenApiTraverser::require_array(found.value())?.clone(),
            None => global_security.to_vec(),
        };

        let mut parameters = Vec::new();
        if let Some(param_defs) = traverser.get_optional(def, PARAMETERS_FIELD)? {
            let param_defs = OpenApiTraverser::require_array(param_defs.value())?;
            for param_def in param_defs {
                parameters.push(Parameter::from_definition(traverser, param_def)?);
            }
        }

        let mut responses = HashMap::new();
        let response_defs = traverser.get_required(def, RESPONSES_FIELD)?;
        let response_defs = OpenApiTraverser::require_object(response_defs.value())?;
        for (status_code, response_def) in response_defs {
            responses.insert(
                status_code.clone(),
                Response::from_definition(traverser, status_code, response_def)?,
            );
        }

        Ok(Self {
            path_template: path_template.to_string(),
            method: method.to_lowercase(),
            operation_id,
            consumes,
            produces,
            security,
            parameters,
            responses,
            matcher,
        })
    }

    fn has_payload_parameter(&self) -> bool {
        self.parameters
            .iter()
            .any(|p| matches!(p.location, ParameterLocation::Body | ParameterLocation::FormData))
    }

    /// Validates `request` against this operation's parameters and, when
    /// `scopes` is provided, its effective security requirements.
    ///
    /// Unlike the teacher's `validate_request`, which returns on the first
    /// `?` failure, every parameter is checked and every failure is
    /// collected, in declaration order, with a Content-Type mismatch
    /// reported first.
    pub fn validate_request(
        &self,
        options: &ValidationOptions,
        request: &RawRequest,
        scopes: Option<&[String]>,
    ) -> ValidationResult {
        let mut errors = ValidationResult::new();

        let path_captures = self.matcher.captures(&request.path).unwrap_or_default();
        let content_type = request
            .headers
            .get(crate::CONTENT_TYPE_HEADER)
            .and_then(content_type::strip_parameters);

        if self.has_payload_parameter() {
            if let Err(e) = content_type::negotiate_request(content_type, &self.consumes) {
                errors.push(e.to_error_record("request.header.content-type"));
            }
        }

        let form = extract_form_fields(content_type, request.body.as_ref());

        let ctx = ParamContext {
            path_captures: &path_captures,
            headers: &request.headers,
            query: &request.query,
            form: &form,
            body: request.body.as_ref(),
        };

        for parameter in &self.parameters {
            let nested = parameter.validate(options, &ctx);
            if !nested.is_empty() {
                errors.push(ErrorRecord::request_parameter_envelope(
                    parameter.name.clone(),
                    parameter.location.as_str(),
                    parameter.path_label(),
                    nested,
                ));
            }
        }

        if let Some(scopes) = scopes {
            if let Err(e) = scope::validate_scopes(&self.security, scopes, &self.operation_id) {
                errors.push(e.to_error_record("request.security"));
            }
        }

        errors
    }

    /// Validates a response for this operation. `status_code` is looked up
    /// exactly first, then falls back to `"default"`; if neither is
    /// declared, this is `INVALID_RESPONSE_CODE`.
    pub fn validate_response(
        &self,
        options: &ValidationOptions,
        status_code: Option<&str>,
        headers: &CaseInsensitiveMap,
        body: Option<&Value>,
    ) -> ValidationResult {
        let mut errors = ValidationResult::new();

        let response = status_code
            .and_then(|code| self.responses.get(code))
            .or_else(|| self.responses.get("default"));

        let response = match response {
            Some(response) => response,
            None => {
                let message = match status_code {
                    Some(code) => format!(
                        "This operation does not have a defined '{}' or 'default' response code",
                        code
                    ),
                    None => {
                        "This operation does not have a defined 'default' response code"
                            .to_string()
                    }
                };
                errors.push(ErrorRecord::simple(
                    "INVALID_RESPONSE_CODE",
                    message,
                    "response.status",
                ));
                return errors;
            }
        };

        let content_type = headers
            .get(crate::CONTENT_TYPE_HEADER)
            .and_then(content_type::strip_parameters);

        response.validate(
            options,
            &self.produces,
            content_type,
            headers,
            body,
            &mut errors,
        );
        errors
    }
}

fn string_array_field(def: &Value, field: &str) -> Option<Vec<String>> {
    def.get(field)?.as_array().map(|arr| {
        arr.iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect()
    })
}

/// Builds a name -> value map for `formData` parameters when the body was
/// submitted as `application/x-www-form-urlencoded` and was already parsed
/// into a flat JSON object of scalar values.
fn extract_form_fields(content_type: Option<&str>, body: Option<&Value>) -> HashMap<String, String> {
    if content_type != Some("application/x-www-form-urlencoded") {
        return HashMap::new();
    }
    match body.and_then(|b| b.as_object()) {
        Some(obj) => obj
            .iter()
            .filter_map(|(k, v)| {
                let value = match v {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    _ => return None,
                };
                Some((k.clone(), value))
            })
            .collect(),
        None => HashMap::new(),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn options() -> ValidationOptions {
        jsonschema::Validator::options().with_draft(jsonschema::Draft::Draft4)
    }

    fn build_op(def: Value) -> Operation {
        let traverser = OpenApiTraverser::new(json!({}));
        let matcher = Arc::new(PathMatcher::compile("/pets/{id}").unwrap());
        Operation::from_definition(&traverser, "/pets/{id}", "get", &def, matcher, &[], &[], &[])
            .unwrap()
    }

    #[test]
    fn unknown_status_code_without_default_is_invalid_response_code() {
        let def = json!({
            "operationId": "getPet",
            "responses": { "200": { "description": "ok" } }
        });
        let op = build_op(def);
        let result =
            op.validate_response(&options(), Some("404"), &CaseInsensitiveMap::new(), None);
        assert!(!result.is_valid());
        assert_eq!(result.errors[0].code, "INVALID_RESPONSE_CODE");
        assert_eq!(
            result.errors[0].message,
            "This operation does not have a defined '404' or 'default' response code"
        );
    }

    #[test]
    fn absent_status_code_without_default_reports_default_only_message() {
        let def = json!({
            "operationId": "getPet",
            "responses": { "200": { "description": "ok" } }
        });
        let op = build_op(def);
        let result = op.validate_response(&options(), None, &CaseInsensitiveMap::new(), None);
        assert!(!result.is_valid());
        assert_eq!(
            result.errors[0].message,
            "This operation does not have a defined 'default' response code"
        );
    }

    #[test]
    fn falls_back_to_default_response() {
        let def = json!({
            "operationId": "getPet",
            "responses": { "default": { "description": "error" } }
        });
        let op = build_op(def);
        let result =
            op.validate_response(&options(), Some("500"), &CaseInsensitiveMap::new(), None);
        assert!(result.is_valid());
    }

    #[test]
    fn missing_required_path_parameter_value_is_reported() {
        let def = json!({
            "operationId": "getPet",
            "parameters": [
                {"name": "id", "in": "path", "required": true, "type": "string"}
            ],
            "responses": { "200": { "description": "ok" } }
        });
        let op = build_op(def);
        let request = RawRequest {
            method: "get".to_string(),
            path: "/pets/42".to_string(),
            headers: CaseInsensitiveMap::new(),
            query: HashMap::new(),
            body: None,
        };
        let result = op.validate_request(&options(), &request, None);
        assert!(result.is_valid());
    }

    #[test]
    fn missing_path_parameter_produces_single_envelope() {
        let def = json!({
            "operationId": "getPet",
            "parameters": [
                {"name": "id", "in": "path", "required": true, "type": "string"}
            ],
            "responses": { "200": { "description": "ok" } }
        });
        let traverser = OpenApiTraverser::new(json!({}));
        let matcher = Arc::new(PathMatcher::compile("/pets/{id}/extra").unwrap());
        let op =
            Operation::from_definition(&traverser, "/pets/{id}/extra", "get", &def, matcher, &[], &[], &[])
                .unwrap();
        let request = RawRequest {
            method: "get".to_string(),
            path: "/pets//extra".to_string(),
            headers: CaseInsensitiveMap::new(),
            query: HashMap::new(),
            body: None,
        };
        let result = op.validate_request(&options(), &request, None);
        assert_eq!(result.errors.len(), 1);
        let envelope = &result.errors[0];
        assert_eq!(envelope.code, "INVALID_REQUEST_PARAMETER");
        assert_eq!(envelope.name.as_deref(), Some("id"));
        assert_eq!(envelope.in_.as_deref(), Some("path"));
        assert_eq!(envelope.errors.len(), 1);
    }

    #[test]
    fn missing_required_body_fields_produce_one_envelope_with_nested_errors() {
        let def = json!({
            "operationId": "addPet",
            "parameters": [
                {
                    "name": "body",
                    "in": "body",
                    "required": true,
                    "schema": {
                        "type": "object",
                        "required": ["name", "photoUrls"],
                        "properties": {
                            "name": {"type": "string"},
                            "photoUrls": {"type": "array", "items": {"type": "string"}}
                        }
                    }
                }
            ],
            "responses": { "200": { "description": "ok" } }
        });
        let op = build_op(def);
        let request = RawRequest {
            method: "post".to_string(),
            path: "/pets/42".to_string(),
            headers: CaseInsensitiveMap::new(),
            query: HashMap::new(),
            body: Some(json!({})),
        };
        let result = op.validate_request(&options(), &request, None);
        assert_eq!(result.errors.len(), 1);
        let envelope = &result.errors[0];
        assert_eq!(envelope.code, "INVALID_REQUEST_PARAMETER");
        assert_eq!(envelope.name.as_deref(), Some("body"));
        assert_eq!(envelope.in_.as_deref(), Some("body"));
        assert_eq!(envelope.errors.len(), 2);
        assert!(envelope
            .errors
            .iter()
            .all(|e| e.code == "OBJECT_MISSING_REQUIRED_PROPERTY"));
    }

    #[test]
    fn empty_operation_level_consumes_falls_back_to_global() {
        let def = json!({
            "operationId": "addPet",
            "consumes": [],
            "responses": { "200": { "description": "ok" } }
        });
        let traverser = OpenApiTraverser::new(json!({}));
        let matcher = Arc::new(PathMatcher::compile("/pets/{id}").unwrap());
        let global_consumes = vec!["application/json".to_string()];
        let op = Operation::from_definition(
            &traverser,
            "/pets/{id}",
            "post",
            &def,
            matcher,
            &global_consumes,
            &[],
            &[],
        )
        .unwrap();
        assert_eq!(op.consumes, global_consumes);
    }

    #[test]
    fn security_scopes_are_enforced_when_provided() {
        let def = json!({
            "operationId": "getPet",
            "security": [{"oauth2": ["read"]}],
            "responses": { "200": { "description": "ok" } }
        });
        let op = build_op(def);
        let request = RawRequest {
            method: "get".to_string(),
            path: "/pets/42".to_string(),
            headers: CaseInsensitiveMap::new(),
            query: HashMap::new(),
            body: None,
        };
        let result = op.validate_request(&options(), &request, Some(&["write".to_string()]));
        assert!(!result.is_valid());
    }
}
