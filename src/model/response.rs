use crate::content_type;
use crate::error::{ErrorRecord, PayloadSection, Section, ValidationErrorType, ValidationResult};
use crate::schema_adapter;
use crate::traverser::OpenApiTraverser;
use crate::types::case_insensitive::CaseInsensitiveMap;
use crate::types::primitive::OpenApiPrimitives;
use crate::{HEADERS_FIELD, SCHEMA_FIELD};
use jsonschema::ValidationOptions;
use serde_json::Value;
use std::collections::HashMap;

/// One entry of an operation's `responses` map: either a concrete status
/// code (`"200"`) or the `"default"` fallback.
#[derive(Debug, Clone)]
pub struct Response {
    pub status_code: String,
    pub schema: Option<Value>,
    /// Header name -> resolved header schema object.
    pub headers: HashMap<String, Value>,
}

impl Response {
    pub fn from_definition(
        traverser: &OpenApiTraverser,
        status_code: &str,
        def: &Value,
    ) -> Result<Self, ValidationErrorType> {
        let resolved = traverser.resolve_possible_ref(def)?;
        let def = resolved.value();

        let schema = match traverser.get_optional(def, SCHEMA_FIELD)? {
            Some(s) => Some(traverser.deep_resolve(s.value())?),
            None => None,
        };

        let mut headers = HashMap::new();
        if let Some(header_defs) = traverser.get_optional(def, HEADERS_FIELD)? {
            let header_map = OpenApiTraverser::require_object(header_defs.value())?;
            for (name, header_def) in header_map {
                headers.insert(name.to_lowercase(), traverser.deep_resolve(header_def)?);
            }
        }

        Ok(Self {
            status_code: status_code.to_string(),
            schema,
            headers,
        })
    }

    /// Validates `produces`/`headers`/`body` against this response
    /// definition, accumulating failures into `errors` rather than
    /// short-circuiting.
    pub fn validate(
        &self,
        options: &ValidationOptions,
        produces: &[String],
        content_type: Option<&str>,
        headers: &CaseInsensitiveMap,
        body: Option<&Value>,
        errors: &mut ValidationResult,
    ) {
        let should_validate_body =
            content_type::should_validate_response_body(&self.status_code, self.schema.is_some());

        if should_validate_body {
            if let Err(e) = content_type::negotiate_response(content_type, produces) {
                errors.push(e.to_error_record("response.header.content-type"));
            }
        }

        for (name, header_schema) in &self.headers {
            match headers.get(name) {
                Some(raw) => {
                    let path = format!("response.header.{}", name);
                    match OpenApiPrimitives::convert_string_to_schema_type(header_schema, raw) {
                        Ok(value) => {
                            if let Err(e) = schema_adapter::validate_by_schema(
                                options,
                                header_schema,
                                &value,
                                Section::Payload(PayloadSection::Header),
                            ) {
                                let record = e.to_error_record(path.clone());
                                errors.push(ErrorRecord::response_header_envelope(
                                    name.clone(),
                                    record.message,
                                    path,
                                ));
                            }
                        }
                        Err(e) => {
                            let record = ValidationErrorType::from(e).to_error_record(path.clone());
                            errors.push(ErrorRecord::response_header_envelope(
                                name.clone(),
                                record.message,
                                path,
                            ));
                        }
                    }
                }
                None => {
                    // Swagger 2.0 response headers have no `required` flag;
                    // a missing header is never an error on its own.
                }
            }
        }

        if should_validate_body {
            if let Some(schema) = &self.schema {
                if let Some(body) = body {
                    if let Err(e) = schema_adapter::validate_by_schema(
                        options,
                        schema,
                        body,
                        Section::Payload(PayloadSection::Response),
                    ) {
                        errors.push(e.to_error_record("response.body"));
                    }
                } else {
                    errors.push(ErrorRecord::simple(
                        "INVALID_RESPONSE_BODY",
                        "Response schema declares a body but none was provided",
                        "response.body",
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn options() -> ValidationOptions {
        jsonschema::Validator::options().with_draft(jsonschema::Draft::Draft4)
    }

    #[test]
    fn skips_body_for_204() {
        let traverser = OpenApiTraverser::new(json!({}));
        let def = json!({"description": "no content"});
        let response = Response::from_definition(&traverser, "204", &def).unwrap();
        let mut errors = ValidationResult::new();
        response.validate(
            &options(),
            &[],
            None,
            &CaseInsensitiveMap::new(),
            None,
            &mut errors,
        );
        assert!(errors.is_valid());
    }

    #[test]
    fn validates_body_against_schema() {
        let traverser = OpenApiTraverser::new(json!({}));
        let def = json!({
            "description": "ok",
            "schema": {"type": "object", "required": ["id"], "properties": {"id": {"type": "integer"}}}
        });
        let response = Response::from_definition(&traverser, "200", &def).unwrap();
        let produces = vec!["application/json".to_string()];
        let mut errors = ValidationResult::new();
        response.validate(
            &options(),
            &produces,
            Some("application/json"),
            &CaseInsensitiveMap::new(),
            Some(&json!({"name": "no id"})),
            &mut errors,
        );
        assert!(!errors.is_valid());
    }
}
