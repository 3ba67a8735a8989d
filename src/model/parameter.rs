use crate::error::{ErrorRecord, PayloadSection, Section, ValidationErrorType};
use crate::schema_adapter;
use crate::traverser::OpenApiTraverser;
use crate::types::ParameterLocation;
use crate::types::case_insensitive::CaseInsensitiveMap;
use crate::types::primitive::{CollectionFormat, OpenApiPrimitives};
use crate::{COLLECTION_FORMAT_FIELD, ITEMS_FIELD, NAME_FIELD, REQUIRED_FIELD, SCHEMA_FIELD, TYPE_FIELD};
use jsonschema::ValidationOptions;
use serde_json::Value;
use std::collections::HashMap;

/// The pieces of an in-flight request a [`Parameter`] needs to locate its
/// own value. Built once per request by [`crate::model::Operation::validate_request`].
pub struct ParamContext<'a> {
    pub path_captures: &'a HashMap<String, String>,
    pub headers: &'a CaseInsensitiveMap,
    pub query: &'a HashMap<String, String>,
    pub form: &'a HashMap<String, String>,
    pub body: Option<&'a Value>,
}

/// A single declared parameter (or, for `in: body`, the request body itself
/// modeled as a parameter, matching how Swagger 2.0 represents it).
#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    /// The effective JSON schema used to validate a coerced value: for
    /// `body` parameters this is the nested `schema` object; for every
    /// other location Swagger 2.0 puts `type`/`format`/`items`/etc. directly
    /// on the parameter object, so that object itself is the schema.
    pub schema: Value,
    pub collection_format: Option<CollectionFormat>,
}

impl Parameter {
    pub fn from_definition(
        traverser: &OpenApiTraverser,
        def: &Value,
    ) -> Result<Self, ValidationErrorType> {
        let resolved = traverser.resolve_possible_ref(def)?;
        let def = resolved.value();

        let name = OpenApiTraverser::get_as_str(def, NAME_FIELD)?.to_string();
        let location_str = OpenApiTraverser::get_as_str(def, "in")?;
        let location = ParameterLocation::from_str(location_str).ok_or_else(|| {
            ValidationErrorType::assertion_failed(&format!(
                "unknown parameter location '{}' for parameter '{}'",
                location_str, name
            ))
        })?;

        let required = def
            .get(REQUIRED_FIELD)
            .and_then(|v| v.as_bool())
            .unwrap_or(location == ParameterLocation::Path);

        let schema = if location == ParameterLocation::Body {
            let schema = traverser.get_required(def, SCHEMA_FIELD)?.value().clone();
            traverser.deep_resolve(&schema)?
        } else {
            def.clone()
        };

        let collection_format = def
            .get(COLLECTION_FORMAT_FIELD)
            .and_then(|v| v.as_str())
            .map(CollectionFormat::from_str);

        Ok(Self {
            name,
            location,
            required,
            schema,
            collection_format,
        })
    }

    pub fn definition(&self) -> &Value {
        &self.schema
    }

    fn section(&self) -> Section {
        Section::Payload(match self.location {
            ParameterLocation::Body => PayloadSection::Body,
            ParameterLocation::Header => PayloadSection::Header,
            ParameterLocation::Query => PayloadSection::Query,
            ParameterLocation::Path => PayloadSection::Path,
            ParameterLocation::FormData => PayloadSection::FormData,
        })
    }

    pub(crate) fn path_label(&self) -> String {
        format!("{}.{}", self.location, self.name)
    }

    /// Validates this parameter's value pulled from `ctx`, returning every
    /// nested failure found (coercion or schema validation). An empty
    /// result means the parameter is valid. The caller (`Operation`) wraps
    /// a non-empty result into a single `INVALID_REQUEST_PARAMETER`
    /// envelope carrying this parameter's `name`/`in`.
    pub fn validate(&self, options: &ValidationOptions, ctx: &ParamContext) -> Vec<ErrorRecord> {
        match self.location {
            ParameterLocation::Path => {
                let raw = ctx.path_captures.get(&self.name).map(|s| s.as_str());
                self.validate_simple(options, raw)
            }
            ParameterLocation::Header => {
                let raw = ctx.headers.get(&self.name);
                self.validate_simple(options, raw)
            }
            ParameterLocation::Query => {
                let raw = ctx.query.get(&self.name).map(|s| s.as_str());
                self.validate_simple(options, raw)
            }
            ParameterLocation::FormData => {
                let raw = ctx.form.get(&self.name).map(|s| s.as_str());
                self.validate_simple(options, raw)
            }
            ParameterLocation::Body => self.validate_body(options, ctx.body),
        }
    }

    fn validate_simple(&self, options: &ValidationOptions, raw: Option<&str>) -> Vec<ErrorRecord> {
        let raw = match raw {
            Some(raw) => raw,
            None => {
                if self.required {
                    return vec![
                        ValidationErrorType::FieldExpected(self.name.clone(), self.section())
                            .to_error_record(self.path_label()),
                    ];
                }
                return Vec::new();
            }
        };

        let is_array = self.schema.get(TYPE_FIELD).and_then(|v| v.as_str()) == Some("array");
        let coerced = if is_array {
            self.coerce_array(raw)
        } else {
            OpenApiPrimitives::convert_string_to_schema_type(&self.schema, raw)
                .map_err(ValidationErrorType::from)
        };

        match coerced {
            Ok(value) => {
                match schema_adapter::validate_by_schema(options, &self.schema, &value, self.section())
                {
                    Ok(()) => Vec::new(),
                    Err(e) => vec![e.to_error_record(self.path_label())],
                }
            }
            Err(e) => vec![e.to_error_record(self.path_label())],
        }
    }

    fn coerce_array(&self, raw: &str) -> Result<Value, ValidationErrorType> {
        let items_schema = self.schema.get(ITEMS_FIELD).ok_or_else(|| {
            ValidationErrorType::assertion_failed(&format!(
                "array parameter '{}' is missing an 'items' schema",
                self.name
            ))
        })?;
        let format = self.collection_format.unwrap_or(CollectionFormat::Csv);
        let mut values = Vec::new();
        for part in format.split(raw) {
            let value = OpenApiPrimitives::convert_string_to_schema_type(items_schema, part)?;
            values.push(value);
        }
        Ok(Value::Array(values))
    }

    fn validate_body(&self, options: &ValidationOptions, body: Option<&Value>) -> Vec<ErrorRecord> {
        let body = match body {
            Some(body) => body,
            None => {
                if self.required {
                    return vec![ErrorRecord::simple(
                        "OBJECT_MISSING_REQUIRED_PROPERTY",
                        "Request body is required but was not provided",
                        self.path_label(),
                    )];
                }
                return Vec::new();
            }
        };

        let mut errors = Vec::new();
        if let Some(required_fields) = self.schema.get(REQUIRED_FIELD).and_then(|v| v.as_array()) {
            for field in required_fields {
                if let Some(field_name) = field.as_str() {
                    if body.get(field_name).is_none() {
                        errors.push(
                            ValidationErrorType::FieldExpected(
                                field_name.to_string(),
                                self.section(),
                            )
                            .to_error_record(format!("body.{}", field_name)),
                        );
                    }
                }
            }
        }

        if errors.is_empty() {
            if let Err(e) =
                schema_adapter::validate_by_schema(options, &self.schema, body, self.section())
            {
                errors.push(e.to_error_record("body"));
            }
        }

        errors
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
    fn missing_required_query_param_is_reported() {
        let traverser = OpenApiTraverser::new(json!({}));
        let def = json!({"name": "limit", "in": "query", "required": true, "type": "integer"});
        let param = Parameter::from_definition(&traverser, &def).unwrap();
        let ctx = ParamContext {
            path_captures: &HashMap::new(),
            headers: &CaseInsensitiveMap::new(),
            query: &HashMap::new(),
            form: &HashMap::new(),
            body: None,
        };
        let errors = param.validate(&options(), &ctx);
        assert!(!errors.is_empty());
    }

    #[test]
    fn valid_integer_query_param_passes() {
        let traverser = OpenApiTraverser::new(json!({}));
        let def = json!({"name": "limit", "in": "query", "required": true, "type": "integer"});
        let param = Parameter::from_definition(&traverser, &def).unwrap();
        let mut query = HashMap::new();
        query.insert("limit".to_string(), "10".to_string());
        let ctx = ParamContext {
            path_captures: &HashMap::new(),
            headers: &CaseInsensitiveMap::new(),
            query: &query,
            form: &HashMap::new(),
            body: None,
        };
        let errors = param.validate(&options(), &ctx);
        assert!(errors.is_empty());
    }

    #[test]
    fn non_numeric_query_param_fails() {
        let traverser = OpenApiTraverser::new(json!({}));
        let def = json!({"name": "limit", "in": "query", "required": true, "type": "integer"});
        let param = Parameter::from_definition(&traverser, &def).unwrap();
        let mut query = HashMap::new();
        query.insert("limit".to_string(), "abc".to_string());
        let ctx = ParamContext {
            path_captures: &HashMap::new(),
            headers: &CaseInsensitiveMap::new(),
            query: &query,
            form: &HashMap::new(),
            body: None,
        };
        let errors = param.validate(&options(), &ctx);
        assert!(!errors.is_empty());
    }

    #[test]
    fn csv_array_query_param_splits_and_validates() {
        let traverser = OpenApiTraverser::new(json!({}));
        let def = json!({
            "name": "tags",
            "in": "query",
            "required": false,
            "type": "array",
            "items": {"type": "string"},
            "collectionFormat": "csv"
        });
        let param = Parameter::from_definition(&traverser, &def).unwrap();
        let mut query = HashMap::new();
        query.insert("tags".to_string(), "a,b,c".to_string());
        let ctx = ParamContext {
            path_captures: &HashMap::new(),
            headers: &CaseInsensitiveMap::new(),
            query: &query,
            form: &HashMap::new(),
            body: None,
        };
        let errors = param.validate(&options(), &ctx);
        assert!(errors.is_empty());
    }

    #[test]
    fn missing_required_body_field_reports_object_missing_required_property() {
        let traverser = OpenApiTraverser::new(json!({}));
        let def = json!({
            "name": "body",
            "in": "body",
            "required": true,
            "schema": {
                "type": "object",
                "required": ["name"],
                "properties": {"name": {"type": "string"}}
            }
        });
        let param = Parameter::from_definition(&traverser, &def).unwrap();
        let ctx = ParamContext {
            path_captures: &HashMap::new(),
            headers: &CaseInsensitiveMap::new(),
            query: &HashMap::new(),
            form: &HashMap::new(),
            body: Some(&json!({"age": 5})),
        };
        let errors = param.validate(&options(), &ctx);
        assert!(!errors.is_empty());
        assert_eq!(errors[0].code, "OBJECT_MISSING_REQUIRED_PROPERTY");
    }
}
