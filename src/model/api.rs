use crate::dispatcher;
use crate::error::ValidationErrorType;
use crate::model::operation::Operation;
use crate::model::path::Path;
use crate::traverser::OpenApiTraverser;
use crate::{BASE_PATH_FIELD, CONSUMES_FIELD, PATHS_FIELD, PRODUCES_FIELD, SECURITY_FIELD, SECURITY_DEFINITIONS_FIELD};
use jsonschema::ValidationOptions;
use serde_json::Value;

/// The fully-constructed, immutable model of a Swagger 2.0 document:
/// every [`Path`]/[`Operation`]/parameter/response has already been walked
/// and resolved once, so validating a request or response never re-reads
/// the document.
pub struct Api {
    pub base_path: String,
    pub consumes: Vec<String>,
    pub produces: Vec<String>,
    pub security: Vec<Value>,
    pub security_definitions: Value,
    pub(crate) paths: Vec<Path>,
    pub(crate) validation_options: ValidationOptions,
}

impl Api {
    pub(crate) fn build(
        traverser: &OpenApiTraverser,
        validation_options: ValidationOptions,
    ) -> Result<Self, ValidationErrorType> {
        let spec = traverser.specification();

        let base_path = spec
            .get(BASE_PATH_FIELD)
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();

        let consumes = string_array_field(spec, CONSUMES_FIELD);
        let produces = string_array_field(spec, PRODUCES_FIELD);

        let security = match traverser.get_optional(spec, SECURITY_FIELD)? {
            Some(found) => OpenApiTraverser::require_array(found.value())?.clone(),
            None => Vec::new(),
        };

        let security_definitions = traverser
            .get_optional(spec, SECURITY_DEFINITIONS_FIELD)?
            .map(|found| found.value().clone())
            .unwrap_or(Value::Object(Default::default()));

        let path_defs = traverser.get_required(spec, PATHS_FIELD)?;
        let path_defs = OpenApiTraverser::require_object(path_defs.value())?;

        let mut paths = Vec::with_capacity(path_defs.len());
        for (template, def) in path_defs {
            paths.push(Path::from_definition(
                traverser,
                template,
                def,
                &consumes,
                &produces,
                &security,
            )?);
        }

        Ok(Self {
            base_path,
            consumes,
            produces,
            security,
            security_definitions,
            paths,
            validation_options,
        })
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn validation_options(&self) -> &ValidationOptions {
        &self.validation_options
    }

    /// Component J: finds the operation whose path template matches
    /// `request_path` (after stripping this document's `basePath`, if
    /// present) and whose method matches `method`.
    pub fn get_operation(&self, request_path: &str, method: &str) -> Option<&Operation> {
        dispatcher::dispatch(self, request_path, method)
    }
}

fn string_array_field(def: &Value, field: &str) -> Vec<String> {
    def.get(field)
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
