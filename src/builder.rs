//! Component I + construction entry point: turns a parsed (or
//! file-loaded) Swagger 2.0 document into an immutable [`crate::model::Api`].

use crate::SWAGGER_FIELD;
use crate::model::Api;
use crate::traverser::OpenApiTraverser;
use jsonschema::{Draft, Validator};
use serde_json::Value;
use std::fmt::{Display, Formatter};
use std::path::Path as FsPath;

#[derive(Debug)]
pub enum ApiBuilderError {
    InvalidOption(String),
    InvalidSpecification(String),
    LoadFailure(String),
}

impl ApiBuilderError {
    pub(crate) fn invalid_option(msg: impl Into<String>) -> Self {
        ApiBuilderError::InvalidOption(msg.into())
    }

    pub(crate) fn invalid_specification(msg: impl Into<String>) -> Self {
        ApiBuilderError::InvalidSpecification(msg.into())
    }

    pub(crate) fn load_failure(msg: impl Into<String>) -> Self {
        ApiBuilderError::LoadFailure(msg.into())
    }
}

impl Display for ApiBuilderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiBuilderError::InvalidOption(msg) => write!(f, "invalid builder option: {}", msg),
            ApiBuilderError::InvalidSpecification(msg) => {
                write!(f, "invalid specification: {}", msg)
            }
            ApiBuilderError::LoadFailure(msg) => write!(f, "failed to load specification: {}", msg),
        }
    }
}

impl std::error::Error for ApiBuilderError {}

enum SpecificationSource {
    None,
    File(String),
    Raw(Value),
}

/// Fluent builder for [`Api`], mirroring the teacher's
/// `OpenApiPayloadValidatorBuilder`.
pub struct ApiBuilder {
    source: SpecificationSource,
}

impl Default for ApiBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiBuilder {
    pub fn new() -> Self {
        Self {
            source: SpecificationSource::None,
        }
    }

    pub fn with_file(mut self, path: impl AsRef<FsPath>) -> Self {
        self.source = SpecificationSource::File(path.as_ref().to_string_lossy().to_string());
        self
    }

    pub fn with_specification(mut self, value: Value) -> Self {
        self.source = SpecificationSource::Raw(value);
        self
    }

    pub fn build(self) -> Result<Api, ApiBuilderError> {
        let document = match self.source {
            SpecificationSource::None => {
                return Err(ApiBuilderError::invalid_option(
                    "no specification source was provided",
                ));
            }
            SpecificationSource::File(path) => Self::load_file(&path)?,
            SpecificationSource::Raw(value) => value,
        };

        let version = document
            .get(SWAGGER_FIELD)
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                ApiBuilderError::invalid_specification("missing 'swagger' field")
            })?;
        if !version.starts_with("2.0") {
            return Err(ApiBuilderError::invalid_specification(format!(
                "unsupported swagger version '{}', expected 2.0.x",
                version
            )));
        }

        let validation_options = Validator::options().with_draft(Draft::Draft4);

        let traverser = OpenApiTraverser::new(document);

        Api::build(&traverser, validation_options)
            .map_err(|e| ApiBuilderError::invalid_specification(e.to_string()))
    }

    fn load_file(path: &str) -> Result<Value, ApiBuilderError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ApiBuilderError::load_failure(format!("{}: {}", path, e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| ApiBuilderError::load_failure(format!("{}: {}", path, e)))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn minimal_spec() -> Value {
        json!({
            "swagger": "2.0",
            "info": {"title": "test", "version": "1.0"},
            "paths": {
                "/pets": {
                    "get": {
                        "operationId": "listPets",
                        "responses": {"200": {"description": "ok"}}
                    }
                }
            }
        })
    }

    #[test]
    fn builds_from_raw_specification() {
        let api = ApiBuilder::new().with_specification(minimal_spec()).build();
        assert!(api.is_ok());
    }

    #[test]
    fn rejects_missing_swagger_field() {
        let mut spec = minimal_spec();
        spec.as_object_mut().unwrap().remove("swagger");
        let result = ApiBuilder::new().with_specification(spec).build();
        assert!(result.is_err());
    }

    #[test]
    fn rejects_wrong_swagger_version() {
        let mut spec = minimal_spec();
        spec["swagger"] = json!("3.0.0");
        let result = ApiBuilder::new().with_specification(spec).build();
        assert!(result.is_err());
    }

    #[test]
    fn rejects_no_source() {
        let result = ApiBuilder::new().build();
        assert!(result.is_err());
    }
}
