use crate::types::primitive::OpenApiPrimitives;
use jsonschema::{ReferencingError, ValidationError as JsonSchemaValidationError};
use serde_json::Value;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone)]
pub enum Section {
    Specification(SpecificationSection),
    Payload(PayloadSection),
}

impl Display for Section {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Section::Specification(spec) => write!(f, "specification --> {}", spec),
            Section::Payload(payload) => write!(f, "payload --> {}", payload),
        }
    }
}

#[derive(Debug, Clone)]
pub enum PayloadSection {
    Body,
    Header,
    Query,
    Path,
    FormData,
    Security,
    Response,
    Other,
}

impl Display for PayloadSection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PayloadSection::Body => write!(f, "body"),
            PayloadSection::Header => write!(f, "header"),
            PayloadSection::Query => write!(f, "query"),
            PayloadSection::Path => write!(f, "path"),
            PayloadSection::FormData => write!(f, "formData"),
            PayloadSection::Security => write!(f, "security"),
            PayloadSection::Response => write!(f, "response"),
            PayloadSection::Other => write!(f, "other"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum SpecificationSection {
    Paths(OperationSection),
    Components(ComponentSection),
    Security,
    Other,
}

impl Display for SpecificationSection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SpecificationSection::Paths(operation) => write!(f, "paths --> {}", operation),
            SpecificationSection::Components(component) => {
                write!(f, "definitions --> {}", component)
            }
            SpecificationSection::Security => write!(f, "security"),
            SpecificationSection::Other => write!(f, "other"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ComponentSection {
    Schemas,
    Parameters,
    Responses,
}

impl Display for ComponentSection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ComponentSection::Schemas => write!(f, "schemas"),
            ComponentSection::Parameters => write!(f, "parameters"),
            ComponentSection::Responses => write!(f, "responses"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum OperationSection {
    Parameters,
    RequestBody,
    Responses,
    Security,
    Other,
}

impl Display for OperationSection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationSection::Parameters => write!(f, "parameters"),
            OperationSection::RequestBody => write!(f, "request body"),
            OperationSection::Responses => write!(f, "responses"),
            OperationSection::Security => write!(f, "security"),
            OperationSection::Other => write!(f, "other"),
        }
    }
}

/// Rich, internal validation error carrying enough context to build a
/// human-readable trace. Not part of the public contract -- see
/// [`ValidationErrorType::to_error_record`] for the flat, stable shape
/// callers actually consume.
#[derive(Debug)]
pub enum ValidationErrorType {
    SchemaValidationFailed(String, Section),
    AssertionFailed(String),
    LoadingResourceFailed(String, String),
    ValueExpected(String, Section),
    SectionExpected(Section),
    FieldExpected(String, Section),

    UnexpectedType {
        expected: OpenApiPrimitives,
        found: Value,
        section: Section,
    },
    UnableToParse(String, Section),
    CircularReference(String, Section),
    InvalidRef(String, Section),
    InvalidContentType(String, Section),
    MissingOperation(String, String),
    InvalidResponseCode(String),
}

impl ValidationErrorType {
    pub(crate) fn schema_validation_failed<T>(
        json_schema_error: JsonSchemaValidationError,
        section: Section,
        message: &T,
    ) -> Self
    where
        T: ToString + ?Sized,
    {
        let _ = message.to_string();
        ValidationErrorType::SchemaValidationFailed(json_schema_error.to_string(), section)
    }

    pub(crate) fn resource_load_error<T>(error: ReferencingError, message: &T) -> Self
    where
        T: ToString + ?Sized,
    {
        ValidationErrorType::LoadingResourceFailed(error.to_string(), message.to_string())
    }

    pub(crate) fn assertion_failed<T>(message: &T) -> Self
    where
        T: ToString + ?Sized,
    {
        ValidationErrorType::AssertionFailed(message.to_string())
    }

    /// Converts this internal error into the flat, public error-record shape.
    ///
    /// `path` is the JSON-Pointer-ish location of the offending value in the
    /// request or response (not in the specification) and is supplied by the
    /// caller, since this type alone does not always know it.
    pub fn to_error_record(&self, path: impl Into<String>) -> ErrorRecord {
        let path = path.into();
        match self {
            ValidationErrorType::InvalidContentType(msg, _) => {
                ErrorRecord::simple("INVALID_CONTENT_TYPE", msg.clone(), path)
            }
            ValidationErrorType::InvalidResponseCode(msg) => {
                ErrorRecord::simple("INVALID_RESPONSE_CODE", msg.clone(), path)
            }
            ValidationErrorType::FieldExpected(field, Section::Payload(PayloadSection::Body))
            | ValidationErrorType::FieldExpected(
                field,
                Section::Payload(PayloadSection::Response),
            ) => ErrorRecord::simple(
                "OBJECT_MISSING_REQUIRED_PROPERTY",
                format!("Missing required property '{}'", field),
                path,
            ),
            ValidationErrorType::FieldExpected(field, section) => {
                let code = match section {
                    Section::Payload(PayloadSection::Header) => "INVALID_RESPONSE_HEADER",
                    _ => "INVALID_REQUEST_PARAMETER",
                };
                ErrorRecord::simple(code, format!("Missing required field '{}'", field), path)
            }
            ValidationErrorType::UnexpectedType {
                expected, found, ..
            } => ErrorRecord::simple(
                "INVALID_TYPE",
                format!(
                    "Expected type {} but found type {}",
                    expected,
                    OpenApiPrimitives::get_type_from_serde(found)
                        .map(|p| p.to_string())
                        .unwrap_or_else(|| "unknown".to_string())
                ),
                path,
            ),
            ValidationErrorType::SchemaValidationFailed(msg, section) => {
                let code = match section {
                    Section::Payload(PayloadSection::Response) => "INVALID_RESPONSE_BODY",
                    Section::Payload(PayloadSection::Header) => "INVALID_RESPONSE_HEADER",
                    _ => "INVALID_REQUEST_PARAMETER",
                };
                ErrorRecord::simple(code, msg.clone(), path)
            }
            ValidationErrorType::AssertionFailed(msg) => {
                ErrorRecord::simple("INVALID_REQUEST_PARAMETER", msg.clone(), path)
            }
            other => ErrorRecord::simple("INVALID_REQUEST_PARAMETER", other.to_string(), path),
        }
    }
}

impl Display for ValidationErrorType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationErrorType::LoadingResourceFailed(resource_error, msg) => {
                write!(
                    f,
                    "Loading resource failed for {} with error: {}",
                    resource_error, msg
                )
            }
            ValidationErrorType::AssertionFailed(msg) => write!(f, "Assertion failed: {}", msg),
            ValidationErrorType::SchemaValidationFailed(validation_error, section) => {
                write!(f, "Schema validation failed in {}: {}", section, validation_error)
            }
            ValidationErrorType::SectionExpected(section) => {
                write!(f, "Section {} expected", section)
            }
            ValidationErrorType::FieldExpected(field, section) => {
                write!(f, "Field '{}' expected in {}", field, section)
            }
            ValidationErrorType::ValueExpected(msg, section) => {
                write!(f, "Value expected {} in {}", msg, section)
            }
            ValidationErrorType::UnableToParse(msg, section) => {
                write!(f, "Unable to parse {} in {}", msg, section)
            }
            ValidationErrorType::UnexpectedType {
                expected,
                found,
                section,
            } => {
                write!(
                    f,
                    "Expected type {} but found {} in {}",
                    expected, found, section
                )
            }
            ValidationErrorType::CircularReference(msg, section) => {
                write!(f, "Circular reference {} in {}", msg, section)
            }
            ValidationErrorType::InvalidRef(msg, section) => {
                write!(f, "Invalid ref {} in {}", msg, section)
            }
            ValidationErrorType::InvalidContentType(msg, section) => {
                write!(f, "Invalid Content-Type in {}: {}", section, msg)
            }
            ValidationErrorType::MissingOperation(path, method) => {
                write!(f, "No operation found for {} {}", method, path)
            }
            ValidationErrorType::InvalidResponseCode(msg) => {
                write!(f, "Invalid response code: {}", msg)
            }
        }
    }
}

impl std::error::Error for ValidationErrorType {}

/// The stable, public shape of a single validation failure.
///
/// `name`/`in_`/`errors` are only populated on envelope records
/// (`INVALID_REQUEST_PARAMETER`, `INVALID_RESPONSE_HEADER`): a bare
/// coercion or schema-validation failure leaves them at their defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorRecord {
    pub code: String,
    pub message: String,
    pub path: String,
    pub name: Option<String>,
    pub in_: Option<String>,
    pub errors: Vec<ErrorRecord>,
}

impl ErrorRecord {
    pub fn simple(code: impl Into<String>, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    /// Wraps `nested` parameter-validation failures into a single
    /// `INVALID_REQUEST_PARAMETER` envelope, per the spec's error-record
    /// shape (`name`, `in`, `errors: [...]`).
    pub fn request_parameter_envelope(
        name: impl Into<String>,
        in_: impl Into<String>,
        path: impl Into<String>,
        nested: Vec<ErrorRecord>,
    ) -> Self {
        let name = name.into();
        Self {
            code: "INVALID_REQUEST_PARAMETER".to_string(),
            message: format!("Validation failed for parameter '{}'", name),
            path: path.into(),
            name: Some(name),
            in_: Some(in_.into()),
            errors: nested,
        }
    }

    /// Wraps a single failing response header into an
    /// `INVALID_RESPONSE_HEADER` envelope, preserving the header `name`.
    pub fn response_header_envelope(
        name: impl Into<String>,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            code: "INVALID_RESPONSE_HEADER".to_string(),
            message: message.into(),
            path: path.into(),
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

impl Display for ErrorRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {} (at {})", self.code, self.message, self.path)
    }
}

/// Accumulated outcome of validating a single request or response.
///
/// Unlike the teacher's short-circuiting `?`-based validators, this collects
/// every failure found so a caller can report all of them at once, in the
/// order they were discovered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    pub errors: Vec<ErrorRecord>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn push(&mut self, record: ErrorRecord) {
        self.errors.push(record);
    }

    pub(crate) fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
    }
}
