//! Core model and validation pipeline for OpenAPI/Swagger 2.0 request and
//! response verification.
//!
//! A [`crate::model::Api`] is built once from a parsed Swagger document via
//! [`crate::builder::ApiBuilder`]. The resulting graph of
//! [`crate::model::Path`]/[`crate::model::Operation`]/[`crate::model::Parameter`]/
//! [`crate::model::Response`] objects is immutable and carries no request
//! state; validating a request or response never mutates the `Api`.

pub mod builder;
pub mod content_type;
pub mod converter;
pub mod dispatcher;
pub mod error;
pub mod model;
pub mod path_matcher;
pub mod schema_adapter;
pub mod traverser;
pub mod types;
pub mod validator;

pub(crate) const SWAGGER_FIELD: &str = "swagger";
pub(crate) const PATHS_FIELD: &str = "paths";
pub(crate) const REF_FIELD: &str = "$ref";
pub(crate) const NAME_FIELD: &str = "name";
pub(crate) const SCHEMA_FIELD: &str = "schema";
pub(crate) const REQUIRED_FIELD: &str = "required";
pub(crate) const PARAMETERS_FIELD: &str = "parameters";
pub(crate) const IN_FIELD: &str = "in";
pub(crate) const TYPE_FIELD: &str = "type";
pub(crate) const ITEMS_FIELD: &str = "items";
pub(crate) const DEFAULT_FIELD: &str = "default";
pub(crate) const COLLECTION_FORMAT_FIELD: &str = "collectionFormat";
pub(crate) const SECURITY_FIELD: &str = "security";
pub(crate) const SECURITY_DEFINITIONS_FIELD: &str = "securityDefinitions";
pub(crate) const CONSUMES_FIELD: &str = "consumes";
pub(crate) const PRODUCES_FIELD: &str = "produces";
pub(crate) const RESPONSES_FIELD: &str = "responses";
pub(crate) const HEADERS_FIELD: &str = "headers";
pub(crate) const BASE_PATH_FIELD: &str = "basePath";
pub(crate) const OPERATION_ID_FIELD: &str = "operationId";

pub(crate) const CONTENT_TYPE_HEADER: &str = "content-type";
pub(crate) const PATH_SEPARATOR: char = '/';
pub(crate) const TILDE: char = '~';
pub(crate) const ENCODED_TILDE: &str = "~0";
pub(crate) const ENCODED_BACKSLASH: &str = "~1";

pub use builder::{ApiBuilder, ApiBuilderError};
pub use error::{ErrorRecord, ValidationResult};
pub use model::Api;
