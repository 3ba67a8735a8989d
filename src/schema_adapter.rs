//! Component B: wraps `jsonschema` construction/execution. Schemas handed
//! in here have already had every `$ref` they contain resolved against the
//! full document by [`crate::traverser::OpenApiTraverser::deep_resolve`], so
//! building a validator directly from the schema value is sufficient -- no
//! `@@root` indirection is needed at validation time.

use crate::error::{Section, ValidationErrorType};
use jsonschema::{ValidationOptions, Validator};
use serde_json::Value;

pub fn build_validator(
    options: &ValidationOptions,
    schema: &Value,
) -> Result<Validator, ValidationErrorType> {
    options.build(schema).map_err(|e| {
        ValidationErrorType::resource_load_error(e, "failed to construct schema validator")
    })
}

pub fn validate_by_schema(
    options: &ValidationOptions,
    schema: &Value,
    instance: &Value,
    section: Section,
) -> Result<(), ValidationErrorType> {
    let validator = build_validator(options, schema)?;
    do_validate(&validator, instance, section)
}

pub fn do_validate(
    validator: &Validator,
    instance: &Value,
    section: Section,
) -> Result<(), ValidationErrorType> {
    match validator.validate(instance) {
        Ok(()) => Ok(()),
        Err(e) => Err(ValidationErrorType::schema_validation_failed(
            e,
            section,
            "instance failed schema validation",
        )),
    }
}
