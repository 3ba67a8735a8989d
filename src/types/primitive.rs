use crate::error::ValidationErrorType;
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde_json::{Value, json};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(PartialEq, Debug)]
pub enum OpenApiPrimitives {
    Null,
    Bool,
    Integer,
    Array,
    Number,
    String,
    Object,
}

impl Display for OpenApiPrimitives {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OpenApiPrimitives::Null => write!(f, "null"),
            OpenApiPrimitives::Bool => write!(f, "boolean"),
            OpenApiPrimitives::Integer => write!(f, "integer"),
            OpenApiPrimitives::Array => write!(f, "array"),
            OpenApiPrimitives::Number => write!(f, "number"),
            OpenApiPrimitives::String => write!(f, "string"),
            OpenApiPrimitives::Object => write!(f, "object"),
        }
    }
}

impl FromStr for OpenApiPrimitives {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "null" => Ok(OpenApiPrimitives::Null),
            "bool" | "boolean" => Ok(OpenApiPrimitives::Bool),
            "integer" => Ok(OpenApiPrimitives::Integer),
            "number" => Ok(OpenApiPrimitives::Number),
            "string" => Ok(OpenApiPrimitives::String),
            "array" => Ok(OpenApiPrimitives::Array),
            "object" => Ok(OpenApiPrimitives::Object),
            other => Err(PrimitiveError::invalid_primitive_type(format!(
                "unrecognized schema type '{}'",
                other
            ))),
        }
    }
}

/// Array splitting conventions for Swagger 2.0 `collectionFormat`.
#[derive(PartialEq, Debug, Clone, Copy)]
pub enum CollectionFormat {
    Csv,
    Ssv,
    Tsv,
    Pipes,
    Multi,
}

impl CollectionFormat {
    pub fn from_str(s: &str) -> Self {
        match s {
            "ssv" => CollectionFormat::Ssv,
            "tsv" => CollectionFormat::Tsv,
            "pipes" => CollectionFormat::Pipes,
            "multi" => CollectionFormat::Multi,
            _ => CollectionFormat::Csv,
        }
    }

    /// Splits a single raw value according to this format. `multi` is handled
    /// by the caller (each occurrence of the parameter is a separate value),
    /// so it is a no-op split here.
    pub fn split<'a>(&self, raw: &'a str) -> Vec<&'a str> {
        match self {
            CollectionFormat::Csv => raw.split(',').collect(),
            CollectionFormat::Ssv => raw.split(' ').collect(),
            CollectionFormat::Tsv => raw.split('\t').collect(),
            CollectionFormat::Pipes => raw.split('|').collect(),
            CollectionFormat::Multi => vec![raw],
        }
    }
}

impl OpenApiPrimitives {
    pub fn get_type_from_serde(schema: &Value) -> Option<OpenApiPrimitives> {
        if schema.is_string() {
            return Some(OpenApiPrimitives::String);
        } else if schema.is_array() {
            return Some(OpenApiPrimitives::Array);
        } else if schema.is_object() {
            return Some(OpenApiPrimitives::Object);
        } else if schema.is_null() {
            return Some(OpenApiPrimitives::Null);
        } else if schema.is_boolean() {
            return Some(OpenApiPrimitives::Bool);
        } else if schema.is_number() {
            return Some(OpenApiPrimitives::Number);
        }
        None
    }

    /// Coerces a raw string (e.g. from a query string, header, or path
    /// segment) into a JSON value matching the `type`/`format` pair declared
    /// by `schema`.
    pub fn convert_string_to_schema_type(
        schema: &Value,
        input: &str,
    ) -> Result<Value, PrimitiveError> {
        let type_field = match schema.get("type").and_then(|type_value| type_value.as_str()) {
            None => {
                return Err(PrimitiveError::invalid_schema_error(
                    "Could not find 'type' field in schema.",
                ));
            }
            Some(v) => v,
        };
        let openapi_type = OpenApiPrimitives::from_str(type_field).map_err(|_| {
            PrimitiveError::invalid_schema_error(format!(
                "Invalid type field in schema: '{}'",
                type_field
            ))
        })?;
        let format = schema.get("format").and_then(|v| v.as_str());
        openapi_type.convert_value_to_type(input, format)
    }

    pub fn convert_value_to_type(
        &self,
        input: &str,
        format: Option<&str>,
    ) -> Result<Value, PrimitiveError> {
        match (self, format) {
            (OpenApiPrimitives::Null, _) => Ok(json!(Value::Null)),
            (OpenApiPrimitives::Bool, _) => Self::convert_to_type::<bool>(input),
            (OpenApiPrimitives::Integer, _) => Self::convert_to_type::<i64>(input),
            (OpenApiPrimitives::Number, _) => Self::convert_to_type::<f64>(input),
            (OpenApiPrimitives::String, Some("date")) => Self::convert_date(input),
            (OpenApiPrimitives::String, Some("date-time")) => Self::convert_date_time(input),
            (OpenApiPrimitives::String, _) => Self::convert_to_type::<String>(input),
            _ => Err(PrimitiveError::invalid_primitive_type(format!(
                "unsupported type for string coercion: '{}'",
                self
            ))),
        }
    }

    fn convert_date(input: &str) -> Result<Value, PrimitiveError> {
        match NaiveDate::parse_from_str(input, "%Y-%m-%d") {
            Ok(_) => Ok(json!(input)),
            Err(_) => Err(PrimitiveError::conversion_error(format!(
                "Could not parse '{}' as a full-date (RFC 3339)",
                input
            ))),
        }
    }

    fn convert_date_time(input: &str) -> Result<Value, PrimitiveError> {
        match DateTime::<FixedOffset>::parse_from_rfc3339(input) {
            Ok(_) => Ok(json!(input)),
            Err(_) => Err(PrimitiveError::conversion_error(format!(
                "Could not parse '{}' as a date-time (RFC 3339)",
                input
            ))),
        }
    }

    fn convert_to_type<T: for<'de> serde::de::Deserialize<'de> + serde::Serialize + FromStr>(
        input: &str,
    ) -> Result<Value, PrimitiveError> {
        let converted_value: T = match input.parse::<T>() {
            Ok(val) => val,
            Err(_) => {
                return Err(PrimitiveError::conversion_error(format!(
                    "Could not convert '{}' to '{}'.",
                    input,
                    std::any::type_name::<T>()
                )));
            }
        };
        Ok(json!(converted_value))
    }
}

impl From<PrimitiveError> for ValidationErrorType {
    fn from(err: PrimitiveError) -> Self {
        ValidationErrorType::assertion_failed(&err.to_string())
    }
}

#[derive(Debug)]
pub enum PrimitiveError {
    ConversionError(String),
    InvalidSchemaError(String),
    InvalidPrimitiveType(String),
}

impl PrimitiveError {
    pub fn conversion_error(msg: impl Into<String>) -> Self {
        PrimitiveError::ConversionError(msg.into())
    }

    pub fn invalid_schema_error(msg: impl Into<String>) -> Self {
        PrimitiveError::InvalidSchemaError(msg.into())
    }

    pub fn invalid_primitive_type(msg: impl Into<String>) -> Self {
        PrimitiveError::InvalidPrimitiveType(msg.into())
    }
}

impl Display for PrimitiveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PrimitiveError::ConversionError(msg) => {
                write!(f, "Conversion error: {}", msg)
            }
            PrimitiveError::InvalidSchemaError(msg) => {
                write!(f, "Invalid schema error: {}", msg)
            }
            PrimitiveError::InvalidPrimitiveType(msg) => {
                write!(f, "Invalid primitive type: {}", msg)
            }
        }
    }
}

impl std::error::Error for PrimitiveError {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn converts_csv_collection_format() {
        let fmt = CollectionFormat::from_str("csv");
        assert_eq!(fmt.split("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn converts_pipes_collection_format() {
        let fmt = CollectionFormat::from_str("pipes");
        assert_eq!(fmt.split("a|b|c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn parses_valid_date() {
        let schema = json!({"type": "string", "format": "date"});
        let result = OpenApiPrimitives::convert_string_to_schema_type(&schema, "2024-01-15");
        assert!(result.is_ok());
    }

    #[test]
    fn rejects_invalid_date() {
        let schema = json!({"type": "string", "format": "date"});
        let result = OpenApiPrimitives::convert_string_to_schema_type(&schema, "not-a-date");
        assert!(result.is_err());
    }

    #[test]
    fn parses_valid_date_time() {
        let schema = json!({"type": "string", "format": "date-time"});
        let result =
            OpenApiPrimitives::convert_string_to_schema_type(&schema, "2024-01-15T10:30:00Z");
        assert!(result.is_ok());
    }

    #[test]
    fn from_str_returns_error_instead_of_panicking() {
        let result = OpenApiPrimitives::from_str("not-a-real-type");
        assert!(result.is_err());
    }
}
