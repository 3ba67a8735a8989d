pub mod case_insensitive;
pub mod json_path;
pub mod primitive;

use std::fmt::{Display, Formatter};

/// Where a parameter is bound, per Swagger 2.0's `in` field.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum ParameterLocation {
    Body,
    FormData,
    Query,
    Header,
    Path,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Body => "body",
            ParameterLocation::FormData => "formData",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Path => "path",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "body" => Some(ParameterLocation::Body),
            "formData" => Some(ParameterLocation::FormData),
            "query" => Some(ParameterLocation::Query),
            "header" => Some(ParameterLocation::Header),
            "path" => Some(ParameterLocation::Path),
            _ => None,
        }
    }
}

impl Display for ParameterLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
