use crate::error::ValidationErrorType;
use crate::model::operation::Operation;
use crate::path_matcher::PathMatcher;
use crate::traverser::OpenApiTraverser;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

const HTTP_METHODS: &[&str] = &[
    "get", "put", "post", "delete", "options", "head", "patch",
];

/// One entry of the document's `paths` map: a template plus one
/// [`Operation`] per declared HTTP method.
#[derive(Debug, Clone)]
pub struct Path {
    pub template: String,
    matcher: Arc<PathMatcher>,
    operations: HashMap<String, Operation>,
}

impl Path {
    pub fn from_definition(
        traverser: &OpenApiTraverser,
        template: &str,
        def: &Value,
        global_consumes: &[String],
        global_produces: &[String],
        global_security: &[Value],
    ) -> Result<Self, ValidationErrorType> {
        let matcher = Arc::new(PathMatcher::compile(template)?);
        let methods = OpenApiTraverser::require_object(def)?;

        let mut operations = HashMap::new();
        for method in HTTP_METHODS {
            if let Some(operation_def) = methods.get(*method) {
                operations.insert(
                    method.to_string(),
                    Operation::from_definition(
                        traverser,
                        template,
                        method,
                        operation_def,
                        matcher.clone(),
                        global_consumes,
                        global_produces,
                        global_security,
                    )?,
                );
            }
        }

        Ok(Self {
            template: template.to_string(),
            matcher,
            operations,
        })
    }

    pub fn matcher(&self) -> &PathMatcher {
        &self.matcher
    }

    pub fn operation(&self, method: &str) -> Option<&Operation> {
        self.operations.get(&method.to_lowercase())
    }

    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.operations.values()
    }
}
