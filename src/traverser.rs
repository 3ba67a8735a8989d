//! Low-level, `$ref`-aware document navigation shared by the model builder
//! and the validators. Resolution results are memoized in a `DashMap` for
//! the duration of a single [`OpenApiTraverser`] -- that map is populated
//! once while [`crate::builder::ApiBuilder`] walks the document and is never
//! touched again afterwards, so it does not reintroduce per-request state.

use crate::error::{ComponentSection, Section, SpecificationSection, ValidationErrorType};
use crate::{PATH_SEPARATOR, REF_FIELD};
use dashmap::{DashMap, Entry};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;

type TraverseResult<'a> = Result<SearchResult<'a>, ValidationErrorType>;

#[derive(Debug)]
pub enum SearchResult<'a> {
    /// A search yielding a cached, `$ref`-resolved value.
    Arc(Arc<Value>),
    /// A search result yielding a sub-node of the original tree (no
    /// reference was followed).
    Ref(&'a Value),
}

impl<'a> SearchResult<'a> {
    pub fn value(&'a self) -> &'a Value {
        match self {
            SearchResult::Arc(arc_val) => arc_val,
            SearchResult::Ref(val) => val,
        }
    }
}

pub struct OpenApiTraverser {
    specification: Value,
    resolved_references: DashMap<String, Arc<Value>>,
}

impl OpenApiTraverser {
    pub fn new(specification: Value) -> Self {
        Self {
            specification,
            resolved_references: DashMap::new(),
        }
    }

    pub fn specification(&self) -> &Value {
        &self.specification
    }

    /// Retrieves an optional field from a JSON value, treating a missing
    /// field as `Ok(None)` rather than an error.
    pub fn get_optional<'node>(
        &'node self,
        node: &'node Value,
        field: &str,
    ) -> Result<Option<SearchResult<'node>>, ValidationErrorType>
    where
        Self: 'node,
    {
        match self.get_required(node, field) {
            Ok(found) => Ok(Some(found)),
            Err(e) => match e {
                ValidationErrorType::FieldExpected(_, _) => Ok(None),
                _ => Err(e),
            },
        }
    }

    /// Retrieves a required field from a JSON value, following a `$ref` on
    /// `node` itself first if present.
    pub fn get_required<'node>(
        &'node self,
        node: &'node Value,
        field: &str,
    ) -> Result<SearchResult<'node>, ValidationErrorType>
    where
        Self: 'node,
    {
        log::trace!("looking for required field '{}' in '{}'", field, node);
        let ref_result = self.resolve_possible_ref(node)?;
        match ref_result {
            SearchResult::Arc(val) => match val.get(field) {
                None => Err(ValidationErrorType::FieldExpected(
                    field.to_string(),
                    Section::Specification(SpecificationSection::Components(
                        ComponentSection::Schemas,
                    )),
                )),
                Some(v) => Ok(SearchResult::Arc(Arc::new(v.clone()))),
            },
            SearchResult::Ref(val) => match val.get(field) {
                None => Err(ValidationErrorType::FieldExpected(
                    field.to_string(),
                    Section::Specification(SpecificationSection::Components(
                        ComponentSection::Schemas,
                    )),
                )),
                Some(v) => Ok(SearchResult::Ref(v)),
            },
        }
    }

    /// Resolves `node` if it is a bare `{"$ref": "..."}` object, following
    /// and memoizing the reference. Returns the node itself otherwise.
    pub fn resolve_possible_ref<'node>(&'node self, node: &'node Value) -> TraverseResult<'node> {
        if let Ok(ref_string) = Self::get_as_str(node, REF_FIELD) {
            let entry = self.resolved_references.entry(String::from(ref_string));
            return match entry {
                Entry::Occupied(entry) => Ok(SearchResult::Arc(entry.get().clone())),
                Entry::Vacant(entry) => {
                    let mut seen_references = HashSet::new();
                    let res = self.get_reference_path(ref_string, &mut seen_references)?;
                    let res = match res {
                        SearchResult::Arc(val) => val,
                        SearchResult::Ref(val) => Arc::new(val.clone()),
                    };
                    entry.insert(res.clone());
                    Ok(SearchResult::Arc(res))
                }
            };
        }
        Ok(SearchResult::Ref(node))
    }

    /// Resolves a JSON-Pointer-style `$ref` string (e.g.
    /// `#/definitions/Pet`) against the root specification.
    fn get_reference_path<'node, 'sub_node>(
        &'node self,
        ref_string: &'node str,
        seen_references: &mut HashSet<&'node str>,
    ) -> TraverseResult<'sub_node>
    where
        'node: 'sub_node,
    {
        if seen_references.contains(ref_string) {
            return Err(ValidationErrorType::CircularReference(
                ref_string.to_string(),
                Section::Specification(SpecificationSection::Components(ComponentSection::Schemas)),
            ));
        }
        seen_references.insert(ref_string);

        let mut complete_path = String::from("/");
        let path = ref_string
            .split(PATH_SEPARATOR)
            .filter(|node| !(*node).is_empty() && (*node != "#"))
            .collect::<Vec<&str>>()
            .join("/");
        complete_path.push_str(&path);

        match self.specification.pointer(&complete_path) {
            None => Err(ValidationErrorType::FieldExpected(
                complete_path,
                Section::Specification(SpecificationSection::Components(
                    ComponentSection::Schemas,
                )),
            )),
            Some(v) => self.resolve_possible_ref(v),
        }
    }

    pub(crate) fn get_as_str<'node, 'sub_node>(
        node: &'node Value,
        field: &str,
    ) -> Result<&'sub_node str, ValidationErrorType>
    where
        'node: 'sub_node,
    {
        match node.get(field) {
            None => Err(ValidationErrorType::FieldExpected(
                field.to_string(),
                Section::Specification(SpecificationSection::Components(ComponentSection::Schemas)),
            )),
            Some(found) => Self::require_str(found),
        }
    }

    pub(crate) fn get_as_object<'node, 'sub_node>(
        node: &'node Value,
        field: &str,
    ) -> Result<&'sub_node Map<String, Value>, ValidationErrorType>
    where
        'node: 'sub_node,
    {
        match node.get(field) {
            None => Err(ValidationErrorType::FieldExpected(
                field.to_string(),
                Section::Specification(SpecificationSection::Components(ComponentSection::Schemas)),
            )),
            Some(val) => Self::require_object(val),
        }
    }

    pub(crate) fn get_as_array<'node, 'sub_node>(
        node: &'node Value,
        field: &str,
    ) -> Result<&'sub_node Vec<Value>, ValidationErrorType>
    where
        'node: 'sub_node,
    {
        match node.get(field) {
            None => Err(ValidationErrorType::FieldExpected(
                field.to_string(),
                Section::Specification(SpecificationSection::Components(ComponentSection::Schemas)),
            )),
            Some(found) => Self::require_array(found),
        }
    }

    pub(crate) fn require_bool(node: &Value) -> Result<bool, ValidationErrorType> {
        match node.as_bool() {
            None => Err(ValidationErrorType::UnexpectedType {
                expected: crate::types::primitive::OpenApiPrimitives::Bool,
                found: node.clone(),
                section: Section::Specification(SpecificationSection::Components(
                    ComponentSection::Schemas,
                )),
            }),
            Some(value) => Ok(value),
        }
    }

    pub(crate) fn require_str<'node, 'sub_node>(
        node: &'node Value,
    ) -> Result<&'sub_node str, ValidationErrorType>
    where
        'node: 'sub_node,
    {
        match node.as_str() {
            None => Err(ValidationErrorType::UnexpectedType {
                expected: crate::types::primitive::OpenApiPrimitives::String,
                found: node.clone(),
                section: Section::Specification(SpecificationSection::Components(
                    ComponentSection::Schemas,
                )),
            }),
            Some(string) => Ok(string),
        }
    }

    pub(crate) fn require_object<'node, 'sub_node>(
        node: &'node Value,
    ) -> Result<&'sub_node Map<String, Value>, ValidationErrorType>
    where
        'node: 'sub_node,
    {
        match node.as_object() {
            None => Err(ValidationErrorType::UnexpectedType {
                expected: crate::types::primitive::OpenApiPrimitives::Object,
                found: node.clone(),
                section: Section::Specification(SpecificationSection::Components(
                    ComponentSection::Schemas,
                )),
            }),
            Some(map) => Ok(map),
        }
    }

    /// Recursively resolves every `$ref` reachable from `node`, returning an
    /// owned tree with no remaining references. Schemas pulled out of the
    /// document (a parameter's `schema`, a response's `schema`) are handed
    /// to the validator as standalone values, so any `$ref` nested inside
    /// them (e.g. `properties.pet.$ref`) would otherwise be resolved
    /// against that standalone value instead of the full document.
    pub fn deep_resolve(&self, node: &Value) -> Result<Value, ValidationErrorType> {
        let mut seen = HashSet::new();
        self.deep_resolve_inner(node, &mut seen)
    }

    fn deep_resolve_inner<'node>(
        &self,
        node: &'node Value,
        seen: &mut HashSet<String>,
    ) -> Result<Value, ValidationErrorType> {
        if let Ok(ref_string) = Self::get_as_str(node, REF_FIELD) {
            if !seen.insert(ref_string.to_string()) {
                return Err(ValidationErrorType::CircularReference(
                    ref_string.to_string(),
                    Section::Specification(SpecificationSection::Components(
                        ComponentSection::Schemas,
                    )),
                ));
            }
            let resolved = self.resolve_possible_ref(node)?;
            let resolved = self.deep_resolve_inner(resolved.value(), seen)?;
            seen.remove(ref_string);
            return Ok(resolved);
        }

        match node {
            Value::Object(map) => {
                let mut out = Map::with_capacity(map.len());
                for (key, value) in map {
                    out.insert(key.clone(), self.deep_resolve_inner(value, seen)?);
                }
                Ok(Value::Object(out))
            }
            Value::Array(arr) => {
                let mut out = Vec::with_capacity(arr.len());
                for value in arr {
                    out.push(self.deep_resolve_inner(value, seen)?);
                }
                Ok(Value::Array(out))
            }
            other => Ok(other.clone()),
        }
    }

    pub(crate) fn require_array<'node, 'sub_node>(
        node: &'node Value,
    ) -> Result<&'sub_node Vec<Value>, ValidationErrorType>
    where
        'node: 'sub_node,
    {
        match node.as_array() {
            None => Err(ValidationErrorType::UnexpectedType {
                expected: crate::types::primitive::OpenApiPrimitives::Array,
                found: node.clone(),
                section: Section::Specification(SpecificationSection::Components(
                    ComponentSection::Schemas,
                )),
            }),
            Some(array) => Ok(array),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_simple_ref() {
        let spec = json!({
            "definitions": {
                "Pet": { "type": "object" }
            }
        });
        let traverser = OpenApiTraverser::new(spec);
        let node = json!({ "$ref": "#/definitions/Pet" });
        let resolved = traverser.resolve_possible_ref(&node).unwrap();
        assert_eq!(resolved.value(), &json!({ "type": "object" }));
    }

    #[test]
    fn detects_circular_ref() {
        let spec = json!({
            "definitions": {
                "A": { "$ref": "#/definitions/B" },
                "B": { "$ref": "#/definitions/A" }
            }
        });
        let traverser = OpenApiTraverser::new(spec);
        let node = json!({ "$ref": "#/definitions/A" });
        let result = traverser.resolve_possible_ref(&node);
        assert!(result.is_err());
    }

    #[test]
    fn get_optional_returns_none_for_missing_field() {
        let traverser = OpenApiTraverser::new(json!({}));
        let node = json!({ "a": 1 });
        let result = traverser.get_optional(&node, "b").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn require_object_rejects_non_object() {
        let result = OpenApiTraverser::require_object(&json!("not an object"));
        assert!(result.is_err());
    }

    #[test]
    fn require_array_accepts_array() {
        let result = OpenApiTraverser::require_array(&json!([1, 2, 3]));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().len(), 3);
    }

    #[test]
    fn deep_resolve_replaces_nested_ref() {
        let spec = json!({
            "definitions": {
                "Pet": { "type": "object", "properties": { "name": { "type": "string" } } }
            }
        });
        let traverser = OpenApiTraverser::new(spec);
        let schema = json!({
            "type": "object",
            "properties": {
                "pet": { "$ref": "#/definitions/Pet" }
            }
        });
        let resolved = traverser.deep_resolve(&schema).unwrap();
        assert_eq!(
            resolved["properties"]["pet"],
            json!({ "type": "object", "properties": { "name": { "type": "string" } } })
        );
    }

    #[test]
    fn deep_resolve_detects_circular_ref() {
        let spec = json!({
            "definitions": {
                "A": { "$ref": "#/definitions/B" },
                "B": { "$ref": "#/definitions/A" }
            }
        });
        let traverser = OpenApiTraverser::new(spec);
        let node = json!({ "$ref": "#/definitions/A" });
        assert!(traverser.deep_resolve(&node).is_err());
    }
}
