//! Per-concern validation helpers used by [`crate::model::Operation`].
//!
//! The teacher keeps one struct per validation concern (`RequestBodyValidator`,
//! `RequestParameterValidator`, `RequestScopeValidator`) behind a shared
//! `Validator` trait, dispatched against the raw `serde_json::Value`
//! operation tree on every call. Since this crate materializes a typed
//! [`crate::model::Parameter`]/[`crate::model::Response`] graph once at
//! build time, body and parameter validation live as methods on those types
//! directly; only scope enforcement -- which cuts across the whole
//! operation rather than belonging to one parameter -- keeps its own
//! module here.

pub mod scope;
