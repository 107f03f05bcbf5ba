use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Key used for errors that are not tied to a single payload field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Field-keyed validation failure, rendered as `{"<field>": ["<message>", ...]}` with a 400.
#[derive(Error, Debug, Default, Clone, PartialEq)]
#[error("Validation failed for: {}", .errors.keys().cloned().collect::<Vec<_>>().join(", "))]
pub struct ValidationError {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for an error with a single message on a single field.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut err = Self::new();
        err.add(field, message);
        err
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.errors
    }

    /// Returns `Err(self)` when any field failed, `Ok(())` otherwise.
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        (StatusCode::BAD_REQUEST, Json(self.errors)).into_response()
    }
}
