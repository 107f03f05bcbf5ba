//! Error types for the Foodgram server.
//!
//! Domain errors live in their own modules and are aggregated by [`Error`], which every
//! service and controller returns. Each variant maps to an HTTP response through
//! `IntoResponse`; anything without a dedicated mapping becomes a logged 500.

pub mod auth;
pub mod config;
pub mod validation;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    model::api::ErrorDto,
    server::error::{auth::AuthError, config::ConfigError, validation::ValidationError},
};

/// Main error type for the Foodgram server.
///
/// Uses `thiserror`'s `#[from]` so that the `?` operator converts domain and library errors
/// automatically.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Authentication or permission failure.
    #[error(transparent)]
    AuthError(#[from] AuthError),
    /// Field-keyed validation failure of a client payload.
    #[error(transparent)]
    ValidationError(#[from] ValidationError),
    /// The requested resource does not exist.
    #[error("{0} not found")]
    NotFound(String),
    /// Requested page number is past the end of the result set.
    #[error("Page {0} is out of range")]
    InvalidPage(u64),
    /// Internal error indicating a bug in Foodgram's code.
    #[error("Internal error with Foodgram's code: {0:?}")]
    InternalError(String),
    /// Database error (query failures, connection issues, constraint violations).
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    /// Filesystem error while storing or removing media.
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    /// Fixture file that could not be decoded.
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),
}

impl Error {
    fn not_found(detail: &str) -> Response {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorDto {
                error: detail.to_string(),
            }),
        )
            .into_response()
    }
}

/// Converts application errors into HTTP responses.
///
/// # Returns
/// - 400 Bad Request - Validation errors and invalid credentials
/// - 401 Unauthorized - Missing or invalid token
/// - 403 Forbidden - Acting on another author's recipe
/// - 404 Not Found - Missing resources or out of range pages
/// - 500 Internal Server Error - Everything else, with error logging
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::ConfigError(err) => err.into_response(),
            Self::AuthError(err) => err.into_response(),
            Self::ValidationError(err) => err.into_response(),
            Self::NotFound(ref what) => {
                tracing::debug!(resource = %what, "{}", self);

                Self::not_found("Not found.")
            }
            Self::InvalidPage(_) => {
                tracing::debug!("{}", self);

                Self::not_found("Invalid page.")
            }
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Wrapper type for converting any displayable error into a 500 Internal Server Error response.
///
/// Logs the full error and returns a generic message so implementation details never reach
/// the client.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorDto {
                error: "Internal server error".to_string(),
            }),
        )
            .into_response()
    }
}
