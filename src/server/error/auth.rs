use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    model::api::ErrorDto,
    server::error::validation::{ValidationError, NON_FIELD_ERRORS},
};

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authentication credentials were not provided.")]
    NotAuthenticated,
    #[error("Invalid token.")]
    InvalidToken,
    #[error("You do not have permission to perform this action.")]
    PermissionDenied,
    #[error("Unable to log in with provided credentials.")]
    InvalidCredentials,
}

impl AuthError {
    fn error_response(status: StatusCode, message: String) -> Response {
        (status, Json(ErrorDto { error: message })).into_response()
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        match self {
            Self::NotAuthenticated | Self::InvalidToken => {
                Self::error_response(StatusCode::UNAUTHORIZED, self.to_string())
            }
            Self::PermissionDenied => Self::error_response(StatusCode::FORBIDDEN, self.to_string()),
            Self::InvalidCredentials => {
                ValidationError::field(NON_FIELD_ERRORS, self.to_string()).into_response()
            }
        }
    }
}
