//! Startup configuration failures.

use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::server::error::InternalServerError;

/// A Foodgram setting read from the environment is absent or unusable
///
/// Raised by [`Config::from_env`](crate::server::config::Config::from_env) before the server
/// binds, so the process exits instead of serving with a half-built configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A setting without a default, such as `DATABASE_URL`, is unset or empty.
    #[error("{0} must be set to start Foodgram")]
    MissingEnvVar(&'static str),
    /// A setting is present but can't be used, e.g. a `PAGE_SIZE` of zero.
    #[error("{var} is not a usable Foodgram setting: {reason}")]
    InvalidEnvValue { var: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid(var: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidEnvValue {
            var,
            reason: reason.into(),
        }
    }
}

impl IntoResponse for ConfigError {
    fn into_response(self) -> Response {
        InternalServerError(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use super::ConfigError;

    /// Expect the offending variable and the reason in the message
    #[test]
    fn test_display() {
        let missing = ConfigError::MissingEnvVar("DATABASE_URL");
        let invalid = ConfigError::invalid("MEDIA_URL", "must start with '/'");

        assert_eq!(missing.to_string(), "DATABASE_URL must be set to start Foodgram");
        assert_eq!(
            invalid.to_string(),
            "MEDIA_URL is not a usable Foodgram setting: must start with '/'"
        );
    }

    /// Expect a configuration failure to surface as a 500
    #[test]
    fn test_into_response() {
        let response = ConfigError::MissingEnvVar("DATABASE_URL").into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
