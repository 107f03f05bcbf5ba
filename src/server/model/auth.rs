//! Token authentication extractors.
//!
//! Requests authenticate with an `Authorization: Token <key>` header. A request without the
//! header, or with a different scheme, is anonymous. A `Token` header whose key is missing
//! or unknown is rejected with 401 rather than being downgraded to anonymous.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::server::{
    error::{auth::AuthError, Error},
    model::{app::AppState, db::UserModel},
    service::auth::AuthService,
};

pub static TOKEN_SCHEME: &str = "Token";

/// The authenticated user; rejects anonymous requests with 401.
pub struct CurrentUser(pub UserModel);

/// The authenticated user if any, for endpoints that also serve anonymous viewers.
pub struct MaybeUser(pub Option<UserModel>);

/// Extracts the token key from the `Authorization` header
///
/// # Returns
/// - `Ok(Some(key))`: Header uses the `Token` scheme with a key
/// - `Ok(None)`: No header, or a header for another scheme
/// - `Err(AuthError::InvalidToken)`: `Token` scheme without a usable key
pub fn token_from_headers(headers: &HeaderMap) -> Result<Option<String>, AuthError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| AuthError::InvalidToken)?;

    let mut parts = value.split_whitespace();
    match parts.next() {
        Some(scheme) if scheme.eq_ignore_ascii_case(TOKEN_SCHEME) => {}
        _ => return Ok(None),
    }

    match (parts.next(), parts.next()) {
        (Some(key), None) => Ok(Some(key.to_string())),
        _ => Err(AuthError::InvalidToken),
    }
}

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(key) = token_from_headers(&parts.headers)? else {
            return Ok(MaybeUser(None));
        };

        let Some(user) = AuthService::new(&state.db).authenticate(&key).await? else {
            return Err(AuthError::InvalidToken.into());
        };

        Ok(MaybeUser(Some(user)))
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let MaybeUser(user) = MaybeUser::from_request_parts(parts, state).await?;

        user.map(CurrentUser)
            .ok_or_else(|| AuthError::NotAuthenticated.into())
    }
}
