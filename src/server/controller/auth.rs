use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    model::{
        api::ErrorDto,
        user::{LoginDto, TokenDto},
    },
    server::{
        controller::util::json::ValidJson,
        error::Error,
        model::{app::AppState, auth::CurrentUser},
        service::auth::AuthService,
    },
};

pub static AUTH_TAG: &str = "auth";

/// Exchange email and password for an API token
///
/// Use the token as `Authorization: Token <auth_token>` on later requests.
#[utoipa::path(
    post,
    path = "/api/auth/token/login/",
    tag = AUTH_TAG,
    request_body = LoginDto,
    responses(
        (status = 200, description = "Token for the user", body = TokenDto),
        (status = 400, description = "Missing fields or invalid credentials"),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn login(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<LoginDto>,
) -> Result<impl IntoResponse, Error> {
    let auth_token = AuthService::new(&state.db)
        .login(payload.email, payload.password)
        .await?;

    Ok((StatusCode::OK, Json(TokenDto { auth_token })))
}

/// Revoke the caller's API token
#[utoipa::path(
    post,
    path = "/api/auth/token/logout/",
    tag = AUTH_TAG,
    responses(
        (status = 204, description = "Token revoked"),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn logout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, Error> {
    AuthService::new(&state.db).logout(user.id).await?;

    Ok(StatusCode::NO_CONTENT)
}
