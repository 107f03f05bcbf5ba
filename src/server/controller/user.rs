use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    model::{
        api::{ErrorDto, PaginatedDto},
        user::{CreatedUserDto, SetPasswordDto, SignupDto, UserDetailDto, UserDto},
    },
    server::{
        controller::util::{
            json::ValidJson,
            pagination::{page_request, paginated, PageParams},
        },
        data::collection::FollowedAuthors,
        error::{validation::ValidationError, Error},
        model::{
            app::AppState,
            auth::{CurrentUser, MaybeUser},
        },
        service::{collection::CollectionService, presenter::Presenter, user::UserService},
    },
};

pub static USER_TAG: &str = "users";

pub static RECIPES_LIMIT_PARAM: &str = "recipes_limit";

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SubscriptionParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    /// Maximum recipes listed per author, zero or absent lists all
    pub recipes_limit: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecipesLimitParams {
    /// Maximum recipes listed for the author, zero or absent lists all
    pub recipes_limit: Option<String>,
}

/// Parses `recipes_limit`
///
/// # Returns
/// - `Ok(None)`: Absent or not positive, every recipe is listed
/// - `Ok(Some(limit))`: Positive limit
/// - `Err(ValidationError)`: Not an integer
fn parse_recipes_limit(value: Option<&str>) -> Result<Option<usize>, ValidationError> {
    let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };

    let limit = value.parse::<i64>().map_err(|_| {
        ValidationError::field(RECIPES_LIMIT_PARAM, "Recipes limit should be an integer")
    })?;

    Ok(usize::try_from(limit).ok().filter(|limit| *limit > 0))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/users/",
    tag = USER_TAG,
    request_body = SignupDto,
    responses(
        (status = 201, description = "User created", body = CreatedUserDto),
        (status = 400, description = "Invalid or duplicate fields"),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<SignupDto>,
) -> Result<impl IntoResponse, Error> {
    let user = UserService::new(&state.db, &state.images)
        .signup(payload)
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// List users
#[utoipa::path(
    get,
    path = "/api/users/",
    tag = USER_TAG,
    params(PageParams),
    responses(
        (status = 200, description = "Page of users", body = PaginatedDto<UserDto>),
        (status = 404, description = "Invalid page", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_users(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, Error> {
    let request = page_request(
        params.page.as_deref(),
        params.limit.as_deref(),
        state.page_size,
        state.max_page_size,
    )?;

    let page = UserService::new(&state.db, &state.images)
        .list(viewer.as_ref(), request)
        .await?;

    Ok((StatusCode::OK, Json(paginated(page, &uri))))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/api/users/{id}/",
    tag = USER_TAG,
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "The user", body = UserDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_user(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let user = UserService::new(&state.db, &state.images)
        .get(viewer.as_ref(), id)
        .await?;

    Ok((StatusCode::OK, Json(user)))
}

/// Get the authenticated user
#[utoipa::path(
    get,
    path = "/api/users/me/",
    tag = USER_TAG,
    responses(
        (status = 200, description = "The caller", body = UserDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, Error> {
    let dto = Presenter::new(&state.db, &state.images)
        .user(Some(&user), &user)
        .await?;

    Ok((StatusCode::OK, Json(dto)))
}

/// Change the caller's password
#[utoipa::path(
    post,
    path = "/api/users/set_password/",
    tag = USER_TAG,
    request_body = SetPasswordDto,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Invalid current or new password"),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn set_password(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidJson(payload): ValidJson<SetPasswordDto>,
) -> Result<impl IntoResponse, Error> {
    UserService::new(&state.db, &state.images)
        .set_password(user, payload)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// List the authors the caller follows
#[utoipa::path(
    get,
    path = "/api/users/subscriptions/",
    tag = USER_TAG,
    params(SubscriptionParams),
    responses(
        (status = 200, description = "Page of followed authors", body = PaginatedDto<UserDetailDto>),
        (status = 400, description = "Invalid recipes_limit"),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 404, description = "Invalid page", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_subscriptions(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<SubscriptionParams>,
) -> Result<impl IntoResponse, Error> {
    let recipes_limit = parse_recipes_limit(params.recipes_limit.as_deref())?;
    let request = page_request(
        params.page.as_deref(),
        params.limit.as_deref(),
        state.page_size,
        state.max_page_size,
    )?;

    let page = UserService::new(&state.db, &state.images)
        .subscriptions(&user, request, recipes_limit)
        .await?;

    Ok((StatusCode::OK, Json(paginated(page, &uri))))
}

/// Follow an author
#[utoipa::path(
    post,
    path = "/api/users/{id}/subscribe/",
    tag = USER_TAG,
    params(
        ("id" = i32, Path, description = "Author ID"),
        RecipesLimitParams
    ),
    responses(
        (status = 201, description = "Followed author", body = UserDetailDto),
        (status = 400, description = "Already subscribed or subscribing to self"),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 404, description = "Author not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn subscribe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
    Query(params): Query<RecipesLimitParams>,
) -> Result<impl IntoResponse, Error> {
    let recipes_limit = parse_recipes_limit(params.recipes_limit.as_deref())?;

    let author = CollectionService::<FollowedAuthors>::new(&state.db)
        .add(&user, id)
        .await?;

    tracing::debug!(subscriber_id = %user.id, author_id = %author.id, "Subscribed to author");

    let dto = Presenter::new(&state.db, &state.images)
        .user_details(Some(&user), std::slice::from_ref(&author), recipes_limit)
        .await?
        .pop()
        .ok_or_else(|| Error::InternalError("Presenting an author produced no result".to_string()))?;

    Ok((StatusCode::CREATED, Json(dto)))
}

/// Stop following an author
#[utoipa::path(
    delete,
    path = "/api/users/{id}/subscribe/",
    tag = USER_TAG,
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Unsubscribed"),
        (status = 400, description = "Not subscribed to the author"),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 404, description = "Author not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn unsubscribe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    CollectionService::<FollowedAuthors>::new(&state.db)
        .remove(&user, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
