use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    model::{
        api::ErrorDto,
        recipe::{IngredientDto, TagDto},
    },
    server::{error::Error, model::app::AppState, service::reference::ReferenceService},
};

pub static TAG_TAG: &str = "tags";
pub static INGREDIENT_TAG: &str = "ingredients";

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IngredientParams {
    /// Case-insensitive name fragment, names starting with it are listed first
    pub name: Option<String>,
}

/// List all tags
#[utoipa::path(
    get,
    path = "/api/tags/",
    tag = TAG_TAG,
    responses(
        (status = 200, description = "All tags ordered by name", body = Vec<TagDto>),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_tags(State(state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let tags = ReferenceService::new(&state.db).list_tags().await?;

    Ok((StatusCode::OK, Json(tags)))
}

/// Get a tag by ID
#[utoipa::path(
    get,
    path = "/api/tags/{id}/",
    tag = TAG_TAG,
    params(("id" = i32, Path, description = "Tag ID")),
    responses(
        (status = 200, description = "The tag", body = TagDto),
        (status = 404, description = "Tag not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let tag = ReferenceService::new(&state.db).get_tag(id).await?;

    Ok((StatusCode::OK, Json(tag)))
}

/// List ingredients, optionally filtered by name
#[utoipa::path(
    get,
    path = "/api/ingredients/",
    tag = INGREDIENT_TAG,
    params(IngredientParams),
    responses(
        (status = 200, description = "Matching ingredients", body = Vec<IngredientDto>),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_ingredients(
    State(state): State<AppState>,
    Query(params): Query<IngredientParams>,
) -> Result<impl IntoResponse, Error> {
    let ingredients = ReferenceService::new(&state.db)
        .list_ingredients(params.name.as_deref())
        .await?;

    Ok((StatusCode::OK, Json(ingredients)))
}

/// Get an ingredient by ID
#[utoipa::path(
    get,
    path = "/api/ingredients/{id}/",
    tag = INGREDIENT_TAG,
    params(("id" = i32, Path, description = "Ingredient ID")),
    responses(
        (status = 200, description = "The ingredient", body = IngredientDto),
        (status = 404, description = "Ingredient not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let ingredient = ReferenceService::new(&state.db).get_ingredient(id).await?;

    Ok((StatusCode::OK, Json(ingredient)))
}
