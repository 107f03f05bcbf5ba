use axum::{
    extract::{OriginalUri, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use axum_extra::extract::Query;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    model::{
        api::{ErrorDto, PaginatedDto},
        recipe::{RecipeBasicDto, RecipeDto, RecipeWriteDto},
    },
    server::{
        controller::util::{
            json::ValidJson,
            pagination::{page_request, paginated},
        },
        data::collection::{FavoriteRecipes, ShoppingCartRecipes},
        error::{validation::ValidationError, Error},
        model::{
            app::AppState,
            auth::{CurrentUser, MaybeUser},
        },
        service::{
            collection::CollectionService,
            presenter::Presenter,
            recipe::{RecipeQuery, RecipeService},
            shopping_list::{ShoppingListService, SHOPPING_LIST_FILENAME},
        },
    },
};

pub static RECIPE_TAG: &str = "recipes";

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecipeListParams {
    /// Tag slugs, repeated or comma separated; a recipe matches when it has any of them
    #[serde(default)]
    pub tags: Vec<String>,
    /// Author ID
    pub author: Option<String>,
    /// Any nonzero number lists only the caller's favorites
    pub is_favorited: Option<String>,
    /// Any nonzero number lists only recipes in the caller's shopping cart
    pub is_in_shopping_cart: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl RecipeListParams {
    fn to_query(&self) -> Result<RecipeQuery, Error> {
        let mut errors = ValidationError::new();

        let author_id = match self.author.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(author) => match author.parse::<i32>() {
                Ok(author_id) => Some(author_id),
                Err(_) => {
                    errors.add("author", "Select a valid choice.");
                    None
                }
            },
        };

        let is_favorited = parse_flag(&mut errors, "is_favorited", self.is_favorited.as_deref());
        let is_in_shopping_cart = parse_flag(
            &mut errors,
            "is_in_shopping_cart",
            self.is_in_shopping_cart.as_deref(),
        );

        errors.into_result()?;

        Ok(RecipeQuery {
            tags: self
                .tags
                .iter()
                .flat_map(|tags| tags.split(','))
                .map(str::trim)
                .filter(|slug| !slug.is_empty())
                .map(str::to_string)
                .collect(),
            author_id,
            is_favorited,
            is_in_shopping_cart,
        })
    }
}

/// Numeric flag, any nonzero number enables the filter
fn parse_flag(errors: &mut ValidationError, field: &str, value: Option<&str>) -> bool {
    let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return false;
    };

    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => number != 0.0,
        _ => {
            errors.add(field, "Enter a number.");
            false
        }
    }
}

/// List recipes, newest first
#[utoipa::path(
    get,
    path = "/api/recipes/",
    tag = RECIPE_TAG,
    params(RecipeListParams),
    responses(
        (status = 200, description = "Page of recipes", body = PaginatedDto<RecipeDto>),
        (status = 400, description = "Invalid filter"),
        (status = 404, description = "Invalid page", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_recipes(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<RecipeListParams>,
) -> Result<impl IntoResponse, Error> {
    let query = params.to_query()?;
    let request = page_request(
        params.page.as_deref(),
        params.limit.as_deref(),
        state.page_size,
        state.max_page_size,
    )?;

    let page = RecipeService::new(&state.db, &state.images)
        .list(viewer.as_ref(), query, request)
        .await?;

    Ok((StatusCode::OK, Json(paginated(page, &uri))))
}

/// Get a recipe by ID
#[utoipa::path(
    get,
    path = "/api/recipes/{id}/",
    tag = RECIPE_TAG,
    params(("id" = i32, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "The recipe", body = RecipeDto),
        (status = 404, description = "Recipe not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_recipe(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let recipe = RecipeService::new(&state.db, &state.images)
        .get(viewer.as_ref(), id)
        .await?;

    Ok((StatusCode::OK, Json(recipe)))
}

/// Publish a new recipe
#[utoipa::path(
    post,
    path = "/api/recipes/",
    tag = RECIPE_TAG,
    request_body = RecipeWriteDto,
    responses(
        (status = 201, description = "Created recipe", body = RecipeDto),
        (status = 400, description = "Invalid recipe"),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_recipe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidJson(payload): ValidJson<RecipeWriteDto>,
) -> Result<impl IntoResponse, Error> {
    let recipe = RecipeService::new(&state.db, &state.images)
        .create(&user, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(recipe)))
}

/// Replace a recipe
///
/// Every field is required, tags and ingredients are replaced as a whole.
#[utoipa::path(
    patch,
    path = "/api/recipes/{id}/",
    tag = RECIPE_TAG,
    params(("id" = i32, Path, description = "Recipe ID")),
    request_body = RecipeWriteDto,
    responses(
        (status = 200, description = "Updated recipe", body = RecipeDto),
        (status = 400, description = "Invalid recipe"),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Not the author", body = ErrorDto),
        (status = 404, description = "Recipe not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_recipe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
    ValidJson(payload): ValidJson<RecipeWriteDto>,
) -> Result<impl IntoResponse, Error> {
    let recipe = RecipeService::new(&state.db, &state.images)
        .update(&user, id, payload)
        .await?;

    Ok((StatusCode::OK, Json(recipe)))
}

/// Delete a recipe
#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/",
    tag = RECIPE_TAG,
    params(("id" = i32, Path, description = "Recipe ID")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Not the author", body = ErrorDto),
        (status = 404, description = "Recipe not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_recipe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    RecipeService::new(&state.db, &state.images)
        .delete(&user, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Download the summed ingredients of every recipe in the shopping cart
#[utoipa::path(
    get,
    path = "/api/recipes/download_shopping_cart/",
    tag = RECIPE_TAG,
    responses(
        (status = 200, description = "Plain text shopping list", body = String, content_type = "text/plain"),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn download_shopping_cart(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, Error> {
    let shopping_list = ShoppingListService::new(&state.db).build(user.id).await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", SHOPPING_LIST_FILENAME),
            ),
        ],
        shopping_list,
    ))
}

/// Add a recipe to favorites
#[utoipa::path(
    post,
    path = "/api/recipes/{id}/favorite/",
    tag = RECIPE_TAG,
    params(("id" = i32, Path, description = "Recipe ID")),
    responses(
        (status = 201, description = "Recipe added", body = RecipeBasicDto),
        (status = 400, description = "Already in favorites or recipe missing"),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn add_to_favorites(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let recipe = CollectionService::<FavoriteRecipes>::new(&state.db)
        .add(&user, id)
        .await?;

    let dto = Presenter::new(&state.db, &state.images).recipe_basic(&recipe);

    Ok((StatusCode::CREATED, Json(dto)))
}

/// Remove a recipe from favorites
#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/favorite/",
    tag = RECIPE_TAG,
    params(("id" = i32, Path, description = "Recipe ID")),
    responses(
        (status = 204, description = "Recipe removed"),
        (status = 400, description = "Recipe is not in favorites"),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 404, description = "Recipe not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn remove_from_favorites(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    CollectionService::<FavoriteRecipes>::new(&state.db)
        .remove(&user, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Add a recipe to the shopping cart
#[utoipa::path(
    post,
    path = "/api/recipes/{id}/shopping_cart/",
    tag = RECIPE_TAG,
    params(("id" = i32, Path, description = "Recipe ID")),
    responses(
        (status = 201, description = "Recipe added", body = RecipeBasicDto),
        (status = 400, description = "Already in the cart or recipe missing"),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn add_to_shopping_cart(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let recipe = CollectionService::<ShoppingCartRecipes>::new(&state.db)
        .add(&user, id)
        .await?;

    let dto = Presenter::new(&state.db, &state.images).recipe_basic(&recipe);

    Ok((StatusCode::CREATED, Json(dto)))
}

/// Remove a recipe from the shopping cart
#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/shopping_cart/",
    tag = RECIPE_TAG,
    params(("id" = i32, Path, description = "Recipe ID")),
    responses(
        (status = 204, description = "Recipe removed"),
        (status = 400, description = "Recipe is not in the cart"),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 404, description = "Recipe not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn remove_from_shopping_cart(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    CollectionService::<ShoppingCartRecipes>::new(&state.db)
        .remove(&user, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
