//! HTTP routing and OpenAPI documentation configuration.
//!
//! Every API endpoint is registered here together with its OpenAPI specification. Swagger UI
//! serves the collected document at `/api/docs`.

use axum::Router;
use tower_http::{services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::{controller, model::app::AppState};

/// Builds the API router with Swagger UI documentation.
///
/// Handlers sharing a path are registered in a single `routes!` call so that the method
/// router for that path is built once.
///
/// # Registered Endpoints
/// - `/api/auth/token/login/`, `/api/auth/token/logout/` - Token authentication
/// - `/api/users/...` - Signup, profiles, password change, and subscriptions
/// - `/api/tags/...`, `/api/ingredients/...` - Read-only reference data
/// - `/api/recipes/...` - Recipe CRUD, favorites, shopping cart, and shopping list download
///
/// The OpenAPI specification is available at `/api/docs/openapi.json`.
pub fn routes() -> Router<AppState> {
    #[derive(OpenApi)]
    #[openapi(info(title = "Foodgram", description = "Foodgram API"), tags(
        (name = controller::auth::AUTH_TAG, description = "Token authentication API routes"),
        (name = controller::user::USER_TAG, description = "User and subscription API routes"),
        (name = controller::reference::TAG_TAG, description = "Recipe tag API routes"),
        (name = controller::reference::INGREDIENT_TAG, description = "Ingredient API routes"),
        (name = controller::recipe::RECIPE_TAG, description = "Recipe API routes"),
    ))]
    struct ApiDoc;

    let (routes, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(controller::auth::login))
        .routes(routes!(controller::auth::logout))
        .routes(routes!(
            controller::user::list_users,
            controller::user::create_user
        ))
        .routes(routes!(controller::user::get_me))
        .routes(routes!(controller::user::set_password))
        .routes(routes!(controller::user::list_subscriptions))
        .routes(routes!(controller::user::get_user))
        .routes(routes!(
            controller::user::subscribe,
            controller::user::unsubscribe
        ))
        .routes(routes!(controller::reference::list_tags))
        .routes(routes!(controller::reference::get_tag))
        .routes(routes!(controller::reference::list_ingredients))
        .routes(routes!(controller::reference::get_ingredient))
        .routes(routes!(
            controller::recipe::list_recipes,
            controller::recipe::create_recipe
        ))
        .routes(routes!(controller::recipe::download_shopping_cart))
        .routes(routes!(
            controller::recipe::get_recipe,
            controller::recipe::update_recipe,
            controller::recipe::delete_recipe
        ))
        .routes(routes!(
            controller::recipe::add_to_favorites,
            controller::recipe::remove_from_favorites
        ))
        .routes(routes!(
            controller::recipe::add_to_shopping_cart,
            controller::recipe::remove_from_shopping_cart
        ))
        .split_for_parts();

    routes.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", api))
}

/// Complete application: API routes, uploaded media under the configured media URL, and
/// request tracing.
pub fn app(state: AppState) -> Router {
    let media = ServeDir::new(state.images.media_root());
    let media_prefix = state.images.media_url().trim_end_matches('/').to_string();

    let router = if media_prefix.is_empty() {
        routes().fallback_service(media)
    } else {
        routes().nest_service(&media_prefix, media)
    };

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
