//! Database model type aliases.
//!
//! Short names for the SeaORM models of the `entity` crate so that signatures elsewhere
//! don't need to spell out `entity::<table>::Model`.

/// A registered account, also the author of recipes.
pub type UserModel = entity::foodgram_user::Model;

/// The single opaque API token of a user.
pub type AuthTokenModel = entity::auth_token::Model;

pub type TagModel = entity::tag::Model;

pub type IngredientModel = entity::ingredient::Model;

/// A recipe row; tags and ingredient lines are stored in link tables.
pub type RecipeModel = entity::recipe::Model;

/// One `(recipe, ingredient, amount)` line.
pub type RecipeIngredientModel = entity::recipe_ingredient::Model;
