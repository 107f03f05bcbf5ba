use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::user::UserDto;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TagDto {
    pub id: i32,
    pub name: String,
    pub color: String,
    pub slug: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct IngredientDto {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
}

/// An ingredient line of a recipe
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecipeIngredientDto {
    /// Ingredient ID
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i16,
}

/// Full read representation of a recipe
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecipeDto {
    pub id: i32,
    pub author: UserDto,
    pub name: String,
    pub text: String,
    /// Cooking time in minutes
    pub cooking_time: i16,
    /// URL of the recipe image
    pub image: String,
    pub tags: Vec<TagDto>,
    pub ingredients: Vec<RecipeIngredientDto>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// Short representation used for favorites, shopping cart and author previews
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecipeBasicDto {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub cooking_time: i16,
}

/// `{id, amount}` pair of the recipe write payload
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct IngredientAmountDto {
    /// Ingredient ID
    pub id: i32,
    pub amount: i64,
}

/// Payload for creating or updating a recipe.
///
/// Every field is optional at the serde level so that missing, null and empty values are
/// reported as field-keyed validation errors instead of a generic decode failure.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct RecipeWriteDto {
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i64>,
    /// Inline image as a `data:image/<ext>;base64,<data>` URL
    pub image: Option<String>,
    pub tags: Option<Vec<i32>>,
    pub ingredients: Option<Vec<IngredientAmountDto>>,
}
