use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::recipe::RecipeBasicDto;

/// A user as seen by the current viewer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Whether the viewer follows this user, always false for anonymous viewers
    pub is_subscribed: bool,
}

/// An author with a preview of their recipes, used by subscription endpoints
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserDetailDto {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
    /// Total number of recipes authored
    pub recipes_count: u64,
    /// Newest recipes first, truncated by `recipes_limit`
    pub recipes: Vec<RecipeBasicDto>,
}

/// Response to a successful signup
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CreatedUserDto {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

/// Signup payload; absent fields are reported per field
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct SignupDto {
    pub email: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct SetPasswordDto {
    pub new_password: Option<String>,
    pub current_password: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct LoginDto {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenDto {
    pub auth_token: String,
}
