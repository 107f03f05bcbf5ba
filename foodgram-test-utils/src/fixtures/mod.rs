//! Fixture helpers used during test execution.
//!
//! - `user` - users, auth tokens and subscriptions
//! - `recipe` - tags, ingredients, recipes and user collection entries

pub mod recipe;
pub mod user;
