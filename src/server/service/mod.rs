//! Service layer for business logic.
//!
//! Services validate client input, coordinate repositories inside transactions where a
//! write touches several tables, and assemble the response DTOs including the per-viewer
//! flags (`is_subscribed`, `is_favorited`, `is_in_shopping_cart`).

pub mod auth;
pub mod collection;
pub mod fixture;
pub mod image;
pub mod pagination;
pub mod presenter;
pub mod recipe;
pub mod reference;
pub mod shopping_list;
pub mod user;
