//! Data access layer repositories.
//!
//! Repositories wrap SeaORM queries for a single table or link table. They are generic over
//! `ConnectionTrait` so the same code runs against a `DatabaseConnection` or inside a
//! `DatabaseTransaction`, and they return `DbErr` leaving HTTP concerns to the services.

pub mod auth_token;
pub mod collection;
pub mod ingredient;
pub mod recipe;
pub mod tag;
pub mod user;
