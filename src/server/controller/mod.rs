//! HTTP controller endpoints for the Foodgram web API.
//!
//! Controllers extract and parse request input, delegate to the services, and shape the
//! HTTP response. Every handler is annotated with `utoipa::path` so it appears in the
//! generated OpenAPI document.

pub mod auth;
pub mod recipe;
pub mod reference;
pub mod user;
pub mod util;
