//! Helpers shared by the controllers: JSON body extraction and pagination.

pub mod json;
pub mod pagination;
