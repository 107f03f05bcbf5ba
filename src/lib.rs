//! Foodgram: a recipe sharing backend.
//!
//! Users publish recipes tagged with categories and ingredient quantities, follow other
//! authors, keep favorites and a shopping cart, and download a consolidated shopping list.

pub mod model;
pub mod server;
