//! Server application core modules.
//!
//! HTTP routing, token authentication, database access, media storage, and the domain
//! services of the Foodgram recipe sharing backend.

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod model;
pub mod router;
pub mod service;
pub mod startup;
