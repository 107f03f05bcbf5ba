//! Tests for HTTP controller endpoints.
//!
//! Requests are sent through the complete application router so that routing, token
//! extraction, and error rendering are covered together with the handlers.

mod auth;
mod recipe;
mod reference;
mod user;

use axum::http::{Method, StatusCode};
use foodgram_test_utils::prelude::*;
use serde_json::json;

use crate::util::{png_data_url, request, send, TestContextExt};
