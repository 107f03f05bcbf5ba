//! Test harness for the Foodgram backend.
//!
//! Tests are written in two phases: a [`TestBuilder`] declares the tables and
//! reference data the test needs, and the resulting [`TestContext`] exposes the
//! in-memory SQLite connection, a scratch media directory, and fixture helpers
//! for inserting users, recipes and collection entries.

pub mod builder;
pub mod constant;
pub mod context;
pub mod error;
pub mod fixtures;

pub use builder::TestBuilder;
pub use context::TestContext;
pub use error::TestError;

pub mod prelude {
    pub use crate::{constant::TEST_PASSWORD, TestBuilder, TestContext, TestError};
}
