//! Test context structure and utilities.
//!
//! This module provides the `TestContext` returned by `TestBuilder`. The context owns an
//! in-memory SQLite database and a scratch media directory that recipe images are written
//! to during the test.

use std::path::PathBuf;

use rand::Rng;
use sea_orm::{sea_query::TableCreateStatement, ConnectionTrait, Database, DatabaseConnection};

use crate::error::TestError;

/// Test context structure returned by `TestBuilder`
///
/// # Usage
///
/// ```ignore
/// let mut test = TestBuilder::new().with_foodgram_tables().build().await?;
///
/// let user = test.user().insert_user("alice").await?;
/// let tag = test.recipe().insert_tag("Breakfast", "breakfast").await?;
///
/// let state: AppState = test.to_app_state();
/// ```
pub struct TestContext {
    /// Database connection to in-memory SQLite database
    pub db: DatabaseConnection,
    /// Scratch directory used as the media root
    pub media_root: PathBuf,
}

impl TestContext {
    /// Convert the database connection and media root into any type that can be built
    /// from them.
    ///
    /// This allows conversion to `AppState` without creating a circular dependency
    /// between the test-utils crate and the main foodgram crate.
    pub fn to_app_state<T>(&self) -> T
    where
        T: From<(DatabaseConnection, PathBuf)>,
    {
        T::from((self.db.clone(), self.media_root.clone()))
    }
}

impl TestContext {
    /// Create a new test context with an empty in-memory database and a fresh media
    /// directory under the system temp dir.
    pub(crate) async fn new() -> Result<Self, TestError> {
        let db = Database::connect("sqlite::memory:").await?;

        let suffix: u64 = rand::rng().random();
        let media_root = std::env::temp_dir().join(format!("foodgram-test-media-{:016x}", suffix));
        std::fs::create_dir_all(&media_root)?;

        Ok(TestContext { db, media_root })
    }

    /// Execute CREATE TABLE statements queued by the builder.
    pub(crate) async fn with_tables(
        &self,
        stmts: Vec<TableCreateStatement>,
    ) -> Result<(), TestError> {
        for stmt in stmts {
            self.db.execute(&stmt).await?;
        }

        Ok(())
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.media_root);
    }
}
