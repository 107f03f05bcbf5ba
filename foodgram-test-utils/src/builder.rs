//! Declarative test builder.
//!
//! The builder queues table creation and reference-data fixtures; everything is executed
//! by the final `build()` call.

use sea_orm::{sea_query::TableCreateStatement, EntityTrait, Schema};

use crate::{error::TestError, TestContext};

/// Builder for declarative test initialization.
pub struct TestBuilder {
    tables: Vec<TableCreateStatement>,
    include_foodgram_tables: bool,

    tags: Vec<(String, String)>,        // (name, slug)
    ingredients: Vec<(String, String)>, // (name, measurement_unit)
    users: Vec<String>,                 // usernames
}

impl TestBuilder {
    /// Create a new TestBuilder with nothing queued.
    pub fn new() -> Self {
        Self {
            tables: Vec::new(),
            include_foodgram_tables: false,
            tags: Vec::new(),
            ingredients: Vec::new(),
            users: Vec::new(),
        }
    }

    /// Create every table of the Foodgram schema.
    pub fn with_foodgram_tables(mut self) -> Self {
        self.include_foodgram_tables = true;
        self
    }

    /// Add a single entity table to the test database.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use foodgram_test_utils::TestBuilder;
    /// use entity::prelude::*;
    ///
    /// # async fn example() -> Result<(), foodgram_test_utils::TestError> {
    /// let test = TestBuilder::new()
    ///     .with_table(Tag)
    ///     .with_table(Ingredient)
    ///     .build()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Insert a tag during `build()`.
    pub fn with_tag(mut self, name: impl Into<String>, slug: impl Into<String>) -> Self {
        self.tags.push((name.into(), slug.into()));
        self
    }

    /// Insert an ingredient during `build()`.
    pub fn with_ingredient(
        mut self,
        name: impl Into<String>,
        measurement_unit: impl Into<String>,
    ) -> Self {
        self.ingredients
            .push((name.into(), measurement_unit.into()));
        self
    }

    /// Insert a user with the given username during `build()`.
    pub fn with_user(mut self, username: impl Into<String>) -> Self {
        self.users.push(username.into());
        self
    }

    /// Build the test context.
    ///
    /// Executes all queued operations in order:
    /// 1. Creates database tables (Foodgram tables if requested, then custom tables)
    /// 2. Inserts users, tags and ingredients
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Configured test environment
    /// - `Err(TestError::DbErr)` - Table creation or fixture insertion failed
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut context = TestContext::new().await?;

        let mut all_tables = Vec::new();

        if self.include_foodgram_tables {
            let schema = Schema::new(sea_orm::DbBackend::Sqlite);
            all_tables.extend(vec![
                schema.create_table_from_entity(entity::prelude::FoodgramUser),
                schema.create_table_from_entity(entity::prelude::AuthToken),
                schema.create_table_from_entity(entity::prelude::Tag),
                schema.create_table_from_entity(entity::prelude::Ingredient),
                schema.create_table_from_entity(entity::prelude::Recipe),
                schema.create_table_from_entity(entity::prelude::RecipeTag),
                schema.create_table_from_entity(entity::prelude::RecipeIngredient),
                schema.create_table_from_entity(entity::prelude::Favorite),
                schema.create_table_from_entity(entity::prelude::ShoppingCart),
                schema.create_table_from_entity(entity::prelude::Subscription),
            ]);
        }

        all_tables.extend(self.tables);
        context.with_tables(all_tables).await?;

        for username in self.users {
            context.user().insert_user(&username).await?;
        }

        for (name, slug) in self.tags {
            context.recipe().insert_tag(&name, &slug).await?;
        }

        for (name, unit) in self.ingredients {
            context.recipe().insert_ingredient(&name, &unit).await?;
        }

        Ok(context)
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
