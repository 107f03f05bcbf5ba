use chrono::{Duration, Utc};
use sea_orm::{ActiveValue, EntityTrait};

use crate::{
    constant::{TEST_IMAGE_PATH, TEST_TAG_COLOR},
    error::TestError,
    TestContext,
};

impl TestContext {
    pub fn recipe<'a>(&'a mut self) -> RecipeFixtures<'a> {
        RecipeFixtures { context: self }
    }
}

pub struct RecipeFixtures<'a> {
    context: &'a mut TestContext,
}

impl<'a> RecipeFixtures<'a> {
    pub async fn insert_tag(&self, name: &str, slug: &str) -> Result<entity::tag::Model, TestError> {
        Ok(entity::prelude::Tag::insert(entity::tag::ActiveModel {
            name: ActiveValue::Set(name.to_string()),
            color: ActiveValue::Set(TEST_TAG_COLOR.to_string()),
            slug: ActiveValue::Set(slug.to_string()),
            ..Default::default()
        })
        .exec_with_returning(&self.context.db)
        .await?)
    }

    pub async fn insert_ingredient(
        &self,
        name: &str,
        measurement_unit: &str,
    ) -> Result<entity::ingredient::Model, TestError> {
        Ok(
            entity::prelude::Ingredient::insert(entity::ingredient::ActiveModel {
                name: ActiveValue::Set(name.to_string()),
                measurement_unit: ActiveValue::Set(measurement_unit.to_string()),
                ..Default::default()
            })
            .exec_with_returning(&self.context.db)
            .await?,
        )
    }

    /// Insert a recipe together with its tag links and ingredient lines.
    ///
    /// Each call stamps the recipe one second later than the previous recipe of the
    /// same test so ordering by creation time is deterministic.
    pub async fn insert_recipe(
        &self,
        author_id: i32,
        name: &str,
        tag_ids: &[i32],
        ingredients: &[(i32, i16)],
    ) -> Result<entity::recipe::Model, TestError> {
        let existing = entity::prelude::Recipe::find().all(&self.context.db).await?.len();
        let created_at = Utc::now().naive_utc() + Duration::seconds(existing as i64);

        let recipe = entity::prelude::Recipe::insert(entity::recipe::ActiveModel {
            author_id: ActiveValue::Set(author_id),
            name: ActiveValue::Set(name.to_string()),
            text: ActiveValue::Set(format!("How to cook {}", name)),
            cooking_time: ActiveValue::Set(10),
            image: ActiveValue::Set(TEST_IMAGE_PATH.to_string()),
            created_at: ActiveValue::Set(created_at),
            ..Default::default()
        })
        .exec_with_returning(&self.context.db)
        .await?;

        for tag_id in tag_ids {
            entity::prelude::RecipeTag::insert(entity::recipe_tag::ActiveModel {
                recipe_id: ActiveValue::Set(recipe.id),
                tag_id: ActiveValue::Set(*tag_id),
            })
            .exec_without_returning(&self.context.db)
            .await?;
        }

        for (ingredient_id, amount) in ingredients {
            entity::prelude::RecipeIngredient::insert(entity::recipe_ingredient::ActiveModel {
                recipe_id: ActiveValue::Set(recipe.id),
                ingredient_id: ActiveValue::Set(*ingredient_id),
                amount: ActiveValue::Set(*amount),
            })
            .exec_without_returning(&self.context.db)
            .await?;
        }

        Ok(recipe)
    }

    pub async fn insert_favorite(
        &self,
        user_id: i32,
        recipe_id: i32,
    ) -> Result<entity::favorite::Model, TestError> {
        Ok(
            entity::prelude::Favorite::insert(entity::favorite::ActiveModel {
                user_id: ActiveValue::Set(user_id),
                recipe_id: ActiveValue::Set(recipe_id),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
            })
            .exec_with_returning(&self.context.db)
            .await?,
        )
    }

    pub async fn insert_shopping_cart(
        &self,
        user_id: i32,
        recipe_id: i32,
    ) -> Result<entity::shopping_cart::Model, TestError> {
        Ok(
            entity::prelude::ShoppingCart::insert(entity::shopping_cart::ActiveModel {
                user_id: ActiveValue::Set(user_id),
                recipe_id: ActiveValue::Set(recipe_id),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
            })
            .exec_with_returning(&self.context.db)
            .await?,
        )
    }
}
