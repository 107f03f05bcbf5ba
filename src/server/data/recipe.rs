use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    sea_query::{Expr, ExprTrait, Query},
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::model::db::RecipeModel;

/// Scalar recipe fields written on create and update
pub struct RecipeFields {
    pub name: String,
    pub text: String,
    pub cooking_time: i16,
    /// Image path relative to the media root
    pub image: String,
}

/// Restrictions applied when listing recipes; empty fields don't filter
#[derive(Debug, Default, Clone)]
pub struct RecipeFilter {
    /// Recipes carrying at least one of these tag slugs
    pub tag_slugs: Vec<String>,
    pub author_id: Option<i32>,
    /// Recipes favorited by this user
    pub favorited_by: Option<i32>,
    /// Recipes in this user's shopping cart
    pub in_cart_of: Option<i32>,
    /// Matches nothing, used when a per-user filter is requested anonymously
    pub match_none: bool,
}

impl RecipeFilter {
    fn into_condition(self) -> Condition {
        let mut condition = Condition::all();

        if self.match_none {
            return condition.add(entity::recipe::Column::Id.is_in(Vec::<i32>::new()));
        }

        if !self.tag_slugs.is_empty() {
            let tagged = Query::select()
                .column((entity::recipe_tag::Entity, entity::recipe_tag::Column::RecipeId))
                .from(entity::recipe_tag::Entity)
                .inner_join(
                    entity::tag::Entity,
                    Expr::col((entity::tag::Entity, entity::tag::Column::Id))
                        .equals((entity::recipe_tag::Entity, entity::recipe_tag::Column::TagId)),
                )
                .and_where(Expr::col((entity::tag::Entity, entity::tag::Column::Slug)).is_in(self.tag_slugs))
                .to_owned();

            condition = condition.add(entity::recipe::Column::Id.in_subquery(tagged));
        }

        if let Some(author_id) = self.author_id {
            condition = condition.add(entity::recipe::Column::AuthorId.eq(author_id));
        }

        if let Some(user_id) = self.favorited_by {
            let favorited = Query::select()
                .column(entity::favorite::Column::RecipeId)
                .from(entity::favorite::Entity)
                .and_where(Expr::col(entity::favorite::Column::UserId).eq(user_id))
                .to_owned();

            condition = condition.add(entity::recipe::Column::Id.in_subquery(favorited));
        }

        if let Some(user_id) = self.in_cart_of {
            let carted = Query::select()
                .column(entity::shopping_cart::Column::RecipeId)
                .from(entity::shopping_cart::Entity)
                .and_where(Expr::col(entity::shopping_cart::Column::UserId).eq(user_id))
                .to_owned();

            condition = condition.add(entity::recipe::Column::Id.in_subquery(carted));
        }

        condition
    }
}

pub struct RecipeRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> RecipeRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, author_id: i32, fields: RecipeFields) -> Result<RecipeModel, DbErr> {
        let recipe = entity::recipe::ActiveModel {
            author_id: ActiveValue::Set(author_id),
            name: ActiveValue::Set(fields.name),
            text: ActiveValue::Set(fields.text),
            cooking_time: ActiveValue::Set(fields.cooking_time),
            image: ActiveValue::Set(fields.image),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        recipe.insert(self.db).await
    }

    /// Overwrites the scalar fields of an existing recipe, keeping author and creation time
    pub async fn update(&self, recipe: RecipeModel, fields: RecipeFields) -> Result<RecipeModel, DbErr> {
        let mut recipe: entity::recipe::ActiveModel = recipe.into();
        recipe.name = ActiveValue::Set(fields.name);
        recipe.text = ActiveValue::Set(fields.text);
        recipe.cooking_time = ActiveValue::Set(fields.cooking_time);
        recipe.image = ActiveValue::Set(fields.image);

        recipe.update(self.db).await
    }

    pub async fn get_by_id(&self, recipe_id: i32) -> Result<Option<RecipeModel>, DbErr> {
        entity::prelude::Recipe::find_by_id(recipe_id)
            .one(self.db)
            .await
    }

    /// Deletes a recipe; link rows and collection entries cascade
    pub async fn delete_by_id(&self, recipe_id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Recipe::delete_by_id(recipe_id)
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Replaces the tag set of a recipe
    pub async fn replace_tags(&self, recipe_id: i32, tag_ids: &[i32]) -> Result<(), DbErr> {
        entity::prelude::RecipeTag::delete_many()
            .filter(entity::recipe_tag::Column::RecipeId.eq(recipe_id))
            .exec(self.db)
            .await?;

        if tag_ids.is_empty() {
            return Ok(());
        }

        let links = tag_ids.iter().map(|tag_id| entity::recipe_tag::ActiveModel {
            recipe_id: ActiveValue::Set(recipe_id),
            tag_id: ActiveValue::Set(*tag_id),
        });

        entity::prelude::RecipeTag::insert_many(links)
            .exec_with_returning(self.db)
            .await?;

        Ok(())
    }

    /// Replaces the ingredient lines of a recipe with `(ingredient_id, amount)` pairs
    pub async fn replace_ingredients(
        &self,
        recipe_id: i32,
        ingredients: &[(i32, i16)],
    ) -> Result<(), DbErr> {
        entity::prelude::RecipeIngredient::delete_many()
            .filter(entity::recipe_ingredient::Column::RecipeId.eq(recipe_id))
            .exec(self.db)
            .await?;

        if ingredients.is_empty() {
            return Ok(());
        }

        let lines = ingredients
            .iter()
            .map(|(ingredient_id, amount)| entity::recipe_ingredient::ActiveModel {
                recipe_id: ActiveValue::Set(recipe_id),
                ingredient_id: ActiveValue::Set(*ingredient_id),
                amount: ActiveValue::Set(*amount),
            });

        entity::prelude::RecipeIngredient::insert_many(lines)
            .exec_with_returning(self.db)
            .await?;

        Ok(())
    }

    /// One page of recipes matching `filter`, newest first
    ///
    /// # Arguments
    /// - `filter`: Restrictions to apply
    /// - `page`: Zero-based page index
    /// - `per_page`: Page size
    ///
    /// # Returns
    /// The number of matching recipes and the recipes of the requested page
    pub async fn get_page(
        &self,
        filter: RecipeFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(u64, Vec<RecipeModel>), DbErr> {
        let paginator = entity::prelude::Recipe::find()
            .filter(filter.into_condition())
            .order_by_desc(entity::recipe::Column::CreatedAt)
            .order_by_desc(entity::recipe::Column::Id)
            .paginate(self.db, per_page);

        let total = paginator.num_items().await?;
        let recipes = paginator.fetch_page(page).await?;

        Ok((total, recipes))
    }

    /// Recipes by any of the given authors, newest first
    pub async fn get_by_author_ids(&self, author_ids: &[i32]) -> Result<Vec<RecipeModel>, DbErr> {
        if author_ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::Recipe::find()
            .filter(entity::recipe::Column::AuthorId.is_in(author_ids.iter().copied()))
            .order_by_desc(entity::recipe::Column::CreatedAt)
            .order_by_desc(entity::recipe::Column::Id)
            .all(self.db)
            .await
    }

    /// Number of recipes per author, authors without recipes are absent
    pub async fn count_by_author_ids(&self, author_ids: &[i32]) -> Result<HashMap<i32, u64>, DbErr> {
        if author_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let counts: Vec<(i32, i64)> = entity::prelude::Recipe::find()
            .select_only()
            .column(entity::recipe::Column::AuthorId)
            .column_as(entity::recipe::Column::Id.count(), "recipes_count")
            .filter(entity::recipe::Column::AuthorId.is_in(author_ids.iter().copied()))
            .group_by(entity::recipe::Column::AuthorId)
            .into_tuple()
            .all(self.db)
            .await?;

        Ok(counts
            .into_iter()
            .map(|(author_id, count)| (author_id, Ord::max(count, 0) as u64))
            .collect())
    }
}
