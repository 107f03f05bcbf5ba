use sea_orm::{
    sea_query::{Expr, ExprTrait, Func, LikeExpr, Query},
    ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};

use crate::server::model::db::{IngredientModel, RecipeIngredientModel};

/// One consolidated line of a shopping list
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct IngredientTotal {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

pub struct IngredientRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> IngredientRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// All ingredients ordered by name then measurement unit
    pub async fn get_all(&self) -> Result<Vec<IngredientModel>, DbErr> {
        entity::prelude::Ingredient::find()
            .order_by_asc(entity::ingredient::Column::Name)
            .order_by_asc(entity::ingredient::Column::MeasurementUnit)
            .all(self.db)
            .await
    }

    /// Ingredients whose name contains `needle`, case-insensitively
    ///
    /// Matches are ordered by name then measurement unit. `%`, `_` and `\` in the needle
    /// match literally.
    pub async fn search_by_name(&self, needle: &str) -> Result<Vec<IngredientModel>, DbErr> {
        let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));

        entity::prelude::Ingredient::find()
            .filter(
                Expr::expr(Func::lower(Expr::col((
                    entity::ingredient::Entity,
                    entity::ingredient::Column::Name,
                ))))
                .like(LikeExpr::new(pattern).escape('\\')),
            )
            .order_by_asc(entity::ingredient::Column::Name)
            .order_by_asc(entity::ingredient::Column::MeasurementUnit)
            .all(self.db)
            .await
    }

    pub async fn get_by_id(&self, ingredient_id: i32) -> Result<Option<IngredientModel>, DbErr> {
        entity::prelude::Ingredient::find_by_id(ingredient_id)
            .one(self.db)
            .await
    }

    /// Ingredients whose ID is in `ingredient_ids`; unknown IDs are absent from the result
    pub async fn get_many(&self, ingredient_ids: &[i32]) -> Result<Vec<IngredientModel>, DbErr> {
        entity::prelude::Ingredient::find()
            .filter(entity::ingredient::Column::Id.is_in(ingredient_ids.iter().copied()))
            .all(self.db)
            .await
    }

    /// Ingredient lines of the provided recipes joined with their ingredient, ordered by
    /// ingredient name
    pub async fn get_lines_for_recipes(
        &self,
        recipe_ids: &[i32],
    ) -> Result<Vec<(RecipeIngredientModel, IngredientModel)>, DbErr> {
        if recipe_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = entity::prelude::RecipeIngredient::find()
            .filter(entity::recipe_ingredient::Column::RecipeId.is_in(recipe_ids.iter().copied()))
            .find_also_related(entity::prelude::Ingredient)
            .order_by_asc(entity::ingredient::Column::Name)
            .all(self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(line, ingredient)| ingredient.map(|ingredient| (line, ingredient)))
            .collect())
    }

    /// Sums the amount of every ingredient across all recipes in the user's shopping cart
    ///
    /// Lines are grouped by ingredient, so the same name with different measurement units
    /// stays separate. Ordered by ingredient name.
    pub async fn get_shopping_cart_totals(&self, user_id: i32) -> Result<Vec<IngredientTotal>, DbErr> {
        let cart_recipes = Query::select()
            .column(entity::shopping_cart::Column::RecipeId)
            .from(entity::shopping_cart::Entity)
            .and_where(Expr::col(entity::shopping_cart::Column::UserId).eq(user_id))
            .to_owned();

        entity::prelude::RecipeIngredient::find()
            .select_only()
            .column(entity::ingredient::Column::Name)
            .column(entity::ingredient::Column::MeasurementUnit)
            .column_as(entity::recipe_ingredient::Column::Amount.sum(), "amount")
            .join(
                JoinType::InnerJoin,
                entity::recipe_ingredient::Relation::Ingredient.def(),
            )
            .filter(entity::recipe_ingredient::Column::RecipeId.in_subquery(cart_recipes))
            .group_by(entity::ingredient::Column::Id)
            .group_by(entity::ingredient::Column::Name)
            .group_by(entity::ingredient::Column::MeasurementUnit)
            .order_by_asc(entity::ingredient::Column::Name)
            .order_by_asc(entity::ingredient::Column::MeasurementUnit)
            .into_model::<IngredientTotal>()
            .all(self.db)
            .await
    }

    /// `(name, measurement_unit)` pairs already stored, used to skip duplicates when loading
    /// fixtures
    pub async fn get_name_unit_pairs(&self) -> Result<Vec<(String, String)>, DbErr> {
        let ingredients = entity::prelude::Ingredient::find().all(self.db).await?;

        Ok(ingredients
            .into_iter()
            .map(|ingredient| (ingredient.name, ingredient.measurement_unit))
            .collect())
    }

    /// Bulk insert ingredients given as `(name, measurement_unit)`
    pub async fn insert_many(&self, ingredients: Vec<(String, String)>) -> Result<(), DbErr> {
        if ingredients.is_empty() {
            return Ok(());
        }

        let models = ingredients
            .into_iter()
            .map(|(name, measurement_unit)| entity::ingredient::ActiveModel {
                name: ActiveValue::Set(name),
                measurement_unit: ActiveValue::Set(measurement_unit),
                ..Default::default()
            });

        entity::prelude::Ingredient::insert_many(models)
            .exec_with_returning(self.db)
            .await?;

        Ok(())
    }
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
