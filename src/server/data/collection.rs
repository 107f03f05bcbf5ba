//! Per-user collections: favorite recipes, shopping cart recipes and followed authors.
//!
//! All three are `(user_id, target_id)` link tables with a unique pair, so they share one
//! repository parameterized by a [`UserCollection`] marker type.

use std::{collections::HashSet, future::Future, marker::PhantomData};

use chrono::Utc;
use sea_orm::{
    ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QuerySelect,
};

/// A `(user, target)` link table
pub trait UserCollection {
    type Entity: EntityTrait;

    /// Column referencing the owning user
    fn user_column() -> <Self::Entity as EntityTrait>::Column;

    /// Column referencing the collected recipe or author
    fn target_column() -> <Self::Entity as EntityTrait>::Column;

    fn insert_entry<C: ConnectionTrait>(
        db: &C,
        user_id: i32,
        target_id: i32,
    ) -> impl Future<Output = Result<(), DbErr>> + Send;
}

/// Recipes a user marked as favorite
pub struct FavoriteRecipes;

/// Recipes in a user's shopping cart
pub struct ShoppingCartRecipes;

/// Authors a user is subscribed to
pub struct FollowedAuthors;

impl UserCollection for FavoriteRecipes {
    type Entity = entity::favorite::Entity;

    fn user_column() -> entity::favorite::Column {
        entity::favorite::Column::UserId
    }

    fn target_column() -> entity::favorite::Column {
        entity::favorite::Column::RecipeId
    }

    async fn insert_entry<C: ConnectionTrait>(db: &C, user_id: i32, recipe_id: i32) -> Result<(), DbErr> {
        entity::prelude::Favorite::insert(entity::favorite::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            recipe_id: ActiveValue::Set(recipe_id),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
        })
        .exec_without_returning(db)
        .await?;

        Ok(())
    }
}

impl UserCollection for ShoppingCartRecipes {
    type Entity = entity::shopping_cart::Entity;

    fn user_column() -> entity::shopping_cart::Column {
        entity::shopping_cart::Column::UserId
    }

    fn target_column() -> entity::shopping_cart::Column {
        entity::shopping_cart::Column::RecipeId
    }

    async fn insert_entry<C: ConnectionTrait>(db: &C, user_id: i32, recipe_id: i32) -> Result<(), DbErr> {
        entity::prelude::ShoppingCart::insert(entity::shopping_cart::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            recipe_id: ActiveValue::Set(recipe_id),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
        })
        .exec_without_returning(db)
        .await?;

        Ok(())
    }
}

impl UserCollection for FollowedAuthors {
    type Entity = entity::subscription::Entity;

    fn user_column() -> entity::subscription::Column {
        entity::subscription::Column::UserId
    }

    fn target_column() -> entity::subscription::Column {
        entity::subscription::Column::AuthorId
    }

    async fn insert_entry<C: ConnectionTrait>(db: &C, user_id: i32, author_id: i32) -> Result<(), DbErr> {
        entity::prelude::Subscription::insert(entity::subscription::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            author_id: ActiveValue::Set(author_id),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
        })
        .exec_without_returning(db)
        .await?;

        Ok(())
    }
}

pub struct UserCollectionRepository<'a, C: ConnectionTrait, R: UserCollection> {
    db: &'a C,
    _collection: PhantomData<R>,
}

impl<'a, C: ConnectionTrait, R: UserCollection> UserCollectionRepository<'a, C, R> {
    pub fn new(db: &'a C) -> Self {
        Self {
            db,
            _collection: PhantomData,
        }
    }

    fn entry(user_id: i32, target_id: i32) -> Condition {
        Condition::all()
            .add(R::user_column().eq(user_id))
            .add(R::target_column().eq(target_id))
    }

    pub async fn contains(&self, user_id: i32, target_id: i32) -> Result<bool, DbErr> {
        let entry = R::Entity::find()
            .filter(Self::entry(user_id, target_id))
            .one(self.db)
            .await?;

        Ok(entry.is_some())
    }

    pub async fn add(&self, user_id: i32, target_id: i32) -> Result<(), DbErr> {
        R::insert_entry(self.db, user_id, target_id).await
    }

    /// Removes the entry, returning whether it existed
    pub async fn remove(&self, user_id: i32, target_id: i32) -> Result<bool, DbErr> {
        let result = R::Entity::delete_many()
            .filter(Self::entry(user_id, target_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// The subset of `candidate_ids` present in the user's collection
    pub async fn filter_present(
        &self,
        user_id: i32,
        candidate_ids: &[i32],
    ) -> Result<HashSet<i32>, DbErr> {
        if candidate_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let present: Vec<i32> = R::Entity::find()
            .select_only()
            .column(R::target_column())
            .filter(R::user_column().eq(user_id))
            .filter(R::target_column().is_in(candidate_ids.iter().copied()))
            .into_tuple()
            .all(self.db)
            .await?;

        Ok(present.into_iter().collect())
    }
}
