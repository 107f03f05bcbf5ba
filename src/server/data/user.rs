use chrono::Utc;
use sea_orm::{
    sea_query::{Expr, ExprTrait, Query},
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::server::model::db::UserModel;

/// Fields of a new account; the password must already be hashed
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
}

pub struct UserRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    /// Creates a new instance of [`UserRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, user: NewUser) -> Result<UserModel, DbErr> {
        let user = entity::foodgram_user::ActiveModel {
            email: ActiveValue::Set(user.email),
            username: ActiveValue::Set(user.username),
            first_name: ActiveValue::Set(user.first_name),
            last_name: ActiveValue::Set(user.last_name),
            password: ActiveValue::Set(user.password_hash),
            is_staff: ActiveValue::Set(false),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        user.insert(self.db).await
    }

    pub async fn get_by_id(&self, user_id: i32) -> Result<Option<UserModel>, DbErr> {
        entity::prelude::FoodgramUser::find_by_id(user_id)
            .one(self.db)
            .await
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<UserModel>, DbErr> {
        entity::prelude::FoodgramUser::find()
            .filter(entity::foodgram_user::Column::Email.eq(email))
            .one(self.db)
            .await
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<UserModel>, DbErr> {
        entity::prelude::FoodgramUser::find()
            .filter(entity::foodgram_user::Column::Username.eq(username))
            .one(self.db)
            .await
    }

    pub async fn get_many(&self, user_ids: &[i32]) -> Result<Vec<UserModel>, DbErr> {
        entity::prelude::FoodgramUser::find()
            .filter(entity::foodgram_user::Column::Id.is_in(user_ids.iter().copied()))
            .all(self.db)
            .await
    }

    /// One page of all users ordered by username
    ///
    /// # Arguments
    /// - `page`: Zero-based page index
    /// - `per_page`: Page size
    ///
    /// # Returns
    /// The total number of users and the users of the requested page
    pub async fn get_page(&self, page: u64, per_page: u64) -> Result<(u64, Vec<UserModel>), DbErr> {
        let paginator = entity::prelude::FoodgramUser::find()
            .order_by_asc(entity::foodgram_user::Column::Username)
            .order_by_asc(entity::foodgram_user::Column::Id)
            .paginate(self.db, per_page);

        let total = paginator.num_items().await?;
        let users = paginator.fetch_page(page).await?;

        Ok((total, users))
    }

    /// One page of the authors `subscriber_id` follows, ordered by username
    pub async fn get_subscribed_authors_page(
        &self,
        subscriber_id: i32,
        page: u64,
        per_page: u64,
    ) -> Result<(u64, Vec<UserModel>), DbErr> {
        let followed = Query::select()
            .column(entity::subscription::Column::AuthorId)
            .from(entity::subscription::Entity)
            .and_where(Expr::col(entity::subscription::Column::UserId).eq(subscriber_id))
            .to_owned();

        let paginator = entity::prelude::FoodgramUser::find()
            .filter(entity::foodgram_user::Column::Id.in_subquery(followed))
            .order_by_asc(entity::foodgram_user::Column::Username)
            .order_by_asc(entity::foodgram_user::Column::Id)
            .paginate(self.db, per_page);

        let total = paginator.num_items().await?;
        let users = paginator.fetch_page(page).await?;

        Ok((total, users))
    }

    pub async fn update_password(&self, user: UserModel, password_hash: String) -> Result<UserModel, DbErr> {
        let mut user: entity::foodgram_user::ActiveModel = user.into();
        user.password = ActiveValue::Set(password_hash);

        user.update(self.db).await
    }
}
