use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
};

use crate::server::model::db::{AuthTokenModel, UserModel};

pub struct AuthTokenRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AuthTokenRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, user_id: i32, key: String) -> Result<AuthTokenModel, DbErr> {
        let token = entity::auth_token::ActiveModel {
            key: ActiveValue::Set(key),
            user_id: ActiveValue::Set(user_id),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
        };

        token.insert(self.db).await
    }

    pub async fn get_by_user_id(&self, user_id: i32) -> Result<Option<AuthTokenModel>, DbErr> {
        entity::prelude::AuthToken::find()
            .filter(entity::auth_token::Column::UserId.eq(user_id))
            .one(self.db)
            .await
    }

    /// Resolves a token key to the user owning it
    pub async fn get_user_by_key(&self, key: &str) -> Result<Option<UserModel>, DbErr> {
        let token = entity::prelude::AuthToken::find_by_id(key.to_string())
            .find_also_related(entity::prelude::FoodgramUser)
            .one(self.db)
            .await?;

        Ok(token.and_then(|(_, user)| user))
    }

    /// Deletes the user's token, returning whether one existed
    pub async fn delete_by_user_id(&self, user_id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::AuthToken::delete_many()
            .filter(entity::auth_token::Column::UserId.eq(user_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
