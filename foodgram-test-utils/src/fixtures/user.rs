use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use chrono::Utc;
use sea_orm::{ActiveValue, EntityTrait};

use crate::{constant::TEST_PASSWORD, error::TestError, TestContext};

impl TestContext {
    pub fn user<'a>(&'a mut self) -> UserFixtures<'a> {
        UserFixtures { context: self }
    }
}

pub struct UserFixtures<'a> {
    context: &'a mut TestContext,
}

impl<'a> UserFixtures<'a> {
    /// Insert a user whose email is `<username>@example.com` and whose password is
    /// [`TEST_PASSWORD`].
    pub async fn insert_user(&self, username: &str) -> Result<entity::foodgram_user::Model, TestError> {
        self.insert(username, false).await
    }

    /// Insert a staff user allowed to modify any recipe.
    pub async fn insert_staff_user(
        &self,
        username: &str,
    ) -> Result<entity::foodgram_user::Model, TestError> {
        self.insert(username, true).await
    }

    async fn insert(
        &self,
        username: &str,
        is_staff: bool,
    ) -> Result<entity::foodgram_user::Model, TestError> {
        let salt = SaltString::generate(&mut OsRng);
        let password = Argon2::default()
            .hash_password(TEST_PASSWORD.as_bytes(), &salt)
            .map_err(|e| TestError::PasswordHash(e.to_string()))?
            .to_string();

        Ok(
            entity::prelude::FoodgramUser::insert(entity::foodgram_user::ActiveModel {
                email: ActiveValue::Set(format!("{}@example.com", username)),
                username: ActiveValue::Set(username.to_string()),
                first_name: ActiveValue::Set("Test".to_string()),
                last_name: ActiveValue::Set(username.to_string()),
                password: ActiveValue::Set(password),
                is_staff: ActiveValue::Set(is_staff),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .exec_with_returning(&self.context.db)
            .await?,
        )
    }

    /// Insert an auth token with the given key for a user.
    pub async fn insert_token(
        &self,
        user_id: i32,
        key: &str,
    ) -> Result<entity::auth_token::Model, TestError> {
        Ok(
            entity::prelude::AuthToken::insert(entity::auth_token::ActiveModel {
                key: ActiveValue::Set(key.to_string()),
                user_id: ActiveValue::Set(user_id),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
            })
            .exec_with_returning(&self.context.db)
            .await?,
        )
    }

    /// Subscribe `user_id` to `author_id`.
    pub async fn insert_subscription(
        &self,
        user_id: i32,
        author_id: i32,
    ) -> Result<entity::subscription::Model, TestError> {
        Ok(
            entity::prelude::Subscription::insert(entity::subscription::ActiveModel {
                user_id: ActiveValue::Set(user_id),
                author_id: ActiveValue::Set(author_id),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
            })
            .exec_with_returning(&self.context.db)
            .await?,
        )
    }
}
