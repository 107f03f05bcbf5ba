//! Password hashing and token authentication.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::Rng;
use sea_orm::{DatabaseConnection, DbErr, SqlErr};

use crate::server::{
    data::{auth_token::AuthTokenRepository, user::UserRepository},
    error::{auth::AuthError, validation::ValidationError, Error},
    model::db::UserModel,
};

/// Length in hex characters of generated token keys
pub const TOKEN_KEY_LENGTH: usize = 40;

pub fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::InternalError(format!("Failed to hash password: {}", e)))
}

/// Checks a password against a stored hash; an unparsable hash never verifies
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(password_hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Random 40 character lowercase hex token key
pub fn generate_token_key() -> String {
    let bytes: [u8; TOKEN_KEY_LENGTH / 2] = rand::rng().random();

    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

pub struct AuthService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AuthService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Resolves a token key to its user
    pub async fn authenticate(&self, key: &str) -> Result<Option<UserModel>, Error> {
        Ok(AuthTokenRepository::new(self.db).get_user_by_key(key).await?)
    }

    /// Exchanges email and password for the user's token
    ///
    /// A user has at most one token; logging in again returns the existing key.
    ///
    /// # Returns
    /// - `Ok(String)`: The token key
    /// - `Err(Error::ValidationError)`: Email or password missing
    /// - `Err(Error::AuthError(AuthError::InvalidCredentials))`: Unknown email or wrong password
    pub async fn login(&self, email: Option<String>, password: Option<String>) -> Result<String, Error> {
        let mut errors = ValidationError::new();
        let email = required(&mut errors, "email", email);
        let password = required(&mut errors, "password", password);
        errors.into_result()?;

        let user = UserRepository::new(self.db).get_by_email(&email).await?;
        let Some(user) = user.filter(|user| verify_password(&password, &user.password)) else {
            return Err(AuthError::InvalidCredentials.into());
        };

        let token_repository = AuthTokenRepository::new(self.db);
        if let Some(token) = token_repository.get_by_user_id(user.id).await? {
            return Ok(token.key);
        }

        match token_repository.create(user.id, generate_token_key()).await {
            Ok(token) => Ok(token.key),
            // A concurrent login created the token first
            Err(err) if is_unique_violation(&err) => token_repository
                .get_by_user_id(user.id)
                .await?
                .map(|token| token.key)
                .ok_or_else(|| Error::InternalError(format!("Token for user {} vanished", user.id))),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn logout(&self, user_id: i32) -> Result<(), Error> {
        let deleted = AuthTokenRepository::new(self.db)
            .delete_by_user_id(user_id)
            .await?;

        tracing::debug!(user_id = %user_id, deleted = %deleted, "Logged out user");

        Ok(())
    }
}

pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Takes a required, non-blank string field, recording an error when absent
pub(crate) fn required(errors: &mut ValidationError, field: &str, value: Option<String>) -> String {
    match value {
        Some(value) if !value.trim().is_empty() => value,
        Some(_) => {
            errors.add(field, "This field may not be blank.");
            String::new()
        }
        None => {
            errors.add(field, "This field is required.");
            String::new()
        }
    }
}
