//! User accounts, profiles and subscriptions listing.

use sea_orm::DatabaseConnection;

use crate::{
    model::user::{CreatedUserDto, SetPasswordDto, SignupDto, UserDetailDto, UserDto},
    server::{
        data::user::{NewUser, UserRepository},
        error::{validation::ValidationError, Error},
        model::db::UserModel,
        service::{
            auth::{hash_password, is_unique_violation, required, verify_password},
            image::ImageStore,
            pagination::{Page, PageRequest},
            presenter::{created_user_dto, Presenter},
        },
    },
};

pub const EMAIL_MAX_LENGTH: usize = 254;
pub const NAME_MAX_LENGTH: usize = 150;
pub const PASSWORD_MIN_LENGTH: usize = 8;

pub struct UserService<'a> {
    db: &'a DatabaseConnection,
    images: &'a ImageStore,
}

impl<'a> UserService<'a> {
    /// Creates a new instance of [`UserService`]
    ///
    /// # Arguments
    /// - `db` - Database connection reference
    /// - `images` - Media store, used to render recipe image URLs in author previews
    pub fn new(db: &'a DatabaseConnection, images: &'a ImageStore) -> Self {
        Self { db, images }
    }

    /// Registers a new account
    ///
    /// # Returns
    /// - `Ok(CreatedUserDto)`: The created account
    /// - `Err(Error::ValidationError)`: A field is missing, malformed, or already taken
    pub async fn signup(&self, payload: SignupDto) -> Result<CreatedUserDto, Error> {
        let mut errors = ValidationError::new();
        let email = required(&mut errors, "email", payload.email);
        let username = required(&mut errors, "username", payload.username);
        let first_name = required(&mut errors, "first_name", payload.first_name);
        let last_name = required(&mut errors, "last_name", payload.last_name);
        let password = required(&mut errors, "password", payload.password);

        if !email.is_empty() {
            validate_email(&mut errors, &email);
        }
        if !username.is_empty() {
            validate_username(&mut errors, &username);
        }
        check_max_length(&mut errors, "first_name", &first_name, NAME_MAX_LENGTH);
        check_max_length(&mut errors, "last_name", &last_name, NAME_MAX_LENGTH);
        if !password.is_empty() {
            validate_password(&mut errors, "password", &password);
        }

        let repository = UserRepository::new(self.db);
        if !errors.contains("email") && !email.is_empty() {
            self.check_email_available(&mut errors, &email).await?;
        }
        if !errors.contains("username") && !username.is_empty() {
            self.check_username_available(&mut errors, &username).await?;
        }
        errors.into_result()?;

        let new_user = NewUser {
            email: email.clone(),
            username: username.clone(),
            first_name,
            last_name,
            password_hash: hash_password(&password)?,
        };

        let user = match repository.create(new_user).await {
            Ok(user) => user,
            // Lost a race against a concurrent signup with the same email or username
            Err(err) if is_unique_violation(&err) => {
                let mut errors = ValidationError::new();
                self.check_email_available(&mut errors, &email).await?;
                self.check_username_available(&mut errors, &username).await?;
                if errors.is_empty() {
                    return Err(err.into());
                }
                return Err(errors.into());
            }
            Err(err) => return Err(err.into()),
        };

        tracing::info!(user_id = %user.id, username = %user.username, "Registered user");

        Ok(created_user_dto(user))
    }

    async fn check_email_available(&self, errors: &mut ValidationError, email: &str) -> Result<(), Error> {
        if UserRepository::new(self.db).get_by_email(email).await?.is_some() {
            errors.add("email", "A user with that email already exists.");
        }
        Ok(())
    }

    async fn check_username_available(
        &self,
        errors: &mut ValidationError,
        username: &str,
    ) -> Result<(), Error> {
        if UserRepository::new(self.db)
            .get_by_username(username)
            .await?
            .is_some()
        {
            errors.add("username", "A user with that username already exists.");
        }
        Ok(())
    }

    /// Lists all users ordered by username
    pub async fn list(&self, viewer: Option<&UserModel>, request: PageRequest) -> Result<Page<UserDto>, Error> {
        let (count, users) = UserRepository::new(self.db)
            .get_page(request.index(), request.size)
            .await?;

        let dtos = Presenter::new(self.db, self.images).users(viewer, &users).await?;

        Page::new(request, count, dtos)
    }

    pub async fn get(&self, viewer: Option<&UserModel>, user_id: i32) -> Result<UserDto, Error> {
        let Some(user) = UserRepository::new(self.db).get_by_id(user_id).await? else {
            return Err(Error::NotFound(format!("User {}", user_id)));
        };

        Presenter::new(self.db, self.images).user(viewer, &user).await
    }

    /// Changes the password after verifying the current one
    pub async fn set_password(&self, user: UserModel, payload: SetPasswordDto) -> Result<(), Error> {
        let mut errors = ValidationError::new();
        let new_password = required(&mut errors, "new_password", payload.new_password);
        let current_password = required(&mut errors, "current_password", payload.current_password);

        if !new_password.is_empty() {
            validate_password(&mut errors, "new_password", &new_password);
        }
        if !current_password.is_empty() && !verify_password(&current_password, &user.password) {
            errors.add("current_password", "Invalid password.");
        }
        errors.into_result()?;

        let user_id = user.id;
        UserRepository::new(self.db)
            .update_password(user, hash_password(&new_password)?)
            .await?;

        tracing::debug!(user_id = %user_id, "Changed password");

        Ok(())
    }

    /// Authors the user follows with a preview of their recipes
    ///
    /// # Arguments
    /// - `user`: The subscriber
    /// - `request`: Page of authors to return
    /// - `recipes_limit`: Maximum recipes listed per author, `None` lists all
    pub async fn subscriptions(
        &self,
        user: &UserModel,
        request: PageRequest,
        recipes_limit: Option<usize>,
    ) -> Result<Page<UserDetailDto>, Error> {
        let (count, authors) = UserRepository::new(self.db)
            .get_subscribed_authors_page(user.id, request.index(), request.size)
            .await?;

        let dtos = Presenter::new(self.db, self.images)
            .user_details(Some(user), &authors, recipes_limit)
            .await?;

        Page::new(request, count, dtos)
    }
}

fn check_max_length(errors: &mut ValidationError, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.add(
            field,
            format!("Ensure this field has no more than {} characters.", max),
        );
    }
}

fn validate_email(errors: &mut ValidationError, email: &str) {
    check_max_length(errors, "email", email, EMAIL_MAX_LENGTH);

    let valid = match email.rsplit_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        errors.add("email", "Enter a valid email address.");
    }
}

fn validate_username(errors: &mut ValidationError, username: &str) {
    check_max_length(errors, "username", username, NAME_MAX_LENGTH);

    let valid = username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-'));

    if !valid {
        errors.add(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        );
    }
}

fn validate_password(errors: &mut ValidationError, field: &str, password: &str) {
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        errors.add(
            field,
            format!(
                "This password is too short. It must contain at least {} characters.",
                PASSWORD_MIN_LENGTH
            ),
        );
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        errors.add(field, "This password is entirely numeric.");
    }
}
