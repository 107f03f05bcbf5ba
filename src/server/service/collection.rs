//! Adding to and removing from per-user collections.
//!
//! Favorites, the shopping cart and subscriptions share one flow: resolve the target, run
//! collection-specific checks, refuse duplicates, then insert. The kinds differ in how a
//! missing target is reported and in the checks they run, which [`CollectionKind`] captures.

use std::{future::Future, marker::PhantomData};

use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};

use crate::server::{
    data::{
        collection::{
            FavoriteRecipes, FollowedAuthors, ShoppingCartRecipes, UserCollection,
            UserCollectionRepository,
        },
        recipe::RecipeRepository,
        user::UserRepository,
    },
    error::{
        validation::{ValidationError, NON_FIELD_ERRORS},
        Error,
    },
    model::db::{RecipeModel, UserModel},
    service::auth::is_unique_violation,
};

pub trait CollectionKind: UserCollection {
    type Target: Send;

    /// Message returned when the entry already exists
    const DUPLICATE_MESSAGE: &'static str;
    /// Message returned when removing an entry that doesn't exist
    const ABSENT_MESSAGE: &'static str;

    fn resolve_target<C: ConnectionTrait>(
        db: &C,
        target_id: i32,
    ) -> impl Future<Output = Result<Option<Self::Target>, DbErr>> + Send;

    /// Error for adding a target that doesn't exist
    fn missing_target(target_id: i32) -> Error;

    /// Checks run before the duplicate check when adding
    fn validate(_user: &UserModel, _target: &Self::Target) -> Result<(), ValidationError> {
        Ok(())
    }
}

fn missing_recipe(recipe_id: i32) -> Error {
    ValidationError::field(
        "recipe",
        format!("Invalid pk \"{}\" - object does not exist.", recipe_id),
    )
    .into()
}

impl CollectionKind for FavoriteRecipes {
    type Target = RecipeModel;

    const DUPLICATE_MESSAGE: &'static str = "Can not add the same recipe twice.";
    const ABSENT_MESSAGE: &'static str = "Recipe is not in favorites.";

    async fn resolve_target<C: ConnectionTrait>(db: &C, recipe_id: i32) -> Result<Option<RecipeModel>, DbErr> {
        RecipeRepository::new(db).get_by_id(recipe_id).await
    }

    fn missing_target(recipe_id: i32) -> Error {
        missing_recipe(recipe_id)
    }
}

impl CollectionKind for ShoppingCartRecipes {
    type Target = RecipeModel;

    const DUPLICATE_MESSAGE: &'static str = "Can not add the same recipe twice.";
    const ABSENT_MESSAGE: &'static str = "Recipe is not in the shopping cart.";

    async fn resolve_target<C: ConnectionTrait>(db: &C, recipe_id: i32) -> Result<Option<RecipeModel>, DbErr> {
        RecipeRepository::new(db).get_by_id(recipe_id).await
    }

    fn missing_target(recipe_id: i32) -> Error {
        missing_recipe(recipe_id)
    }
}

impl CollectionKind for FollowedAuthors {
    type Target = UserModel;

    const DUPLICATE_MESSAGE: &'static str = "You already subscribed to this author.";
    const ABSENT_MESSAGE: &'static str = "You are not subscribed to this author.";

    async fn resolve_target<C: ConnectionTrait>(db: &C, author_id: i32) -> Result<Option<UserModel>, DbErr> {
        UserRepository::new(db).get_by_id(author_id).await
    }

    fn missing_target(author_id: i32) -> Error {
        Error::NotFound(format!("Author {}", author_id))
    }

    fn validate(user: &UserModel, author: &UserModel) -> Result<(), ValidationError> {
        if user.id == author.id {
            return Err(ValidationError::field(
                "author",
                "Users cannot subscribe to themselves",
            ));
        }
        Ok(())
    }
}

pub struct CollectionService<'a, K: CollectionKind> {
    db: &'a DatabaseConnection,
    _kind: PhantomData<K>,
}

impl<'a, K: CollectionKind> CollectionService<'a, K> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            _kind: PhantomData,
        }
    }

    /// Adds the target to the user's collection
    ///
    /// # Returns
    /// - `Ok(Target)`: The added recipe or author
    /// - `Err(Error::ValidationError)`: Duplicate entry, failed collection check, or missing
    ///   recipe
    /// - `Err(Error::NotFound)`: Missing author
    pub async fn add(&self, user: &UserModel, target_id: i32) -> Result<K::Target, Error> {
        let Some(target) = K::resolve_target(self.db, target_id).await? else {
            return Err(K::missing_target(target_id));
        };

        K::validate(user, &target)?;

        let repository = UserCollectionRepository::<_, K>::new(self.db);
        if repository.contains(user.id, target_id).await? {
            return Err(ValidationError::field(NON_FIELD_ERRORS, K::DUPLICATE_MESSAGE).into());
        }

        match repository.add(user.id, target_id).await {
            Ok(()) => Ok(target),
            // A concurrent request inserted the same entry after the check above
            Err(err) if is_unique_violation(&err) => {
                Err(ValidationError::field(NON_FIELD_ERRORS, K::DUPLICATE_MESSAGE).into())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Removes the target from the user's collection
    ///
    /// # Returns
    /// - `Ok(())`: Entry removed
    /// - `Err(Error::NotFound)`: The target doesn't exist
    /// - `Err(Error::ValidationError)`: The target isn't in the collection
    pub async fn remove(&self, user: &UserModel, target_id: i32) -> Result<(), Error> {
        if K::resolve_target(self.db, target_id).await?.is_none() {
            return Err(Error::NotFound(format!("Collection target {}", target_id)));
        }

        let removed = UserCollectionRepository::<_, K>::new(self.db)
            .remove(user.id, target_id)
            .await?;

        if !removed {
            return Err(ValidationError::field(NON_FIELD_ERRORS, K::ABSENT_MESSAGE).into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use foodgram_test_utils::prelude::*;

    use super::*;

    mod favorites {
        use super::*;

        /// Expect the second add of the same recipe to be a validation error
        #[tokio::test]
        async fn add_twice() -> Result<(), TestError> {
            let mut test = TestBuilder::new().with_foodgram_tables().build().await?;
            let alice = test.user().insert_user("alice").await?;
            let soup = test.recipe().insert_recipe(alice.id, "Soup", &[], &[]).await?;
            let service = CollectionService::<FavoriteRecipes>::new(&test.db);

            let first = service.add(&alice, soup.id).await;
            let second = service.add(&alice, soup.id).await;

            assert!(first.is_ok());
            let Err(Error::ValidationError(errors)) = second else {
                panic!("expected validation error");
            };
            assert_eq!(
                errors.errors()[NON_FIELD_ERRORS],
                vec![FavoriteRecipes::DUPLICATE_MESSAGE]
            );

            Ok(())
        }

        /// Expect a missing recipe to be a field error on add and NotFound on remove
        #[tokio::test]
        async fn missing_recipe() -> Result<(), TestError> {
            let mut test = TestBuilder::new().with_foodgram_tables().build().await?;
            let alice = test.user().insert_user("alice").await?;
            let service = CollectionService::<ShoppingCartRecipes>::new(&test.db);

            let added = service.add(&alice, 42).await;
            let removed = service.remove(&alice, 42).await;

            assert!(matches!(added, Err(Error::ValidationError(ref e)) if e.contains("recipe")));
            assert!(matches!(removed, Err(Error::NotFound(_))));

            Ok(())
        }

        /// Expect removing an absent entry to be a validation error
        #[tokio::test]
        async fn remove_absent() -> Result<(), TestError> {
            let mut test = TestBuilder::new().with_foodgram_tables().build().await?;
            let alice = test.user().insert_user("alice").await?;
            let soup = test.recipe().insert_recipe(alice.id, "Soup", &[], &[]).await?;
            test.recipe().insert_favorite(alice.id, soup.id).await?;
            let service = CollectionService::<FavoriteRecipes>::new(&test.db);

            service.remove(&alice, soup.id).await.unwrap();
            let again = service.remove(&alice, soup.id).await;

            assert!(matches!(again, Err(Error::ValidationError(_))));

            Ok(())
        }
    }

    mod subscriptions {
        use super::*;

        /// Expect self-subscription to be rejected even when no subscription exists
        #[tokio::test]
        async fn rejects_self() -> Result<(), TestError> {
            let mut test = TestBuilder::new().with_foodgram_tables().build().await?;
            let alice = test.user().insert_user("alice").await?;

            let result = CollectionService::<FollowedAuthors>::new(&test.db)
                .add(&alice, alice.id)
                .await;

            assert!(matches!(result, Err(Error::ValidationError(ref e)) if e.contains("author")));

            Ok(())
        }

        /// Expect NotFound for a nonexistent author
        #[tokio::test]
        async fn missing_author() -> Result<(), TestError> {
            let mut test = TestBuilder::new().with_foodgram_tables().build().await?;
            let alice = test.user().insert_user("alice").await?;

            let result = CollectionService::<FollowedAuthors>::new(&test.db)
                .add(&alice, alice.id + 1)
                .await;

            assert!(matches!(result, Err(Error::NotFound(_))));

            Ok(())
        }

        /// Expect a duplicate subscription to be a validation error
        #[tokio::test]
        async fn add_twice() -> Result<(), TestError> {
            let mut test = TestBuilder::new().with_foodgram_tables().build().await?;
            let alice = test.user().insert_user("alice").await?;
            let bob = test.user().insert_user("bob").await?;
            let service = CollectionService::<FollowedAuthors>::new(&test.db);

            let author = service.add(&alice, bob.id).await.unwrap();
            let again = service.add(&alice, bob.id).await;

            assert_eq!(author.id, bob.id);
            assert!(matches!(again, Err(Error::ValidationError(_))));

            Ok(())
        }
    }
}
