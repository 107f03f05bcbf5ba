//! Assembles response DTOs from database models.
//!
//! The per-viewer flags and the related rows of a page are loaded with one `IN` query each,
//! so rendering a page costs a fixed number of queries regardless of its size. Anonymous
//! viewers skip the flag queries and see every flag as false.

use std::collections::{HashMap, HashSet};

use sea_orm::DatabaseConnection;

use crate::{
    model::{
        recipe::{IngredientDto, RecipeBasicDto, RecipeDto, RecipeIngredientDto, TagDto},
        user::{CreatedUserDto, UserDetailDto, UserDto},
    },
    server::{
        data::{
            collection::{
                FavoriteRecipes, FollowedAuthors, ShoppingCartRecipes, UserCollection,
                UserCollectionRepository,
            },
            ingredient::IngredientRepository,
            recipe::RecipeRepository,
            tag::TagRepository,
            user::UserRepository,
        },
        error::Error,
        model::db::{IngredientModel, RecipeModel, TagModel, UserModel},
        service::image::ImageStore,
    },
};

pub fn tag_dto(tag: TagModel) -> TagDto {
    TagDto {
        id: tag.id,
        name: tag.name,
        color: tag.color,
        slug: tag.slug,
    }
}

pub fn ingredient_dto(ingredient: IngredientModel) -> IngredientDto {
    IngredientDto {
        id: ingredient.id,
        name: ingredient.name,
        measurement_unit: ingredient.measurement_unit,
    }
}

pub fn user_dto(user: &UserModel, is_subscribed: bool) -> UserDto {
    UserDto {
        id: user.id,
        email: user.email.clone(),
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        is_subscribed,
    }
}

pub fn created_user_dto(user: UserModel) -> CreatedUserDto {
    CreatedUserDto {
        id: user.id,
        email: user.email,
        username: user.username,
        first_name: user.first_name,
        last_name: user.last_name,
    }
}

pub struct Presenter<'a> {
    db: &'a DatabaseConnection,
    images: &'a ImageStore,
}

impl<'a> Presenter<'a> {
    pub fn new(db: &'a DatabaseConnection, images: &'a ImageStore) -> Self {
        Self { db, images }
    }

    pub fn recipe_basic(&self, recipe: &RecipeModel) -> RecipeBasicDto {
        RecipeBasicDto {
            id: recipe.id,
            name: recipe.name.clone(),
            image: self.images.url(&recipe.image),
            cooking_time: recipe.cooking_time,
        }
    }

    /// Which of `target_ids` are in the viewer's collection `R`
    async fn present_for<R: UserCollection>(
        &self,
        viewer: Option<&UserModel>,
        target_ids: &[i32],
    ) -> Result<HashSet<i32>, Error> {
        let Some(viewer) = viewer else {
            return Ok(HashSet::new());
        };

        Ok(UserCollectionRepository::<_, R>::new(self.db)
            .filter_present(viewer.id, target_ids)
            .await?)
    }

    pub async fn users(
        &self,
        viewer: Option<&UserModel>,
        users: &[UserModel],
    ) -> Result<Vec<UserDto>, Error> {
        let ids: Vec<i32> = users.iter().map(|user| user.id).collect();
        let subscribed = self.present_for::<FollowedAuthors>(viewer, &ids).await?;

        Ok(users
            .iter()
            .map(|user| user_dto(user, subscribed.contains(&user.id)))
            .collect())
    }

    pub async fn user(&self, viewer: Option<&UserModel>, user: &UserModel) -> Result<UserDto, Error> {
        let mut dtos = self.users(viewer, std::slice::from_ref(user)).await?;

        dtos.pop()
            .ok_or_else(|| Error::InternalError("Presenting a user produced no result".to_string()))
    }

    /// Full read representation of each recipe, preserving input order
    pub async fn recipes(
        &self,
        viewer: Option<&UserModel>,
        recipes: Vec<RecipeModel>,
    ) -> Result<Vec<RecipeDto>, Error> {
        if recipes.is_empty() {
            return Ok(Vec::new());
        }

        let recipe_ids: Vec<i32> = recipes.iter().map(|recipe| recipe.id).collect();
        let mut author_ids: Vec<i32> = recipes.iter().map(|recipe| recipe.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let authors: HashMap<i32, UserModel> = UserRepository::new(self.db)
            .get_many(&author_ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user))
            .collect();
        let subscribed = self.present_for::<FollowedAuthors>(viewer, &author_ids).await?;
        let favorited = self.present_for::<FavoriteRecipes>(viewer, &recipe_ids).await?;
        let in_cart = self.present_for::<ShoppingCartRecipes>(viewer, &recipe_ids).await?;

        let mut tags: HashMap<i32, Vec<TagDto>> = HashMap::new();
        for (recipe_id, tag) in TagRepository::new(self.db).get_for_recipes(&recipe_ids).await? {
            tags.entry(recipe_id).or_default().push(tag_dto(tag));
        }

        let mut ingredients: HashMap<i32, Vec<RecipeIngredientDto>> = HashMap::new();
        for (line, ingredient) in IngredientRepository::new(self.db)
            .get_lines_for_recipes(&recipe_ids)
            .await?
        {
            ingredients
                .entry(line.recipe_id)
                .or_default()
                .push(RecipeIngredientDto {
                    id: ingredient.id,
                    name: ingredient.name,
                    measurement_unit: ingredient.measurement_unit,
                    amount: line.amount,
                });
        }

        recipes
            .into_iter()
            .map(|recipe| {
                let author = authors.get(&recipe.author_id).ok_or_else(|| {
                    Error::InternalError(format!(
                        "Author {} of recipe {} not found",
                        recipe.author_id, recipe.id
                    ))
                })?;

                Ok(RecipeDto {
                    id: recipe.id,
                    author: user_dto(author, subscribed.contains(&author.id)),
                    image: self.images.url(&recipe.image),
                    tags: tags.remove(&recipe.id).unwrap_or_default(),
                    ingredients: ingredients.remove(&recipe.id).unwrap_or_default(),
                    is_favorited: favorited.contains(&recipe.id),
                    is_in_shopping_cart: in_cart.contains(&recipe.id),
                    name: recipe.name,
                    text: recipe.text,
                    cooking_time: recipe.cooking_time,
                })
            })
            .collect()
    }

    pub async fn recipe(&self, viewer: Option<&UserModel>, recipe: RecipeModel) -> Result<RecipeDto, Error> {
        self.recipes(viewer, vec![recipe])
            .await?
            .pop()
            .ok_or_else(|| Error::InternalError("Presenting a recipe produced no result".to_string()))
    }

    /// Authors with their recipe count and newest recipes
    ///
    /// # Arguments
    /// - `viewer`: Determines `is_subscribed`
    /// - `authors`: Authors to present, order is preserved
    /// - `recipes_limit`: Maximum number of recipes listed per author, `None` lists all
    pub async fn user_details(
        &self,
        viewer: Option<&UserModel>,
        authors: &[UserModel],
        recipes_limit: Option<usize>,
    ) -> Result<Vec<UserDetailDto>, Error> {
        let author_ids: Vec<i32> = authors.iter().map(|author| author.id).collect();
        let subscribed = self.present_for::<FollowedAuthors>(viewer, &author_ids).await?;

        let recipe_repository = RecipeRepository::new(self.db);
        let counts = recipe_repository.count_by_author_ids(&author_ids).await?;

        let mut recipes: HashMap<i32, Vec<RecipeBasicDto>> = HashMap::new();
        for recipe in recipe_repository.get_by_author_ids(&author_ids).await? {
            let listed = recipes.entry(recipe.author_id).or_default();
            if recipes_limit.map_or(true, |limit| listed.len() < limit) {
                listed.push(self.recipe_basic(&recipe));
            }
        }

        Ok(authors
            .iter()
            .map(|author| UserDetailDto {
                id: author.id,
                email: author.email.clone(),
                username: author.username.clone(),
                first_name: author.first_name.clone(),
                last_name: author.last_name.clone(),
                is_subscribed: subscribed.contains(&author.id),
                recipes_count: counts.get(&author.id).copied().unwrap_or(0),
                recipes: recipes.remove(&author.id).unwrap_or_default(),
            })
            .collect())
    }
}
