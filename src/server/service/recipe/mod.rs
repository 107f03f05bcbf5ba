//! Recipe listing, retrieval and the transactional write pipeline.
//!
//! Writes run in a fixed order: validate the payload, store the image, then inside one
//! transaction persist the scalar fields, replace the tag set and replace the ingredient
//! lines. The recipe is re-read afterwards so the response reflects the committed state.

pub mod validate;

use sea_orm::{DatabaseConnection, DbErr, TransactionTrait};

use crate::{
    model::recipe::{RecipeDto, RecipeWriteDto},
    server::{
        data::recipe::{RecipeFields, RecipeFilter, RecipeRepository},
        error::{auth::AuthError, Error},
        model::db::{RecipeModel, UserModel},
        service::{
            image::ImageStore,
            pagination::{Page, PageRequest},
            presenter::Presenter,
            recipe::validate::{validate_recipe, RecipeDraft},
        },
    },
};

/// Listing filters as requested by the client
#[derive(Debug, Default, Clone)]
pub struct RecipeQuery {
    /// Tag slugs, a recipe matches when it carries any of them
    pub tags: Vec<String>,
    pub author_id: Option<i32>,
    /// Only the viewer's favorites
    pub is_favorited: bool,
    /// Only recipes in the viewer's shopping cart
    pub is_in_shopping_cart: bool,
}

enum WriteTarget {
    New { author_id: i32 },
    Existing(RecipeModel),
}

/// Only the author or a staff user may modify a recipe
pub fn can_modify(editor: &UserModel, recipe: &RecipeModel) -> bool {
    editor.is_staff || editor.id == recipe.author_id
}

pub struct RecipeService<'a> {
    db: &'a DatabaseConnection,
    images: &'a ImageStore,
}

impl<'a> RecipeService<'a> {
    pub fn new(db: &'a DatabaseConnection, images: &'a ImageStore) -> Self {
        Self { db, images }
    }

    /// Lists recipes newest first
    ///
    /// Per-user filters requested by an anonymous viewer match nothing.
    pub async fn list(
        &self,
        viewer: Option<&UserModel>,
        query: RecipeQuery,
        request: PageRequest,
    ) -> Result<Page<RecipeDto>, Error> {
        let viewer_id = viewer.map(|viewer| viewer.id);
        let wants_user_filter = query.is_favorited || query.is_in_shopping_cart;

        let filter = RecipeFilter {
            tag_slugs: query.tags,
            author_id: query.author_id,
            favorited_by: viewer_id.filter(|_| query.is_favorited),
            in_cart_of: viewer_id.filter(|_| query.is_in_shopping_cart),
            match_none: wants_user_filter && viewer_id.is_none(),
        };

        let (count, recipes) = RecipeRepository::new(self.db)
            .get_page(filter, request.index(), request.size)
            .await?;

        let dtos = Presenter::new(self.db, self.images)
            .recipes(viewer, recipes)
            .await?;

        Page::new(request, count, dtos)
    }

    pub async fn get(&self, viewer: Option<&UserModel>, recipe_id: i32) -> Result<RecipeDto, Error> {
        let recipe = self.find(recipe_id).await?;

        Presenter::new(self.db, self.images)
            .recipe(viewer, recipe)
            .await
    }

    async fn find(&self, recipe_id: i32) -> Result<RecipeModel, Error> {
        RecipeRepository::new(self.db)
            .get_by_id(recipe_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Recipe {}", recipe_id)))
    }

    /// Finds a recipe the editor is allowed to modify
    ///
    /// # Returns
    /// - `Err(Error::NotFound)`: No such recipe
    /// - `Err(Error::AuthError(AuthError::PermissionDenied))`: Editor is neither author nor staff
    async fn find_for_edit(&self, editor: &UserModel, recipe_id: i32) -> Result<RecipeModel, Error> {
        let recipe = self.find(recipe_id).await?;

        if !can_modify(editor, &recipe) {
            return Err(AuthError::PermissionDenied.into());
        }

        Ok(recipe)
    }

    pub async fn create(&self, author: &UserModel, payload: RecipeWriteDto) -> Result<RecipeDto, Error> {
        let draft = validate_recipe(self.db, payload).await?;

        let recipe = self
            .write(WriteTarget::New { author_id: author.id }, draft)
            .await?;

        tracing::info!(recipe_id = %recipe.id, author_id = %author.id, "Created recipe");

        self.get(Some(author), recipe.id).await
    }

    /// Replaces every field of a recipe
    pub async fn update(
        &self,
        editor: &UserModel,
        recipe_id: i32,
        payload: RecipeWriteDto,
    ) -> Result<RecipeDto, Error> {
        let recipe = self.find_for_edit(editor, recipe_id).await?;
        let draft = validate_recipe(self.db, payload).await?;

        let previous_image = recipe.image.clone();
        let recipe = self.write(WriteTarget::Existing(recipe), draft).await?;
        self.images.remove(&previous_image).await;

        tracing::info!(recipe_id = %recipe.id, editor_id = %editor.id, "Updated recipe");

        self.get(Some(editor), recipe.id).await
    }

    pub async fn delete(&self, editor: &UserModel, recipe_id: i32) -> Result<(), Error> {
        let recipe = self.find_for_edit(editor, recipe_id).await?;

        RecipeRepository::new(self.db).delete_by_id(recipe.id).await?;
        self.images.remove(&recipe.image).await;

        tracing::info!(recipe_id = %recipe.id, editor_id = %editor.id, "Deleted recipe");

        Ok(())
    }

    async fn write(&self, target: WriteTarget, draft: RecipeDraft) -> Result<RecipeModel, Error> {
        let image_path = self.images.save(&draft.image).await?;
        let fields = RecipeFields {
            name: draft.name,
            text: draft.text,
            cooking_time: draft.cooking_time,
            image: image_path.clone(),
        };

        match self
            .persist(target, fields, &draft.tag_ids, &draft.ingredients)
            .await
        {
            Ok(recipe) => Ok(recipe),
            Err(err) => {
                self.images.remove(&image_path).await;
                Err(err.into())
            }
        }
    }

    async fn persist(
        &self,
        target: WriteTarget,
        fields: RecipeFields,
        tag_ids: &[i32],
        ingredients: &[(i32, i16)],
    ) -> Result<RecipeModel, DbErr> {
        let txn = self.db.begin().await?;
        let repository = RecipeRepository::new(&txn);

        let recipe = match target {
            WriteTarget::New { author_id } => repository.create(author_id, fields).await?,
            WriteTarget::Existing(recipe) => repository.update(recipe, fields).await?,
        };
        repository.replace_tags(recipe.id, tag_ids).await?;
        repository.replace_ingredients(recipe.id, ingredients).await?;

        txn.commit().await?;

        Ok(recipe)
    }
}
