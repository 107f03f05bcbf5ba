//! Read-only access to tags and ingredients.

use sea_orm::DatabaseConnection;

use crate::{
    model::recipe::{IngredientDto, TagDto},
    server::{
        data::{ingredient::IngredientRepository, tag::TagRepository},
        error::Error,
        service::presenter::{ingredient_dto, tag_dto},
    },
};

pub struct ReferenceService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ReferenceService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_tags(&self) -> Result<Vec<TagDto>, Error> {
        let tags = TagRepository::new(self.db).get_all().await?;

        Ok(tags.into_iter().map(tag_dto).collect())
    }

    pub async fn get_tag(&self, tag_id: i32) -> Result<TagDto, Error> {
        TagRepository::new(self.db)
            .get_by_id(tag_id)
            .await?
            .map(tag_dto)
            .ok_or_else(|| Error::NotFound(format!("Tag {}", tag_id)))
    }

    /// Lists ingredients, optionally filtered by a case-insensitive name fragment
    ///
    /// When filtering, names starting with the fragment come before names that only contain
    /// it; within each group ingredients stay ordered by name then measurement unit.
    pub async fn list_ingredients(&self, name: Option<&str>) -> Result<Vec<IngredientDto>, Error> {
        let repository = IngredientRepository::new(self.db);

        let ingredients = match name.map(str::trim).filter(|name| !name.is_empty()) {
            None => repository.get_all().await?,
            Some(fragment) => {
                let fragment = fragment.to_lowercase();
                let mut found = repository.search_by_name(&fragment).await?;
                found.sort_by_key(|ingredient| !ingredient.name.to_lowercase().starts_with(&fragment));
                found
            }
        };

        Ok(ingredients.into_iter().map(ingredient_dto).collect())
    }

    pub async fn get_ingredient(&self, ingredient_id: i32) -> Result<IngredientDto, Error> {
        IngredientRepository::new(self.db)
            .get_by_id(ingredient_id)
            .await?
            .map(ingredient_dto)
            .ok_or_else(|| Error::NotFound(format!("Ingredient {}", ingredient_id)))
    }
}
