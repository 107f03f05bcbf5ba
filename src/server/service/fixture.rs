//! Bulk loading of tags and ingredients from JSON fixture files.
//!
//! Entries that don't fit their column or duplicate an existing row (or an earlier entry of
//! the same file) are skipped; the remaining entries are inserted in one statement.

use std::{collections::HashSet, path::Path};

use sea_orm::DatabaseConnection;
use serde::Deserialize;

use crate::server::{
    data::{ingredient::IngredientRepository, tag::TagRepository},
    error::Error,
};

pub const CHAR_FIELD_MAX_LENGTH: usize = 200;
pub const COLOR_MAX_LENGTH: usize = 7;

#[derive(Debug, Deserialize)]
pub struct TagFixture {
    pub name: String,
    pub color: String,
    pub slug: String,
}

#[derive(Debug, Deserialize)]
pub struct IngredientFixture {
    pub name: String,
    pub measurement_unit: String,
}

fn fits(value: &str) -> bool {
    !value.trim().is_empty() && value.chars().count() <= CHAR_FIELD_MAX_LENGTH
}

pub struct FixtureService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> FixtureService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads tags from a JSON array of `{name, color, slug}`
    ///
    /// # Returns
    /// - `Ok(usize)`: Number of tags inserted
    /// - `Err(Error::IoError)` / `Err(Error::JsonError)`: File unreadable or not valid JSON
    pub async fn load_tags(&self, path: &Path) -> Result<usize, Error> {
        let content = tokio::fs::read_to_string(path).await?;
        let fixtures: Vec<TagFixture> = serde_json::from_str(&content)?;
        let total = fixtures.len();

        let repository = TagRepository::new(self.db);
        let existing = repository.get_names_and_slugs().await?;
        let mut names: HashSet<String> = existing.iter().map(|(name, _)| name.clone()).collect();
        let mut slugs: HashSet<String> = existing.into_iter().map(|(_, slug)| slug).collect();

        let mut accepted = Vec::new();
        for tag in fixtures {
            let valid = fits(&tag.name)
                && fits(&tag.slug)
                && tag.color.chars().count() <= COLOR_MAX_LENGTH;
            if !valid || names.contains(&tag.name) || slugs.contains(&tag.slug) {
                tracing::debug!(name = %tag.name, slug = %tag.slug, "Skipping tag");
                continue;
            }

            names.insert(tag.name.clone());
            slugs.insert(tag.slug.clone());
            accepted.push((tag.name, tag.color, tag.slug));
        }

        let loaded = accepted.len();
        repository.insert_many(accepted).await?;

        tracing::info!(loaded = %loaded, skipped = %(total - loaded), "Loaded tags");

        Ok(loaded)
    }

    /// Loads ingredients from a JSON array of `{name, measurement_unit}`
    ///
    /// # Returns
    /// - `Ok(usize)`: Number of ingredients inserted
    /// - `Err(Error::IoError)` / `Err(Error::JsonError)`: File unreadable or not valid JSON
    pub async fn load_ingredients(&self, path: &Path) -> Result<usize, Error> {
        let content = tokio::fs::read_to_string(path).await?;
        let fixtures: Vec<IngredientFixture> = serde_json::from_str(&content)?;
        let total = fixtures.len();

        let repository = IngredientRepository::new(self.db);
        let mut seen: HashSet<(String, String)> =
            repository.get_name_unit_pairs().await?.into_iter().collect();

        let mut accepted = Vec::new();
        for ingredient in fixtures {
            let key = (ingredient.name, ingredient.measurement_unit);
            if !fits(&key.0) || !fits(&key.1) || seen.contains(&key) {
                tracing::debug!(name = %key.0, unit = %key.1, "Skipping ingredient");
                continue;
            }

            seen.insert(key.clone());
            accepted.push(key);
        }

        let loaded = accepted.len();
        repository.insert_many(accepted).await?;

        tracing::info!(loaded = %loaded, skipped = %(total - loaded), "Loaded ingredients");

        Ok(loaded)
    }
}
