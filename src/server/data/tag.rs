use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};

use crate::server::model::db::TagModel;

pub struct TagRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> TagRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// All tags ordered by name
    pub async fn get_all(&self) -> Result<Vec<TagModel>, DbErr> {
        entity::prelude::Tag::find()
            .order_by_asc(entity::tag::Column::Name)
            .all(self.db)
            .await
    }

    pub async fn get_by_id(&self, tag_id: i32) -> Result<Option<TagModel>, DbErr> {
        entity::prelude::Tag::find_by_id(tag_id).one(self.db).await
    }

    /// Tags whose ID is in `tag_ids`; unknown IDs are silently absent from the result
    pub async fn get_many(&self, tag_ids: &[i32]) -> Result<Vec<TagModel>, DbErr> {
        entity::prelude::Tag::find()
            .filter(entity::tag::Column::Id.is_in(tag_ids.iter().copied()))
            .all(self.db)
            .await
    }

    /// Tags attached to each of the provided recipes as `(recipe_id, tag)` pairs ordered by
    /// tag name
    pub async fn get_for_recipes(&self, recipe_ids: &[i32]) -> Result<Vec<(i32, TagModel)>, DbErr> {
        if recipe_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = entity::prelude::RecipeTag::find()
            .filter(entity::recipe_tag::Column::RecipeId.is_in(recipe_ids.iter().copied()))
            .find_also_related(entity::prelude::Tag)
            .order_by_asc(entity::tag::Column::Name)
            .all(self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(link, tag)| tag.map(|tag| (link.recipe_id, tag)))
            .collect())
    }

    /// Names and slugs already in use, used to skip duplicates when loading fixtures
    pub async fn get_names_and_slugs(&self) -> Result<Vec<(String, String)>, DbErr> {
        let tags = entity::prelude::Tag::find().all(self.db).await?;

        Ok(tags.into_iter().map(|tag| (tag.name, tag.slug)).collect())
    }

    /// Bulk insert tags given as `(name, color, slug)`
    pub async fn insert_many(&self, tags: Vec<(String, String, String)>) -> Result<(), DbErr> {
        if tags.is_empty() {
            return Ok(());
        }

        let models = tags.into_iter().map(|(name, color, slug)| entity::tag::ActiveModel {
            name: sea_orm::ActiveValue::Set(name),
            color: sea_orm::ActiveValue::Set(color),
            slug: sea_orm::ActiveValue::Set(slug),
            ..Default::default()
        });

        entity::prelude::Tag::insert_many(models)
            .exec_with_returning(self.db)
            .await?;

        Ok(())
    }
}
