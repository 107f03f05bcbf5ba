use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250301_000001_foodgram_user::FoodgramUser;

static IDX_RECIPE_AUTHOR_ID: &str = "idx_recipe_author_id";
static FK_RECIPE_AUTHOR_ID: &str = "fk_recipe_author_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Recipe::Table)
                    .if_not_exists()
                    .col(pk_auto(Recipe::Id))
                    .col(integer(Recipe::AuthorId))
                    .col(string_len(Recipe::Name, 200))
                    .col(text(Recipe::Text))
                    .col(small_integer(Recipe::CookingTime))
                    .col(string(Recipe::Image))
                    .col(timestamp(Recipe::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_RECIPE_AUTHOR_ID)
                            .from(Recipe::Table, Recipe::AuthorId)
                            .to(FoodgramUser::Table, FoodgramUser::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_RECIPE_AUTHOR_ID)
                    .table(Recipe::Table)
                    .col(Recipe::AuthorId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_RECIPE_AUTHOR_ID)
                    .table(Recipe::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Recipe::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Recipe {
    Table,
    Id,
    AuthorId,
    Name,
    Text,
    CookingTime,
    Image,
    CreatedAt,
}
