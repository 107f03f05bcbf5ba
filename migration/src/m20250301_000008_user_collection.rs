//! Favorite and shopping cart tables share the same (user, recipe) shape.

use sea_orm_migration::{prelude::*, schema::*};

use crate::{m20250301_000001_foodgram_user::FoodgramUser, m20250301_000005_recipe::Recipe};

#[derive(DeriveMigrationName)]
pub struct Migration;

fn user_collection_table(table: UserCollection, name: &str) -> TableCreateStatement {
    Table::create()
        .table(table)
        .if_not_exists()
        .col(integer(UserCollection::UserId))
        .col(integer(UserCollection::RecipeId))
        .col(timestamp(UserCollection::CreatedAt))
        .primary_key(
            Index::create()
                .col(UserCollection::UserId)
                .col(UserCollection::RecipeId),
        )
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{}_user_id", name))
                .from(table, UserCollection::UserId)
                .to(FoodgramUser::Table, FoodgramUser::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{}_recipe_id", name))
                .from(table, UserCollection::RecipeId)
                .to(Recipe::Table, Recipe::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(user_collection_table(UserCollection::Favorite, "favorite"))
            .await?;

        manager
            .create_table(user_collection_table(UserCollection::ShoppingCart, "shopping_cart"))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserCollection::ShoppingCart).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(UserCollection::Favorite).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden, Clone, Copy)]
enum UserCollection {
    Favorite,
    ShoppingCart,
    UserId,
    RecipeId,
    CreatedAt,
}
