use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250301_000001_foodgram_user::FoodgramUser;

static FK_AUTH_TOKEN_USER_ID: &str = "fk_auth_token_user_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AuthToken::Table)
                    .if_not_exists()
                    .col(string_len(AuthToken::Key, 40).primary_key())
                    .col(integer_uniq(AuthToken::UserId))
                    .col(timestamp(AuthToken::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_AUTH_TOKEN_USER_ID)
                            .from(AuthToken::Table, AuthToken::UserId)
                            .to(FoodgramUser::Table, FoodgramUser::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuthToken::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum AuthToken {
    Table,
    Key,
    UserId,
    CreatedAt,
}
