use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250301_000001_foodgram_user::FoodgramUser;

static FK_SUBSCRIPTION_USER_ID: &str = "fk_subscription_user_id";
static FK_SUBSCRIPTION_AUTHOR_ID: &str = "fk_subscription_author_id";
static CK_SUBSCRIPTION_NOT_SELF: &str = "ck_subscription_cannot_subscribe_to_self";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subscription::Table)
                    .if_not_exists()
                    .col(integer(Subscription::UserId))
                    .col(integer(Subscription::AuthorId))
                    .col(timestamp(Subscription::CreatedAt))
                    .primary_key(
                        Index::create()
                            .col(Subscription::UserId)
                            .col(Subscription::AuthorId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_SUBSCRIPTION_USER_ID)
                            .from(Subscription::Table, Subscription::UserId)
                            .to(FoodgramUser::Table, FoodgramUser::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_SUBSCRIPTION_AUTHOR_ID)
                            .from(Subscription::Table, Subscription::AuthorId)
                            .to(FoodgramUser::Table, FoodgramUser::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(&format!(
                "ALTER TABLE subscription ADD CONSTRAINT {} CHECK (user_id <> author_id)",
                CK_SUBSCRIPTION_NOT_SELF
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Subscription::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Subscription {
    Table,
    UserId,
    AuthorId,
    CreatedAt,
}
