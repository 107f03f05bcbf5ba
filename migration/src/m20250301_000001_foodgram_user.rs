use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FoodgramUser::Table)
                    .if_not_exists()
                    .col(pk_auto(FoodgramUser::Id))
                    .col(string_len_uniq(FoodgramUser::Email, 254))
                    .col(string_len_uniq(FoodgramUser::Username, 150))
                    .col(string_len(FoodgramUser::FirstName, 150))
                    .col(string_len(FoodgramUser::LastName, 150))
                    .col(string(FoodgramUser::Password))
                    .col(boolean(FoodgramUser::IsStaff).default(false))
                    .col(timestamp(FoodgramUser::CreatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FoodgramUser::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum FoodgramUser {
    Table,
    Id,
    Email,
    Username,
    FirstName,
    LastName,
    Password,
    IsStaff,
    CreatedAt,
}
