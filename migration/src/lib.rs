pub use sea_orm_migration::prelude::*;

mod m20250301_000001_foodgram_user;
mod m20250301_000002_auth_token;
mod m20250301_000003_tag;
mod m20250301_000004_ingredient;
mod m20250301_000005_recipe;
mod m20250301_000006_recipe_tag;
mod m20250301_000007_recipe_ingredient;
mod m20250301_000008_user_collection;
mod m20250301_000009_subscription;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_foodgram_user::Migration),
            Box::new(m20250301_000002_auth_token::Migration),
            Box::new(m20250301_000003_tag::Migration),
            Box::new(m20250301_000004_ingredient::Migration),
            Box::new(m20250301_000005_recipe::Migration),
            Box::new(m20250301_000006_recipe_tag::Migration),
            Box::new(m20250301_000007_recipe_ingredient::Migration),
            Box::new(m20250301_000008_user_collection::Migration),
            Box::new(m20250301_000009_subscription::Migration),
        ]
    }
}
