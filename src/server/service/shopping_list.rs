//! Plain-text shopping list for the recipes in a user's cart.

use sea_orm::DatabaseConnection;

use crate::server::{
    data::ingredient::{IngredientRepository, IngredientTotal},
    error::Error,
};

pub static SHOPPING_LIST_FILENAME: &str = "shopping_list.txt";

pub struct ShoppingListService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ShoppingListService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Builds the shopping list, one `name (unit) - amount` line per ingredient
    ///
    /// Amounts of the same ingredient across carted recipes are summed. An empty cart yields
    /// an empty document.
    pub async fn build(&self, user_id: i32) -> Result<String, Error> {
        let totals = IngredientRepository::new(self.db)
            .get_shopping_cart_totals(user_id)
            .await?;

        Ok(render(&totals))
    }
}

fn render(totals: &[IngredientTotal]) -> String {
    totals
        .iter()
        .map(|total| {
            format!(
                "{} ({}) - {}",
                total.name, total.measurement_unit, total.amount
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
