//! Validation of the recipe write payload.

use std::collections::HashSet;

use sea_orm::ConnectionTrait;

use crate::{
    model::recipe::RecipeWriteDto,
    server::{
        data::{ingredient::IngredientRepository, tag::TagRepository},
        error::{validation::ValidationError, Error},
        service::image::{decode_data_url, DecodedImage},
    },
};

pub const RECIPE_NAME_MAX_LENGTH: usize = 200;
pub const MIN_AMOUNT: i64 = 1;
pub const MAX_AMOUNT: i64 = i16::MAX as i64;

/// A fully validated recipe payload
#[derive(Debug)]
pub struct RecipeDraft {
    pub name: String,
    pub text: String,
    pub cooking_time: i16,
    pub image: DecodedImage,
    pub tag_ids: Vec<i32>,
    /// `(ingredient_id, amount)` pairs in payload order
    pub ingredients: Vec<(i32, i16)>,
}

fn not_provided(field: &str) -> String {
    format!("No {} provided", field)
}

fn does_not_exist(id: i32) -> String {
    format!("Invalid pk \"{}\" - object does not exist.", id)
}

fn check_range(errors: &mut ValidationError, field: &str, value: i64) -> Option<i16> {
    if value < MIN_AMOUNT {
        errors.add(
            field,
            format!("Ensure this value is greater than or equal to {}.", MIN_AMOUNT),
        );
        return None;
    }
    if value > MAX_AMOUNT {
        errors.add(
            field,
            format!("Ensure this value is less than or equal to {}.", MAX_AMOUNT),
        );
        return None;
    }
    i16::try_from(value).ok()
}

fn has_duplicates(ids: impl IntoIterator<Item = i32>) -> bool {
    let mut seen = HashSet::new();
    ids.into_iter().any(|id| !seen.insert(id))
}

/// Validates every field of a recipe payload, collecting all failures
///
/// Tag and ingredient references are checked against the database.
///
/// # Returns
/// - `Ok(RecipeDraft)`: Payload is valid
/// - `Err(Error::ValidationError)`: One or more fields are invalid, keyed by field
/// - `Err(Error::DbErr)`: Reference lookup failed
pub async fn validate_recipe<C: ConnectionTrait>(
    db: &C,
    payload: RecipeWriteDto,
) -> Result<RecipeDraft, Error> {
    let mut errors = ValidationError::new();

    let name = match payload.name {
        None => {
            errors.add("name", "This field is required.");
            String::new()
        }
        Some(name) if name.trim().is_empty() => {
            errors.add("name", "This field may not be blank.");
            String::new()
        }
        Some(name) => {
            if name.chars().count() > RECIPE_NAME_MAX_LENGTH {
                errors.add(
                    "name",
                    format!(
                        "Ensure this field has no more than {} characters.",
                        RECIPE_NAME_MAX_LENGTH
                    ),
                );
            }
            name
        }
    };

    let text = match payload.text {
        None => {
            errors.add("text", "This field is required.");
            String::new()
        }
        Some(text) if text.trim().is_empty() => {
            errors.add("text", "This field may not be blank.");
            String::new()
        }
        Some(text) => text,
    };

    let cooking_time = match payload.cooking_time {
        None => {
            errors.add("cooking_time", "This field is required.");
            None
        }
        Some(value) => check_range(&mut errors, "cooking_time", value),
    };

    let image = match payload.image.as_deref().map(str::trim) {
        None | Some("") => {
            errors.add("image", not_provided("image"));
            None
        }
        Some(data_url) => match decode_data_url(data_url) {
            Ok(image) => Some(image),
            Err(err) => {
                errors.add("image", err.to_string());
                None
            }
        },
    };

    let tag_ids = payload.tags.unwrap_or_default();
    if tag_ids.is_empty() {
        errors.add("tags", not_provided("tags"));
    } else if has_duplicates(tag_ids.iter().copied()) {
        errors.add("tags", "Values are not unique");
    } else {
        let known: HashSet<i32> = TagRepository::new(db)
            .get_many(&tag_ids)
            .await?
            .into_iter()
            .map(|tag| tag.id)
            .collect();
        for tag_id in tag_ids.iter().filter(|id| !known.contains(id)) {
            errors.add("tags", does_not_exist(*tag_id));
        }
    }

    let mut ingredients = Vec::new();
    let lines = payload.ingredients.unwrap_or_default();
    if lines.is_empty() {
        errors.add("ingredients", not_provided("ingredients"));
    } else if has_duplicates(lines.iter().map(|line| line.id)) {
        errors.add("ingredients", "Values are not unique");
    } else {
        let ids: Vec<i32> = lines.iter().map(|line| line.id).collect();
        let known: HashSet<i32> = IngredientRepository::new(db)
            .get_many(&ids)
            .await?
            .into_iter()
            .map(|ingredient| ingredient.id)
            .collect();

        for line in lines {
            if !known.contains(&line.id) {
                errors.add("ingredients", does_not_exist(line.id));
                continue;
            }
            if let Some(amount) = check_range(&mut errors, "ingredients", line.amount) {
                ingredients.push((line.id, amount));
            }
        }
    }

    errors.into_result()?;

    match (cooking_time, image) {
        (Some(cooking_time), Some(image)) => Ok(RecipeDraft {
            name,
            text,
            cooking_time,
            image,
            tag_ids,
            ingredients,
        }),
        _ => Err(Error::InternalError(
            "Recipe validation passed without cooking time or image".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use foodgram_test_utils::prelude::*;

    use super::*;
    use crate::model::recipe::IngredientAmountDto;

    fn png() -> String {
        format!(
            "data:image/png;base64,{}",
            STANDARD.encode(b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR")
        )
    }

    fn payload(tags: Vec<i32>, ingredients: Vec<(i32, i64)>) -> RecipeWriteDto {
        RecipeWriteDto {
            name: Some("Pancakes".to_string()),
            text: Some("Whisk and fry".to_string()),
            cooking_time: Some(15),
            image: Some(png()),
            tags: Some(tags),
            ingredients: Some(
                ingredients
                    .into_iter()
                    .map(|(id, amount)| IngredientAmountDto { id, amount })
                    .collect(),
            ),
        }
    }

    async fn setup() -> Result<TestContext, TestError> {
        TestBuilder::new()
            .with_foodgram_tables()
            .with_tag("Breakfast", "breakfast")
            .with_ingredient("Flour", "g")
            .with_ingredient("Milk", "ml")
            .build()
            .await
    }

    fn field_errors(result: Result<RecipeDraft, Error>) -> ValidationError {
        match result {
            Err(Error::ValidationError(errors)) => errors,
            other => panic!("expected validation error, got {:?}", other.map(|d| d.name)),
        }
    }

    /// Expect a valid payload to produce a draft
    #[tokio::test]
    async fn accepts_valid_payload() -> Result<(), TestError> {
        let test = setup().await?;

        let draft = validate_recipe(&test.db, payload(vec![1], vec![(1, 200), (2, 300)]))
            .await
            .unwrap();

        assert_eq!(draft.cooking_time, 15);
        assert_eq!(draft.ingredients, vec![(1, 200), (2, 300)]);
        assert_eq!(draft.image.extension, "png");

        Ok(())
    }

    /// Expect "No <field> provided" for empty tags, ingredients and image
    #[tokio::test]
    async fn rejects_empty_collections() -> Result<(), TestError> {
        let test = setup().await?;
        let mut body = payload(vec![], vec![]);
        body.image = Some(String::new());

        let errors = field_errors(validate_recipe(&test.db, body).await);

        assert_eq!(errors.errors()["tags"], vec!["No tags provided"]);
        assert_eq!(errors.errors()["ingredients"], vec!["No ingredients provided"]);
        assert_eq!(errors.errors()["image"], vec!["No image provided"]);

        Ok(())
    }

    /// Expect duplicates to be rejected
    #[tokio::test]
    async fn rejects_duplicates() -> Result<(), TestError> {
        let test = setup().await?;

        let errors =
            field_errors(validate_recipe(&test.db, payload(vec![1, 1], vec![(1, 5), (1, 6)])).await);

        assert_eq!(errors.errors()["tags"], vec!["Values are not unique"]);
        assert_eq!(errors.errors()["ingredients"], vec!["Values are not unique"]);

        Ok(())
    }

    /// Expect unknown references and out of range numbers to be rejected
    #[tokio::test]
    async fn rejects_unknown_and_out_of_range() -> Result<(), TestError> {
        let test = setup().await?;
        let mut body = payload(vec![7], vec![(9, 5), (1, 0), (2, 40_000)]);
        body.cooking_time = Some(0);

        let errors = field_errors(validate_recipe(&test.db, body).await);

        assert!(errors.contains("tags"));
        assert!(errors.contains("cooking_time"));
        assert_eq!(errors.errors()["ingredients"].len(), 3);

        Ok(())
    }

    /// Expect missing scalar fields to be reported as required
    #[tokio::test]
    async fn requires_scalar_fields() -> Result<(), TestError> {
        let test = setup().await?;
        let body = RecipeWriteDto {
            tags: Some(vec![1]),
            ingredients: Some(vec![IngredientAmountDto { id: 1, amount: 1 }]),
            image: Some(png()),
            ..Default::default()
        };

        let errors = field_errors(validate_recipe(&test.db, body).await);

        for field in ["name", "text", "cooking_time"] {
            assert_eq!(errors.errors()[field], vec!["This field is required."]);
        }

        Ok(())
    }
}
