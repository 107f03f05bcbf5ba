use super::*;

fn recipe_body(name: &str, tags: &[i32], ingredients: &[(i32, i64)]) -> serde_json::Value {
    json!({
        "name": name,
        "text": "Mix and bake",
        "cooking_time": 25,
        "image": png_data_url(),
        "tags": tags,
        "ingredients": ingredients
            .iter()
            .map(|(id, amount)| json!({ "id": id, "amount": amount }))
            .collect::<Vec<_>>(),
    })
}

async fn setup() -> Result<TestContext, TestError> {
    TestBuilder::new()
        .with_foodgram_tables()
        .with_tag("Breakfast", "breakfast")
        .with_tag("Dinner", "dinner")
        .with_tag("Dessert", "dessert")
        .with_ingredient("Flour", "g")
        .with_ingredient("Milk", "ml")
        .build()
        .await
}

mod create {
    use super::*;

    /// Expect the created recipe to read back with the submitted tags and ingredients
    #[tokio::test]
    async fn create_then_read() -> Result<(), TestError> {
        let mut test = setup().await?;
        let alice = test.user().insert_user("alice").await?;
        test.user().insert_token(alice.id, "alice-token").await?;
        let app = test.app();

        let (status, created) = send(
            &app,
            request(
                Method::POST,
                "/api/recipes/",
                Some("alice-token"),
                Some(recipe_body("Pancakes", &[2, 1], &[(1, 200), (2, 300)])),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["author"]["username"], "alice");
        assert_eq!(created["is_favorited"], false);
        assert_eq!(created["is_in_shopping_cart"], false);
        assert!(created["image"].as_str().unwrap().starts_with("/media/recipes/"));

        let uri = format!("/api/recipes/{}/", created["id"]);
        let (status, read) = send(&app, request(Method::GET, &uri, Some("alice-token"), None)).await;
        assert_eq!(status, StatusCode::OK);
        let mut tag_ids: Vec<i64> = read["tags"]
            .as_array()
            .unwrap()
            .iter()
            .map(|tag| tag["id"].as_i64().unwrap())
            .collect();
        tag_ids.sort();
        assert_eq!(tag_ids, vec![1, 2]);
        let mut lines: Vec<(i64, i64)> = read["ingredients"]
            .as_array()
            .unwrap()
            .iter()
            .map(|line| (line["id"].as_i64().unwrap(), line["amount"].as_i64().unwrap()))
            .collect();
        lines.sort();
        assert_eq!(lines, vec![(1, 200), (2, 300)]);

        Ok(())
    }

    /// Expect 401 for an anonymous author
    #[tokio::test]
    async fn requires_authentication() -> Result<(), TestError> {
        let test = setup().await?;

        let (status, _) = send(
            &test.app(),
            request(
                Method::POST,
                "/api/recipes/",
                None,
                Some(recipe_body("Pancakes", &[1], &[(1, 200)])),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);

        Ok(())
    }

    /// Expect field errors for missing and duplicate values
    #[tokio::test]
    async fn validates_payload() -> Result<(), TestError> {
        let mut test = setup().await?;
        let alice = test.user().insert_user("alice").await?;
        test.user().insert_token(alice.id, "alice-token").await?;
        let mut body = recipe_body("Pancakes", &[1, 1], &[(1, 200)]);
        body.as_object_mut().unwrap().remove("ingredients");

        let (status, errors) = send(
            &test.app(),
            request(Method::POST, "/api/recipes/", Some("alice-token"), Some(body)),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(errors["tags"].is_array());
        assert!(errors["ingredients"].is_array());

        Ok(())
    }
}

mod update {
    use super::*;

    /// Expect a disjoint ingredient list to replace every previous line
    #[tokio::test]
    async fn replaces_ingredients() -> Result<(), TestError> {
        let mut test = setup().await?;
        let alice = test.user().insert_user("alice").await?;
        test.user().insert_token(alice.id, "alice-token").await?;
        let recipe = test
            .recipe()
            .insert_recipe(alice.id, "Pancakes", &[1], &[(1, 200)])
            .await?;

        let (status, updated) = send(
            &test.app(),
            request(
                Method::PATCH,
                &format!("/api/recipes/{}/", recipe.id),
                Some("alice-token"),
                Some(recipe_body("Crepes", &[3], &[(2, 500)])),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["name"], "Crepes");
        let ingredients = updated["ingredients"].as_array().unwrap();
        assert_eq!(ingredients.len(), 1);
        assert_eq!(ingredients[0]["name"], "Milk");
        assert_eq!(updated["tags"][0]["slug"], "dessert");

        Ok(())
    }

    /// Expect 403 for a user who isn't the author and 404 for an unknown recipe
    #[tokio::test]
    async fn permission_and_existence() -> Result<(), TestError> {
        let mut test = setup().await?;
        let alice = test.user().insert_user("alice").await?;
        let bob = test.user().insert_user("bob").await?;
        test.user().insert_token(bob.id, "bob-token").await?;
        let recipe = test
            .recipe()
            .insert_recipe(alice.id, "Pancakes", &[1], &[(1, 200)])
            .await?;
        let app = test.app();

        let (status, _) = send(
            &app,
            request(
                Method::PATCH,
                &format!("/api/recipes/{}/", recipe.id),
                Some("bob-token"),
                Some(recipe_body("Stolen", &[1], &[(1, 1)])),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(
            &app,
            request(Method::DELETE, &format!("/api/recipes/{}/", recipe.id), Some("bob-token"), None),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(
            &app,
            request(
                Method::PATCH,
                "/api/recipes/999/",
                Some("bob-token"),
                Some(recipe_body("Missing", &[1], &[(1, 1)])),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        Ok(())
    }
}

mod list {
    use super::*;

    /// Expect recipes carrying any of the requested tags
    #[tokio::test]
    async fn tags_are_a_union() -> Result<(), TestError> {
        let mut test = setup().await?;
        let alice = test.user().insert_user("alice").await?;
        test.recipe().insert_recipe(alice.id, "Porridge", &[1], &[]).await?;
        test.recipe().insert_recipe(alice.id, "Roast", &[2], &[]).await?;
        test.recipe().insert_recipe(alice.id, "Brownie", &[3], &[]).await?;
        test.recipe().insert_recipe(alice.id, "Brunch", &[1, 2], &[]).await?;

        let (status, body) = send(
            &test.app(),
            request(Method::GET, "/api/recipes/?tags=breakfast&tags=dinner", None, None),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 3);
        let names: Vec<&str> = body["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|recipe| recipe["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Brunch", "Roast", "Porridge"]);

        Ok(())
    }

    /// Expect only the viewer's favorites, and nothing for an anonymous viewer
    #[tokio::test]
    async fn favorited_filter() -> Result<(), TestError> {
        let mut test = setup().await?;
        let alice = test.user().insert_user("alice").await?;
        test.user().insert_token(alice.id, "alice-token").await?;
        let soup = test.recipe().insert_recipe(alice.id, "Soup", &[], &[]).await?;
        test.recipe().insert_recipe(alice.id, "Salad", &[], &[]).await?;
        test.recipe().insert_favorite(alice.id, soup.id).await?;
        let app = test.app();

        let (_, body) = send(
            &app,
            request(Method::GET, "/api/recipes/?is_favorited=1", Some("alice-token"), None),
        )
        .await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["results"][0]["name"], "Soup");
        assert_eq!(body["results"][0]["is_favorited"], true);

        let (_, body) = send(&app, request(Method::GET, "/api/recipes/?is_favorited=1", None, None)).await;
        assert_eq!(body["count"], 0);

        let (_, body) = send(
            &app,
            request(Method::GET, "/api/recipes/?is_favorited=2", Some("alice-token"), None),
        )
        .await;
        assert_eq!(body["count"], 1);

        Ok(())
    }

    /// Expect only recipes in the viewer's shopping cart
    #[tokio::test]
    async fn shopping_cart_filter() -> Result<(), TestError> {
        let mut test = setup().await?;
        let alice = test.user().insert_user("alice").await?;
        test.user().insert_token(alice.id, "alice-token").await?;
        let stew = test.recipe().insert_recipe(alice.id, "Stew", &[], &[]).await?;
        test.recipe().insert_recipe(alice.id, "Toast", &[], &[]).await?;
        test.recipe().insert_shopping_cart(alice.id, stew.id).await?;

        let (status, body) = send(
            &test.app(),
            request(Method::GET, "/api/recipes/?is_in_shopping_cart=5", Some("alice-token"), None),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
        assert_eq!(body["results"][0]["name"], "Stew");
        assert_eq!(body["results"][0]["is_in_shopping_cart"], true);

        Ok(())
    }

    /// Expect only recipes written by the requested author
    #[tokio::test]
    async fn author_filter() -> Result<(), TestError> {
        let mut test = setup().await?;
        let alice = test.user().insert_user("alice").await?;
        let bob = test.user().insert_user("bob").await?;
        test.recipe().insert_recipe(alice.id, "Stew", &[], &[]).await?;
        test.recipe().insert_recipe(bob.id, "Toast", &[], &[]).await?;

        let uri = format!("/api/recipes/?author={}", bob.id);
        let (status, body) = send(&test.app(), request(Method::GET, &uri, None, None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
        assert_eq!(body["results"][0]["name"], "Toast");
        assert_eq!(body["results"][0]["author"]["username"], "bob");

        Ok(())
    }

    /// Expect 400 keyed by the flag when it is not a number
    #[tokio::test]
    async fn non_numeric_flag() -> Result<(), TestError> {
        let test = setup().await?;

        let (status, body) = send(
            &test.app(),
            request(Method::GET, "/api/recipes/?is_favorited=yes", None, None),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["is_favorited"].is_array());

        Ok(())
    }
}

mod favorite {
    use super::*;

    /// Expect 201 then 400 when adding twice, 204 then 400 when removing twice
    #[tokio::test]
    async fn twice() -> Result<(), TestError> {
        let mut test = setup().await?;
        let alice = test.user().insert_user("alice").await?;
        test.user().insert_token(alice.id, "alice-token").await?;
        let recipe = test.recipe().insert_recipe(alice.id, "Soup", &[], &[]).await?;
        let app = test.app();
        let uri = format!("/api/recipes/{}/favorite/", recipe.id);

        let (status, body) = send(&app, request(Method::POST, &uri, Some("alice-token"), None)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["name"], "Soup");
        assert_eq!(body["cooking_time"], 10);

        let (status, body) = send(&app, request(Method::POST, &uri, Some("alice-token"), None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["non_field_errors"].is_array());

        let (status, _) = send(&app, request(Method::DELETE, &uri, Some("alice-token"), None)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, request(Method::DELETE, &uri, Some("alice-token"), None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        Ok(())
    }

    /// Expect a missing recipe to be a field error on add and 404 on remove
    #[tokio::test]
    async fn missing_recipe() -> Result<(), TestError> {
        let mut test = setup().await?;
        let alice = test.user().insert_user("alice").await?;
        test.user().insert_token(alice.id, "alice-token").await?;
        let app = test.app();

        let (status, body) = send(
            &app,
            request(Method::POST, "/api/recipes/999/favorite/", Some("alice-token"), None),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["recipe"].is_array());

        let (status, _) = send(
            &app,
            request(Method::DELETE, "/api/recipes/999/favorite/", Some("alice-token"), None),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        Ok(())
    }
}

mod shopping_cart {
    use crate::util::send_raw;

    use super::*;

    /// Expect one summed line per ingredient shared by recipes in the cart
    #[tokio::test]
    async fn download_sums_amounts() -> Result<(), TestError> {
        let mut test = setup().await?;
        let alice = test.user().insert_user("alice").await?;
        test.user().insert_token(alice.id, "alice-token").await?;
        let bread = test
            .recipe()
            .insert_recipe(alice.id, "Bread", &[], &[(1, 20)])
            .await?;
        let pie = test
            .recipe()
            .insert_recipe(alice.id, "Pie", &[], &[(1, 10), (2, 5)])
            .await?;
        let app = test.app();

        for recipe_id in [bread.id, pie.id] {
            let (status, _) = send(
                &app,
                request(
                    Method::POST,
                    &format!("/api/recipes/{}/shopping_cart/", recipe_id),
                    Some("alice-token"),
                    None,
                ),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let response = tower::ServiceExt::oneshot(
            app.clone(),
            request(
                Method::GET,
                "/api/recipes/download_shopping_cart/",
                Some("alice-token"),
                None,
            ),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-disposition"],
            "attachment; filename=shopping_list.txt"
        );
        assert!(response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));

        let (_, body) = send_raw(
            &app,
            request(
                Method::GET,
                "/api/recipes/download_shopping_cart/",
                Some("alice-token"),
                None,
            ),
        )
        .await;
        let text = String::from_utf8(body).unwrap();
        assert!(!text.ends_with('\n'));
        let mut lines: Vec<&str> = text.lines().collect();
        lines.sort();
        assert_eq!(lines, vec!["Flour (g) - 30", "Milk (ml) - 5"]);

        Ok(())
    }

    /// Expect 401 when downloading anonymously
    #[tokio::test]
    async fn download_requires_authentication() -> Result<(), TestError> {
        let test = setup().await?;

        let (status, _) = send(
            &test.app(),
            request(Method::GET, "/api/recipes/download_shopping_cart/", None, None),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);

        Ok(())
    }
}

mod delete {
    use super::*;

    /// Expect 204 then 404, with favorites and cart entries gone
    #[tokio::test]
    async fn cascades() -> Result<(), TestError> {
        let mut test = setup().await?;
        let alice = test.user().insert_user("alice").await?;
        test.user().insert_token(alice.id, "alice-token").await?;
        let recipe = test
            .recipe()
            .insert_recipe(alice.id, "Bread", &[1], &[(1, 20)])
            .await?;
        test.recipe().insert_favorite(alice.id, recipe.id).await?;
        test.recipe().insert_shopping_cart(alice.id, recipe.id).await?;
        let app = test.app();
        let uri = format!("/api/recipes/{}/", recipe.id);

        let (status, _) = send(&app, request(Method::DELETE, &uri, Some("alice-token"), None)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, request(Method::DELETE, &uri, Some("alice-token"), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = send(
            &app,
            request(Method::GET, "/api/recipes/?is_favorited=1", Some("alice-token"), None),
        )
        .await;
        assert_eq!(body["count"], 0);

        let (_, body) = crate::util::send_raw(
            &app,
            request(
                Method::GET,
                "/api/recipes/download_shopping_cart/",
                Some("alice-token"),
                None,
            ),
        )
        .await;
        assert!(body.is_empty());

        Ok(())
    }
}
