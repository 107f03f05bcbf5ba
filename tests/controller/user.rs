use super::*;

fn signup_body(username: &str) -> serde_json::Value {
    json!({
        "email": format!("{}@example.com", username),
        "username": username,
        "first_name": "Test",
        "last_name": "User",
        "password": "Sup3r-secret-pass",
    })
}

/// Expect 201 without the password, and 400 when the email is taken
#[tokio::test]
async fn signup() -> Result<(), TestError> {
    let test = TestBuilder::new().with_foodgram_tables().build().await?;
    let app = test.app();

    let (status, body) = send(&app, request(Method::POST, "/api/users/", None, Some(signup_body("alice")))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["email"], "alice@example.com");
    assert!(body.get("password").is_none());

    let mut duplicate = signup_body("alice2");
    duplicate["email"] = json!("alice@example.com");
    let (status, body) = send(&app, request(Method::POST, "/api/users/", None, Some(duplicate))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["email"].is_array());

    Ok(())
}

/// Expect count, results and relative page links
#[tokio::test]
async fn list_users_paginates() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_foodgram_tables()
        .with_user("carol")
        .with_user("alice")
        .with_user("bob")
        .build()
        .await?;
    let app = test.app();

    let (status, body) = send(&app, request(Method::GET, "/api/users/?limit=2", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    assert_eq!(body["results"][0]["username"], "alice");
    assert_eq!(body["results"][1]["username"], "bob");
    assert_eq!(body["next"], "/api/users/?limit=2&page=2");
    assert!(body["previous"].is_null());

    let (_, body) = send(&app, request(Method::GET, "/api/users/?limit=2&page=2", None, None)).await;
    assert_eq!(body["results"][0]["username"], "carol");
    assert!(body["next"].is_null());
    assert_eq!(body["previous"], "/api/users/?limit=2");

    let (status, body) = send(&app, request(Method::GET, "/api/users/?limit=2&page=9", None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Invalid page.");

    Ok(())
}

/// Expect an oversized `limit` to be clamped rather than overflow the page offset
#[tokio::test]
async fn list_users_oversized_limit() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_foodgram_tables()
        .with_user("alice")
        .with_user("bob")
        .build()
        .await?;
    let app = test.app();

    let (status, body) = send(
        &app,
        request(Method::GET, "/api/users/?limit=10000000000000000000", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["results"].as_array().unwrap().len(), 2);

    let (status, body) = send(
        &app,
        request(
            Method::GET,
            "/api/users/?limit=10000000000000000000&page=18446744073709551615",
            None,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Invalid page.");

    Ok(())
}

/// Expect the caller's profile, or 401 when anonymous
#[tokio::test]
async fn me() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_foodgram_tables().build().await?;
    let alice = test.user().insert_user("alice").await?;
    test.user().insert_token(alice.id, "alice-token").await?;
    let app = test.app();

    let (status, body) = send(&app, request(Method::GET, "/api/users/me/", Some("alice-token"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], alice.id);
    assert_eq!(body["is_subscribed"], false);

    let (status, _) = send(&app, request(Method::GET, "/api/users/me/", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    Ok(())
}

/// Expect a wrong current password to be rejected and a correct one to change the login
#[tokio::test]
async fn set_password() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_foodgram_tables().build().await?;
    let alice = test.user().insert_user("alice").await?;
    test.user().insert_token(alice.id, "alice-token").await?;
    let app = test.app();

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/users/set_password/",
            Some("alice-token"),
            Some(json!({ "new_password": "An0ther-secret", "current_password": "wrong" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["current_password"].is_array());

    let (status, _) = send(
        &app,
        request(
            Method::POST,
            "/api/users/set_password/",
            Some("alice-token"),
            Some(json!({ "new_password": "An0ther-secret", "current_password": TEST_PASSWORD })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        request(
            Method::POST,
            "/api/auth/token/login/",
            None,
            Some(json!({ "email": "alice@example.com", "password": "An0ther-secret" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    Ok(())
}

mod subscribe {
    use super::*;

    /// Expect 400 for subscribing to yourself, before and after other subscriptions
    #[tokio::test]
    async fn self_subscription_fails() -> Result<(), TestError> {
        let mut test = TestBuilder::new().with_foodgram_tables().build().await?;
        let alice = test.user().insert_user("alice").await?;
        let bob = test.user().insert_user("bob").await?;
        test.user().insert_token(alice.id, "alice-token").await?;
        test.user().insert_subscription(alice.id, bob.id).await?;

        let (status, body) = send(
            &test.app(),
            request(
                Method::POST,
                &format!("/api/users/{}/subscribe/", alice.id),
                Some("alice-token"),
                None,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["author"].is_array());

        Ok(())
    }

    /// Expect 404 for an author that doesn't exist
    #[tokio::test]
    async fn unknown_author() -> Result<(), TestError> {
        let mut test = TestBuilder::new().with_foodgram_tables().build().await?;
        let alice = test.user().insert_user("alice").await?;
        test.user().insert_token(alice.id, "alice-token").await?;

        let (status, _) = send(
            &test.app(),
            request(Method::POST, "/api/users/999/subscribe/", Some("alice-token"), None),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);

        Ok(())
    }

    /// Expect 201 with truncated recipes, then 400 on a second subscribe
    #[tokio::test]
    async fn subscribe_twice() -> Result<(), TestError> {
        let mut test = TestBuilder::new().with_foodgram_tables().build().await?;
        let alice = test.user().insert_user("alice").await?;
        let bob = test.user().insert_user("bob").await?;
        test.user().insert_token(alice.id, "alice-token").await?;
        for name in ["Soup", "Salad", "Stew"] {
            test.recipe().insert_recipe(bob.id, name, &[], &[]).await?;
        }
        let app = test.app();
        let uri = format!("/api/users/{}/subscribe/?recipes_limit=2", bob.id);

        let (status, body) = send(&app, request(Method::POST, &uri, Some("alice-token"), None)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["is_subscribed"], true);
        assert_eq!(body["recipes_count"], 3);
        assert_eq!(body["recipes"].as_array().unwrap().len(), 2);
        assert_eq!(body["recipes"][0]["name"], "Stew");

        let (status, body) = send(&app, request(Method::POST, &uri, Some("alice-token"), None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["non_field_errors"].is_array());

        Ok(())
    }

    /// Expect 204 on the first unsubscribe and 400 on the second
    #[tokio::test]
    async fn unsubscribe_twice() -> Result<(), TestError> {
        let mut test = TestBuilder::new().with_foodgram_tables().build().await?;
        let alice = test.user().insert_user("alice").await?;
        let bob = test.user().insert_user("bob").await?;
        test.user().insert_token(alice.id, "alice-token").await?;
        test.user().insert_subscription(alice.id, bob.id).await?;
        let app = test.app();
        let uri = format!("/api/users/{}/subscribe/", bob.id);

        let (status, _) = send(&app, request(Method::DELETE, &uri, Some("alice-token"), None)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, request(Method::DELETE, &uri, Some("alice-token"), None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        Ok(())
    }
}

mod subscriptions {
    use super::*;

    /// Expect followed authors with recipes truncated to `recipes_limit`
    #[tokio::test]
    async fn truncates_recipes() -> Result<(), TestError> {
        let mut test = TestBuilder::new().with_foodgram_tables().build().await?;
        let alice = test.user().insert_user("alice").await?;
        let bob = test.user().insert_user("bob").await?;
        let carol = test.user().insert_user("carol").await?;
        test.user().insert_token(alice.id, "alice-token").await?;
        test.user().insert_subscription(alice.id, bob.id).await?;
        test.recipe().insert_recipe(bob.id, "Soup", &[], &[]).await?;
        test.recipe().insert_recipe(bob.id, "Salad", &[], &[]).await?;
        test.recipe().insert_recipe(carol.id, "Cake", &[], &[]).await?;

        let (status, body) = send(
            &test.app(),
            request(
                Method::GET,
                "/api/users/subscriptions/?recipes_limit=1",
                Some("alice-token"),
                None,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
        let author = &body["results"][0];
        assert_eq!(author["username"], "bob");
        assert_eq!(author["is_subscribed"], true);
        assert_eq!(author["recipes_count"], 2);
        assert_eq!(author["recipes"].as_array().unwrap().len(), 1);
        assert_eq!(author["recipes"][0]["name"], "Salad");

        Ok(())
    }

    /// Expect 400 for a non-integer `recipes_limit`
    #[tokio::test]
    async fn invalid_recipes_limit() -> Result<(), TestError> {
        let mut test = TestBuilder::new().with_foodgram_tables().build().await?;
        let alice = test.user().insert_user("alice").await?;
        test.user().insert_token(alice.id, "alice-token").await?;

        let (status, body) = send(
            &test.app(),
            request(
                Method::GET,
                "/api/users/subscriptions/?recipes_limit=many",
                Some("alice-token"),
                None,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["recipes_limit"].is_array());

        Ok(())
    }
}
