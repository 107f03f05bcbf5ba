use super::*;

async fn login(test: &TestContext, email: &str, password: &str) -> (StatusCode, serde_json::Value) {
    send(
        &test.app(),
        request(
            Method::POST,
            "/api/auth/token/login/",
            None,
            Some(json!({ "email": email, "password": password })),
        ),
    )
    .await
}

/// Expect a token for valid credentials and the same token on a second login
#[tokio::test]
async fn login_returns_stable_token() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_foodgram_tables()
        .with_user("alice")
        .build()
        .await?;

    let (status, body) = login(&test, "alice@example.com", TEST_PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    let token = body["auth_token"].as_str().unwrap().to_string();
    assert_eq!(token.len(), 40);

    let (_, body) = login(&test, "alice@example.com", TEST_PASSWORD).await;
    assert_eq!(body["auth_token"], token);

    Ok(())
}

/// Expect 400 with a non-field error for a wrong password
#[tokio::test]
async fn login_rejects_wrong_password() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_foodgram_tables()
        .with_user("alice")
        .build()
        .await?;

    let (status, body) = login(&test, "alice@example.com", "not-the-password").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["non_field_errors"].is_array());

    Ok(())
}

/// Expect 400 listing every missing field
#[tokio::test]
async fn login_requires_fields() -> Result<(), TestError> {
    let test = TestBuilder::new().with_foodgram_tables().build().await?;

    let (status, body) = send(
        &test.app(),
        request(Method::POST, "/api/auth/token/login/", None, Some(json!({}))),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["email"][0], "This field is required.");
    assert_eq!(body["password"][0], "This field is required.");

    Ok(())
}

/// Expect the token to stop working after logout
#[tokio::test]
async fn logout_revokes_token() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_foodgram_tables().build().await?;
    let alice = test.user().insert_user("alice").await?;
    test.user().insert_token(alice.id, "alice-token").await?;
    let app = test.app();

    let (status, _) = send(
        &app,
        request(Method::POST, "/api/auth/token/logout/", Some("alice-token"), None),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, request(Method::GET, "/api/users/me/", Some("alice-token"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token.");

    Ok(())
}

/// Expect 401 when logging out anonymously
#[tokio::test]
async fn logout_requires_authentication() -> Result<(), TestError> {
    let test = TestBuilder::new().with_foodgram_tables().build().await?;

    let (status, body) = send(
        &test.app(),
        request(Method::POST, "/api/auth/token/logout/", None, None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authentication credentials were not provided.");

    Ok(())
}

/// Expect an unknown token to be rejected even on public endpoints
#[tokio::test]
async fn unknown_token_on_public_endpoint() -> Result<(), TestError> {
    let test = TestBuilder::new().with_foodgram_tables().build().await?;

    let (status, _) = send(
        &test.app(),
        request(Method::GET, "/api/recipes/", Some("no-such-token"), None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);

    Ok(())
}
