use super::*;

/// Expect every tag, unpaginated and ordered by name
#[tokio::test]
async fn lists_tags() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_foodgram_tables()
        .with_tag("Lunch", "lunch")
        .with_tag("Breakfast", "breakfast")
        .build()
        .await?;

    let (status, body) = send(&test.app(), request(Method::GET, "/api/tags/", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    let slugs: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|tag| tag["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, vec!["breakfast", "lunch"]);

    Ok(())
}

/// Expect 404 for an unknown tag or ingredient
#[tokio::test]
async fn unknown_reference_is_not_found() -> Result<(), TestError> {
    let test = TestBuilder::new().with_foodgram_tables().build().await?;
    let app = test.app();

    let (status, body) = send(&app, request(Method::GET, "/api/tags/42/", None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found.");

    let (status, _) = send(&app, request(Method::GET, "/api/ingredients/42/", None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

/// Expect names starting with or containing the fragment, prefix matches first
#[tokio::test]
async fn ingredient_name_filter() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_foodgram_tables()
        .with_ingredient("sunit", "g")
        .with_ingredient("other", "g")
        .with_ingredient("unit1", "g")
        .build()
        .await?;

    let (status, body) = send(
        &test.app(),
        request(Method::GET, "/api/ingredients/?name=unit", None, None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|ingredient| ingredient["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["unit1", "sunit"]);

    Ok(())
}
