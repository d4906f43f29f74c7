use httpmock::prelude::*;
use stier_world::domain::ports::{ProductSource, RatingRepository};
use stier_world::{InMemoryRatingRepository, NewRating, RestClient, StierError, Tier, TierWorld};

#[tokio::test]
async fn test_fetch_products_query_shape() {
    let server = MockServer::start();
    let mock_data = serde_json::json!([
        {
            "id": "b6c1", "title": "Elden Ring", "slug": "elden-ring", "category": "Sneakers",
            "image_url": "https://images.igdb.com/igdb/image/upload/t_cover_big/co4jni.jpg",
            "created_at": "2025-02-01T10:00:00+00:00"
        },
        {
            "id": "a9f2", "title": "Hollow Knight", "slug": "hollow-knight", "category": "Sneakers",
            "created_at": "2025-01-15T10:00:00+00:00"
        }
    ]);

    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/products")
            .query_param("select", "*")
            .query_param("category", "eq.Sneakers")
            .query_param("order", "created_at.desc")
            .header("apikey", "test-key")
            .header("authorization", "Bearer test-key");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(mock_data);
    });

    let client = RestClient::new(server.base_url(), Some("test-key".to_string())).unwrap();
    let products = client.fetch_products(Some("Sneakers")).await.unwrap();

    api_mock.assert();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].slug, "elden-ring");
    assert!(products[0].image_url.as_deref().unwrap().contains("igdb"));
    assert!(products[1].created_at.is_some());
}

#[tokio::test]
async fn test_unauthorized_is_api_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/products");
        then.status(401).body(r#"{"message":"Invalid API key"}"#);
    });

    let client = RestClient::new(server.base_url(), Some("wrong".to_string())).unwrap();
    let err = client.fetch_products(None).await.unwrap_err();
    match err {
        StierError::ApiError { status, ref message } => {
            assert_eq!(status, 401);
            assert!(message.contains("Invalid API key"));
        }
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_submit_rating_posts_and_returns_row() {
    let server = MockServer::start();
    let insert_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/rest/v1/ratings")
            .header("prefer", "return=representation")
            .json_body_partial(r#"{ "product_slug": "hollow-knight", "reviewer": "@Knight" }"#);
        then.status(201).json_body(serde_json::json!([{
            "product_slug": "hollow-knight",
            "reviewer": "@Knight",
            "rating": 5,
            "created_at": "2025-02-02T08:30:00+00:00"
        }]));
    });

    let client = RestClient::new(server.base_url(), Some("test-key".to_string())).unwrap();
    let stored = client
        .submit(NewRating::new("hollow-knight", "@Knight", 5.0))
        .await
        .unwrap();

    insert_mock.assert();
    assert_eq!(stored.rating, 5.0);
    assert!(stored.created_at.is_some());
}

#[tokio::test]
async fn test_invalid_rating_never_hits_server() {
    let server = MockServer::start();
    let insert_mock = server.mock(|when, then| {
        when.method(POST).path("/rest/v1/ratings");
        then.status(201).json_body(serde_json::json!([]));
    });

    let client = RestClient::new(server.base_url(), None).unwrap();
    let err = client
        .submit(NewRating::new("hollow-knight", "@Knight", 6.0))
        .await
        .unwrap_err();

    assert!(matches!(err, StierError::ValidationError { .. }));
    insert_mock.assert_hits(0);
}

#[tokio::test]
async fn test_ratings_for_filters_by_slug() {
    let server = MockServer::start();
    let select_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/ratings")
            .query_param("product_slug", "eq.hollow-knight");
        then.status(200).json_body(serde_json::json!([
            { "product_slug": "hollow-knight", "reviewer": "@A", "rating": 5 },
            { "product_slug": "hollow-knight", "reviewer": "@B", "rating": 4 }
        ]));
    });

    let client = RestClient::new(server.base_url(), None).unwrap();
    let ratings = client.ratings_for("hollow-knight").await.unwrap();

    select_mock.assert();
    assert_eq!(ratings.len(), 2);
}

#[tokio::test]
async fn test_engine_over_rest_source() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/products");
        then.status(200).json_body(serde_json::json!([
            { "title": "Hades II", "slug": "hades-ii", "category": "Video Games" },
            { "title": "Starfield", "slug": "starfield", "category": "Video Games" }
        ]));
    });

    let client = RestClient::new(server.base_url(), None)
        .unwrap()
        .with_tables("products", "ratings");
    let engine = TierWorld::new(client, InMemoryRatingRepository::new());

    engine
        .ratings()
        .submit(NewRating::new("hades-ii", "@Zag", 5.0))
        .await
        .unwrap();
    engine
        .ratings()
        .submit(NewRating::new("starfield", "@Zag", 2.0))
        .await
        .unwrap();

    let list = engine.tier_list(None).await.unwrap();
    assert_eq!(list.group(Tier::SPlus).unwrap().products[0].product.slug, "hades-ii");
    assert_eq!(list.group(Tier::E).unwrap().products[0].product.slug, "starfield");
}
