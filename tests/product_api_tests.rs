//! Black-box tests for the product service, backed by a mocked upstream store

mod common;

use httpmock::prelude::*;
use serde_json::{json, Value};

fn catalog() -> Value {
    json!([
        { "id": 1, "title": "Gold Ring", "price": 120.0, "description": "14k gold",
          "category": "jewelery", "image": "http://img/1.png",
          "rating": { "rate": 4.5, "count": 120 } },
        { "id": 2, "title": "Cotton Shirt", "price": 20.5, "description": "Plain shirt",
          "category": "clothing", "image": "http://img/2.png",
          "rating": { "rate": 3.9, "count": 70 } },
        { "id": 3, "title": "Silver Necklace", "price": 60.0, "description": "Sterling silver",
          "category": "jewelery", "image": "http://img/3.png",
          "rating": { "rate": 4.1, "count": 35 } }
    ])
}

#[tokio::test]
async fn test_list_proxies_upstream_catalog() {
    let store = MockServer::start();
    store.mock(|when, then| {
        when.method(GET).path("/products");
        then.status(200).json_body(catalog());
    });
    let harness = common::spawn_product_service(&store.base_url()).await;

    let response = reqwest::get(format!("{}/api/v2/products", harness.base_url))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 3);
    assert_eq!(body[0]["title"], "Gold Ring");
    assert_eq!(body[0]["rating"]["count"], 120);
}

#[tokio::test]
async fn test_list_is_served_from_cache_on_repeat() {
    let store = MockServer::start();
    let upstream = store.mock(|when, then| {
        when.method(GET).path("/products");
        then.status(200).json_body(catalog());
    });
    let harness = common::spawn_product_service(&store.base_url()).await;
    let url = format!("{}/api/v2/products", harness.base_url);

    reqwest::get(&url).await.unwrap();
    let second: Value = reqwest::get(&url).await.unwrap().json().await.unwrap();

    assert_eq!(second.as_array().unwrap().len(), 3);
    upstream.assert_hits(1);
}

#[tokio::test]
async fn test_limit_bypasses_cache() {
    let store = MockServer::start();
    let upstream = store.mock(|when, then| {
        when.method(GET).path("/products").query_param("limit", "2");
        then.status(200)
            .json_body(json!([catalog()[0].clone(), catalog()[1].clone()]));
    });
    let harness = common::spawn_product_service(&store.base_url()).await;
    let url = format!("{}/api/v2/products?limit=2", harness.base_url);

    let first: Value = reqwest::get(&url).await.unwrap().json().await.unwrap();
    reqwest::get(&url).await.unwrap();

    assert_eq!(first.as_array().unwrap().len(), 2);
    upstream.assert_hits(2);
}

#[tokio::test]
async fn test_product_by_id_and_upstream_404() {
    let store = MockServer::start();
    store.mock(|when, then| {
        when.method(GET).path("/products/1");
        then.status(200).json_body(catalog()[0].clone());
    });
    store.mock(|when, then| {
        when.method(GET).path("/products/99");
        then.status(404);
    });
    let harness = common::spawn_product_service(&store.base_url()).await;

    let body: Value = reqwest::get(format!("{}/api/v2/products/1", harness.base_url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["title"], "Gold Ring");

    let response = reqwest::get(format!("{}/api/v2/products/99", harness.base_url))
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    let problem: Value = response.json().await.unwrap();
    assert_eq!(problem["title"], "Resource Not Found");
}

#[tokio::test]
async fn test_product_detail_is_cached() {
    let store = MockServer::start();
    let upstream = store.mock(|when, then| {
        when.method(GET).path("/products/1");
        then.status(200).json_body(catalog()[0].clone());
    });
    let harness = common::spawn_product_service(&store.base_url()).await;
    let url = format!("{}/api/v2/products/1", harness.base_url);

    reqwest::get(&url).await.unwrap();
    reqwest::get(&url).await.unwrap();

    upstream.assert_hits(1);
}

#[tokio::test]
async fn test_categories_endpoint_is_cached() {
    let store = MockServer::start();
    let upstream = store.mock(|when, then| {
        when.method(GET).path("/products/categories");
        then.status(200).json_body(json!(["clothing", "jewelery"]));
    });
    let harness = common::spawn_product_service(&store.base_url()).await;
    let url = format!("{}/api/v2/products/categories", harness.base_url);

    let body: Value = reqwest::get(&url).await.unwrap().json().await.unwrap();
    reqwest::get(&url).await.unwrap();

    assert_eq!(body, json!(["clothing", "jewelery"]));
    upstream.assert_hits(1);
}

#[tokio::test]
async fn test_products_by_category() {
    let store = MockServer::start();
    store.mock(|when, then| {
        when.method(GET).path("/products/category/jewelery");
        then.status(200)
            .json_body(json!([catalog()[0].clone(), catalog()[2].clone()]));
    });
    let harness = common::spawn_product_service(&store.base_url()).await;

    let body: Value = reqwest::get(format!(
        "{}/api/v2/products/category/jewelery",
        harness.base_url
    ))
    .await
    .unwrap()
    .json()
    .await
    .unwrap();

    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[1]["title"], "Silver Necklace");
}

#[tokio::test]
async fn test_search_filters_title_description_and_category() {
    let store = MockServer::start();
    store.mock(|when, then| {
        when.method(GET).path("/products");
        then.status(200).json_body(catalog());
    });
    let harness = common::spawn_product_service(&store.base_url()).await;

    let body: Value = reqwest::get(format!(
        "{}/api/v2/products/search?query=gold",
        harness.base_url
    ))
    .await
    .unwrap()
    .json()
    .await
    .unwrap();
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], 1);

    // Matches category, case-insensitive
    let body: Value = reqwest::get(format!(
        "{}/api/v2/products/search?query=JEWEL",
        harness.base_url
    ))
    .await
    .unwrap()
    .json()
    .await
    .unwrap();
    assert_eq!(body.as_array().unwrap().len(), 2);

    // A blank query matches everything
    let body: Value = reqwest::get(format!("{}/api/v2/products/search", harness.base_url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_stats_aggregates_catalog() {
    let store = MockServer::start();
    store.mock(|when, then| {
        when.method(GET).path("/products");
        then.status(200).json_body(catalog());
    });
    let harness = common::spawn_product_service(&store.base_url()).await;

    let body: Value = reqwest::get(format!("{}/api/v2/products/stats", harness.base_url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["totalProducts"], 3);
    assert_eq!(body["categories"], json!(["clothing", "jewelery"]));
    assert_eq!(body["productsByCategory"]["jewelery"], 2);
    // (120 + 20.5 + 60) / 3 = 66.83 after rounding to two decimals
    assert_eq!(body["averagePrice"], 66.83);
    assert_eq!(body["minPrice"], 20.5);
    assert_eq!(body["maxPrice"], 120.0);
}

#[tokio::test]
async fn test_price_range_filters_inclusive_bounds() {
    let store = MockServer::start();
    store.mock(|when, then| {
        when.method(GET).path("/products");
        then.status(200).json_body(catalog());
    });
    let harness = common::spawn_product_service(&store.base_url()).await;

    let body: Value = reqwest::get(format!(
        "{}/api/v2/products/price-range?min=20.5&max=100",
        harness.base_url
    ))
    .await
    .unwrap()
    .json()
    .await
    .unwrap();

    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Cotton Shirt", "Silver Necklace"]);
}

#[tokio::test]
async fn test_upstream_failure_degrades_to_empty_list() {
    let harness = common::spawn_product_service(&common::unreachable_url()).await;

    let response = reqwest::get(format!("{}/api/v2/products", harness.base_url))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!([]));
}
