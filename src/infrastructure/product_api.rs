use axum::{
    extract::{Path, Query, State},
    middleware,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::application::{dto::*, use_cases::ProductUseCase};

use super::{cache::ResponseCache, problem::ApiError, server::health, trace};

const PRODUCTS_REGION: &str = "products";
const CATEGORIES_REGION: &str = "categories";
const STATS_REGION: &str = "product-stats";

#[derive(Clone)]
pub struct ProductApiState {
    pub products: Arc<ProductUseCase>,
    pub cache: Arc<ResponseCache>,
}

pub fn router(state: ProductApiState) -> Router {
    Router::new()
        .route("/api/v2/products", get(list))
        .route("/api/v2/products/categories", get(categories))
        .route("/api/v2/products/category/{category}", get(by_category))
        .route("/api/v2/products/search", get(search))
        .route("/api/v2/products/stats", get(stats))
        .route("/api/v2/products/price-range", get(by_price_range))
        .route("/api/v2/products/{id}", get(by_id))
        .route("/health", get(health))
        .layer(middleware::from_fn(trace::trace_requests))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct ListParams {
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    query: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PriceRangeParams {
    min: Option<f64>,
    max: Option<f64>,
}

/// Full catalog; an explicit `limit` bypasses the cache because the upstream
/// applies it server-side.
async fn list(
    State(state): State<ProductApiState>,
    Query(params): Query<ListParams>,
) -> Json<Vec<ProductDto>> {
    if params.limit.is_some() {
        return Json(state.products.list(params.limit).await);
    }
    if let Some(cached) = state.cache.lookup::<Vec<ProductDto>>(PRODUCTS_REGION, "all") {
        return Json(cached);
    }
    let products = state.products.list(None).await;
    if !products.is_empty() {
        state.cache.store(PRODUCTS_REGION, "all", &products);
    }
    Json(products)
}

async fn by_id(
    State(state): State<ProductApiState>,
    Path(id): Path<i64>,
) -> Result<Json<ProductDto>, ApiError> {
    let key = id.to_string();
    if let Some(cached) = state.cache.lookup::<ProductDto>(PRODUCTS_REGION, &key) {
        return Ok(Json(cached));
    }
    let product = state.products.by_id(id).await?;
    state.cache.store(PRODUCTS_REGION, &key, &product);
    Ok(Json(product))
}

async fn categories(State(state): State<ProductApiState>) -> Json<Vec<String>> {
    if let Some(cached) = state.cache.lookup::<Vec<String>>(CATEGORIES_REGION, "all") {
        return Json(cached);
    }
    let categories = state.products.categories().await;
    if !categories.is_empty() {
        state.cache.store(CATEGORIES_REGION, "all", &categories);
    }
    Json(categories)
}

async fn by_category(
    State(state): State<ProductApiState>,
    Path(category): Path<String>,
) -> Json<Vec<ProductDto>> {
    let key = format!("category:{}", category);
    if let Some(cached) = state.cache.lookup::<Vec<ProductDto>>(PRODUCTS_REGION, &key) {
        return Json(cached);
    }
    let products = state.products.by_category(&category).await;
    if !products.is_empty() {
        state.cache.store(PRODUCTS_REGION, &key, &products);
    }
    Json(products)
}

async fn search(
    State(state): State<ProductApiState>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<ProductDto>> {
    Json(state.products.search(params.query.as_deref()).await)
}

async fn stats(State(state): State<ProductApiState>) -> Json<ProductStatsDto> {
    if let Some(cached) = state.cache.lookup::<ProductStatsDto>(STATS_REGION, "all") {
        return Json(cached);
    }
    let stats = state.products.stats().await;
    if stats.total_products > 0 {
        state.cache.store(STATS_REGION, "all", &stats);
    }
    Json(stats)
}

async fn by_price_range(
    State(state): State<ProductApiState>,
    Query(params): Query<PriceRangeParams>,
) -> Json<Vec<ProductDto>> {
    Json(state.products.by_price_range(params.min, params.max).await)
}
