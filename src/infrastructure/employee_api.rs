use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    middleware,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::application::{dto::*, use_cases::EmployeeUseCase};
use crate::domain::{
    repositories::{EmployeeFilter, Page},
    value_objects::IdempotencyKey,
};

use super::{
    cache::ResponseCache,
    problem::ApiError,
    server::{health, page_request},
    trace,
};

pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

const EMPLOYEES_REGION: &str = "employees";
const STATS_REGION: &str = "employee-stats";

#[derive(Clone)]
pub struct EmployeeApiState {
    pub employees: Arc<EmployeeUseCase>,
    pub cache: Arc<ResponseCache>,
}

/// Both API surfaces: plain v1 and the cached v2 variant.
pub fn router(state: EmployeeApiState) -> Router {
    Router::new()
        .route("/api/v1/employees", get(list).post(create))
        .route("/api/v1/employees/search", get(search))
        .route("/api/v1/employees/stats", get(stats))
        .route(
            "/api/v1/employees/{id}",
            get(by_id)
                .put(update)
                .patch(patch_employee)
                .delete(delete_employee),
        )
        .route("/api/v2/employees", get(list).post(create_v2))
        .route("/api/v2/employees/search", get(search))
        .route("/api/v2/employees/stats", get(stats_v2))
        .route(
            "/api/v2/employees/{id}",
            get(by_id_v2)
                .put(update_v2)
                .patch(patch_v2)
                .delete(delete_v2),
        )
        .route("/health", get(health))
        .layer(middleware::from_fn(trace::trace_requests))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListParams {
    email: Option<String>,
    last_name: Option<String>,
    department_id: Option<i64>,
    page: Option<usize>,
    size: Option<usize>,
    sort: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetailParams {
    #[serde(default)]
    include_department: bool,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    query: String,
    page: Option<usize>,
    size: Option<usize>,
    sort: Option<String>,
}

async fn list(
    State(state): State<EmployeeApiState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Page<EmployeeDto>>, ApiError> {
    let filter = EmployeeFilter {
        email: params.email,
        last_name: params.last_name,
        department_id: params.department_id,
    };
    let page = page_request(params.page, params.size, params.sort.as_deref());
    Ok(Json(state.employees.list(filter, page).await?))
}

async fn by_id(
    State(state): State<EmployeeApiState>,
    Path(id): Path<i64>,
    Query(params): Query<DetailParams>,
) -> Result<Json<EmployeeDto>, ApiError> {
    Ok(Json(state.employees.get(id, params.include_department).await?))
}

async fn create(
    State(state): State<EmployeeApiState>,
    headers: HeaderMap,
    Json(payload): Json<EmployeePayload>,
) -> Result<(StatusCode, Json<EmployeeDto>), ApiError> {
    let key = idempotency_key(&headers);
    let created = state.employees.create(payload, key).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update(
    State(state): State<EmployeeApiState>,
    Path(id): Path<i64>,
    Json(payload): Json<EmployeePayload>,
) -> Result<Json<EmployeeDto>, ApiError> {
    Ok(Json(state.employees.update(id, payload).await?))
}

async fn patch_employee(
    State(state): State<EmployeeApiState>,
    Path(id): Path<i64>,
    Json(payload): Json<EmployeePayload>,
) -> Result<Json<EmployeeDto>, ApiError> {
    Ok(Json(state.employees.patch(id, payload).await?))
}

async fn delete_employee(
    State(state): State<EmployeeApiState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.employees.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn search(
    State(state): State<EmployeeApiState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Page<EmployeeDto>>, ApiError> {
    let page = page_request(params.page, params.size, params.sort.as_deref());
    Ok(Json(state.employees.search(&params.query, page).await?))
}

async fn stats(State(state): State<EmployeeApiState>) -> Result<Json<EmployeeStatsDto>, ApiError> {
    Ok(Json(state.employees.stats().await?))
}

// v2: identical semantics with a response cache in front of the reads and
// region eviction behind the writes.

async fn by_id_v2(
    State(state): State<EmployeeApiState>,
    Path(id): Path<i64>,
    Query(params): Query<DetailParams>,
) -> Result<Json<EmployeeDto>, ApiError> {
    let key = format!("{}:{}", id, params.include_department);
    if let Some(cached) = state.cache.lookup::<EmployeeDto>(EMPLOYEES_REGION, &key) {
        return Ok(Json(cached));
    }
    let dto = state.employees.get(id, params.include_department).await?;
    state.cache.store(EMPLOYEES_REGION, &key, &dto);
    Ok(Json(dto))
}

async fn stats_v2(
    State(state): State<EmployeeApiState>,
) -> Result<Json<EmployeeStatsDto>, ApiError> {
    if let Some(cached) = state.cache.lookup::<EmployeeStatsDto>(STATS_REGION, "all") {
        return Ok(Json(cached));
    }
    let stats = state.employees.stats().await?;
    state.cache.store(STATS_REGION, "all", &stats);
    Ok(Json(stats))
}

async fn create_v2(
    State(state): State<EmployeeApiState>,
    headers: HeaderMap,
    Json(payload): Json<EmployeePayload>,
) -> Result<(StatusCode, Json<EmployeeDto>), ApiError> {
    let key = idempotency_key(&headers);
    let created = state.employees.create(payload, key).await?;
    state.cache.evict_regions(&[EMPLOYEES_REGION, STATS_REGION]);
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_v2(
    State(state): State<EmployeeApiState>,
    Path(id): Path<i64>,
    Json(payload): Json<EmployeePayload>,
) -> Result<Json<EmployeeDto>, ApiError> {
    let updated = state.employees.update(id, payload).await?;
    state.cache.evict_regions(&[EMPLOYEES_REGION, STATS_REGION]);
    Ok(Json(updated))
}

async fn patch_v2(
    State(state): State<EmployeeApiState>,
    Path(id): Path<i64>,
    Json(payload): Json<EmployeePayload>,
) -> Result<Json<EmployeeDto>, ApiError> {
    let updated = state.employees.patch(id, payload).await?;
    state.cache.evict_regions(&[EMPLOYEES_REGION, STATS_REGION]);
    Ok(Json(updated))
}

async fn delete_v2(
    State(state): State<EmployeeApiState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.employees.delete(id).await?;
    state.cache.evict_regions(&[EMPLOYEES_REGION, STATS_REGION]);
    Ok(StatusCode::NO_CONTENT)
}

fn idempotency_key(headers: &HeaderMap) -> Option<IdempotencyKey> {
    IdempotencyKey::parse(
        headers
            .get(IDEMPOTENCY_KEY_HEADER)
            .and_then(|value| value.to_str().ok()),
    )
}
