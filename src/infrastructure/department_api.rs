use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::application::{dto::*, use_cases::DepartmentUseCase};
use crate::domain::{
    entities::Department,
    repositories::{DepartmentFilter, Page},
};

use super::{
    problem::ApiError,
    server::{health, page_request},
    trace,
};

#[derive(Clone)]
pub struct DepartmentApiState {
    pub departments: Arc<DepartmentUseCase>,
}

pub fn router(state: DepartmentApiState) -> Router {
    Router::new()
        .route("/api/v1/departments", get(list).post(create))
        .route("/api/v1/departments/by-code/{code}", get(by_code))
        .route(
            "/api/v1/departments/{id}",
            get(by_id)
                .put(update)
                .patch(patch_department)
                .delete(delete_department),
        )
        .route("/api/v1/departments/{id}/employees", get(employees))
        .route("/health", get(health))
        .layer(middleware::from_fn(trace::trace_requests))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct ListParams {
    name: Option<String>,
    code: Option<String>,
    page: Option<usize>,
    size: Option<usize>,
    sort: Option<String>,
}

async fn list(
    State(state): State<DepartmentApiState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Page<Department>>, ApiError> {
    let filter = DepartmentFilter {
        name: params.name,
        code: params.code,
    };
    let page = page_request(params.page, params.size, params.sort.as_deref());
    Ok(Json(state.departments.list(filter, page).await?))
}

async fn by_id(
    State(state): State<DepartmentApiState>,
    Path(id): Path<i64>,
) -> Result<Json<Department>, ApiError> {
    Ok(Json(state.departments.get(id).await?))
}

async fn by_code(
    State(state): State<DepartmentApiState>,
    Path(code): Path<String>,
) -> Result<Json<Department>, ApiError> {
    Ok(Json(state.departments.get_by_code(&code).await?))
}

async fn create(
    State(state): State<DepartmentApiState>,
    Json(payload): Json<DepartmentPayload>,
) -> Result<(StatusCode, Json<Department>), ApiError> {
    let created = state.departments.create(payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update(
    State(state): State<DepartmentApiState>,
    Path(id): Path<i64>,
    Json(payload): Json<DepartmentPayload>,
) -> Result<Json<Department>, ApiError> {
    Ok(Json(state.departments.update(id, payload).await?))
}

async fn patch_department(
    State(state): State<DepartmentApiState>,
    Path(id): Path<i64>,
    Json(payload): Json<DepartmentPayload>,
) -> Result<Json<Department>, ApiError> {
    Ok(Json(state.departments.patch(id, payload).await?))
}

async fn delete_department(
    State(state): State<DepartmentApiState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.departments.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn employees(
    State(state): State<DepartmentApiState>,
    Path(id): Path<i64>,
) -> Result<Json<DepartmentEmployeesDto>, ApiError> {
    Ok(Json(state.departments.employees_of(id).await?))
}
