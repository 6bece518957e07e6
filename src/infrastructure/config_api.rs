use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use log::warn;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

use super::{problem::ProblemDetail, server::health, trace};

#[derive(Clone)]
pub struct ConfigServerState {
    pub config_dir: PathBuf,
}

/// Config server: serves per-application TOML documents from a directory as
/// JSON, with profile-specific overrides merged on top
/// (`{app}.toml` + `{app}-{profile}.toml`).
pub fn router(state: ConfigServerState) -> Router {
    Router::new()
        .route("/config/{application}", get(application_config))
        .route("/config/{application}/{profile}", get(profile_config))
        .route("/health", get(health))
        .layer(middleware::from_fn(trace::trace_requests))
        .with_state(state)
}

/// Document returned to services fetching their configuration
#[derive(Debug, Serialize)]
pub struct ConfigDocument {
    pub application: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    pub config: Value,
}

#[derive(Debug)]
enum ConfigApiError {
    NotFound(String),
    Unreadable(String),
}

impl IntoResponse for ConfigApiError {
    fn into_response(self) -> Response {
        let problem = match self {
            ConfigApiError::NotFound(application) => ProblemDetail::new(
                StatusCode::NOT_FOUND,
                "Resource Not Found",
                format!("No configuration found for application '{}'", application),
            ),
            ConfigApiError::Unreadable(detail) => {
                warn!("Could not serve configuration: {}", detail);
                ProblemDetail::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    "An unexpected error occurred",
                )
            }
        };
        let status =
            StatusCode::from_u16(problem.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(problem)).into_response()
    }
}

async fn application_config(
    State(state): State<ConfigServerState>,
    Path(application): Path<String>,
) -> Result<Json<ConfigDocument>, ConfigApiError> {
    let config = load_merged(&state.config_dir, &application, None)?;
    Ok(Json(ConfigDocument {
        application,
        profile: None,
        config,
    }))
}

async fn profile_config(
    State(state): State<ConfigServerState>,
    Path((application, profile)): Path<(String, String)>,
) -> Result<Json<ConfigDocument>, ConfigApiError> {
    let config = load_merged(&state.config_dir, &application, Some(&profile))?;
    Ok(Json(ConfigDocument {
        application,
        profile: Some(profile),
        config,
    }))
}

fn load_merged(
    dir: &std::path::Path,
    application: &str,
    profile: Option<&str>,
) -> Result<Value, ConfigApiError> {
    if !valid_name(application) || !profile.is_none_or(valid_name) {
        return Err(ConfigApiError::NotFound(application.to_string()));
    }

    let mut merged = load_table(dir, application)?
        .ok_or_else(|| ConfigApiError::NotFound(application.to_string()))?;

    if let Some(profile) = profile {
        if let Some(overlay) = load_table(dir, &format!("{}-{}", application, profile))? {
            merge_tables(&mut merged, overlay);
        }
    }

    serde_json::to_value(merged).map_err(|e| ConfigApiError::Unreadable(e.to_string()))
}

fn load_table(dir: &std::path::Path, stem: &str) -> Result<Option<toml::Table>, ConfigApiError> {
    let path = dir.join(format!("{}.toml", stem));
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(&path)
        .map_err(|e| ConfigApiError::Unreadable(format!("{}: {}", path.display(), e)))?;
    raw.parse::<toml::Table>()
        .map(Some)
        .map_err(|e| ConfigApiError::Unreadable(format!("{}: {}", path.display(), e)))
}

/// Profile values win; nested tables merge recursively, everything else is
/// replaced wholesale.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(base_table)), toml::Value::Table(overlay_table)) => {
                merge_tables(base_table, overlay_table);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Application and profile names map onto file names; keep them boring.
fn valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
