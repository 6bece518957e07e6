//! Tests for the config server and the startup config fetch

mod common;

use serde_json::Value;
use std::path::PathBuf;
use tempfile::TempDir;

use orghub::infrastructure::config_api::{self, ConfigServerState};
use orghub::infrastructure::config::ServiceConfig;

async fn spawn_config_server(config_dir: PathBuf) -> String {
    common::spawn_app(config_api::router(ConfigServerState { config_dir })).await
}

#[tokio::test]
async fn test_serves_application_document() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("employee.toml"),
        r#"
[server]
host = "0.0.0.0"
port = 9081

[employee]
department_service_url = "http://departments.internal:8082"
"#,
    )
    .unwrap();
    let base_url = spawn_config_server(dir.path().to_path_buf()).await;

    let response = reqwest::get(format!("{}/config/employee", base_url))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["application"], "employee");
    assert!(body.get("profile").is_none());
    assert_eq!(body["config"]["server"]["port"], 9081);
    assert_eq!(
        body["config"]["employee"]["department_service_url"],
        "http://departments.internal:8082"
    );
}

#[tokio::test]
async fn test_profile_document_overrides_base_values() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("employee.toml"),
        r#"
[server]
host = "127.0.0.1"
port = 8081

[cache]
ttl_secs = 60
"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("employee-prod.toml"),
        r#"
[server]
port = 80

[cache]
ttl_secs = 300
"#,
    )
    .unwrap();
    let base_url = spawn_config_server(dir.path().to_path_buf()).await;

    let body: Value = reqwest::get(format!("{}/config/employee/prod", base_url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["profile"], "prod");
    // Profile wins where it speaks, the base fills the rest
    assert_eq!(body["config"]["server"]["port"], 80);
    assert_eq!(body["config"]["server"]["host"], "127.0.0.1");
    assert_eq!(body["config"]["cache"]["ttl_secs"], 300);
}

#[tokio::test]
async fn test_unknown_application_returns_404_problem() {
    let dir = TempDir::new().unwrap();
    let base_url = spawn_config_server(dir.path().to_path_buf()).await;

    let response = reqwest::get(format!("{}/config/missing", base_url))
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["title"], "Resource Not Found");
    assert!(body["traceId"].is_string());
}

#[tokio::test]
async fn test_path_traversal_names_are_rejected() {
    let dir = TempDir::new().unwrap();
    let base_url = spawn_config_server(dir.path().to_path_buf()).await;

    let response = reqwest::get(format!("{}/config/..%2Fetc%2Fpasswd", base_url))
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_service_config_fetch_remote() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("product.toml"),
        r#"
[product]
store_api_url = "http://store.internal"
request_timeout_secs = 3

[cache]
ttl_secs = 120
"#,
    )
    .unwrap();
    let base_url = spawn_config_server(dir.path().to_path_buf()).await;

    let config = ServiceConfig::fetch_remote(&base_url, "product", None)
        .await
        .unwrap();

    assert_eq!(config.product.store_api_url, "http://store.internal");
    assert_eq!(config.product.request_timeout_secs, 3);
    assert_eq!(config.cache.ttl_secs, 120);
    // Sections the document does not mention keep their defaults
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.idempotency.ttl_secs, 24 * 60 * 60);
}
