use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::domain::errors::ClientError;

pub const DEPARTMENT_SERVICE_PORT: u16 = 8082;
pub const EMPLOYEE_SERVICE_PORT: u16 = 8081;
pub const PRODUCT_SERVICE_PORT: u16 = 8083;
pub const CONFIG_SERVER_PORT: u16 = 8888;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Could not fetch remote config: {0}")]
    Fetch(#[from] ClientError),
}

/// Configuration shared by all service subcommands. Every field has a
/// default, so a service starts with no config at all; a TOML file or a
/// config-server document overrides selectively.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub department: DepartmentConfig,
    pub employee: EmployeeConfig,
    pub product: ProductConfig,
    pub cache: CacheConfig,
    pub idempotency: IdempotencyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    /// Unset means the service's conventional default port.
    pub port: Option<u16>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: None,
        }
    }
}

/// Settings consumed by the department service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DepartmentConfig {
    pub employee_service_url: String,
}

impl Default for DepartmentConfig {
    fn default() -> Self {
        Self {
            employee_service_url: format!("http://127.0.0.1:{}", EMPLOYEE_SERVICE_PORT),
        }
    }
}

/// Settings consumed by the employee service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployeeConfig {
    pub department_service_url: String,
}

impl Default for EmployeeConfig {
    fn default() -> Self {
        Self {
            department_service_url: format!("http://127.0.0.1:{}", DEPARTMENT_SERVICE_PORT),
        }
    }
}

/// Settings consumed by the product service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductConfig {
    pub store_api_url: String,
    pub request_timeout_secs: u64,
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self {
            store_api_url: "https://fakestoreapi.com".to_string(),
            request_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_secs: 60 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdempotencyConfig {
    pub ttl_secs: u64,
}

impl Default for IdempotencyConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 24 * 60 * 60,
        }
    }
}

/// Shape of a config-server response; `config` holds the merged document.
#[derive(Debug, Deserialize)]
struct RemoteConfigDocument {
    config: ServiceConfig,
}

impl ServiceConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config = toml::from_str(&raw)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Fetch this service's document from a config server at startup.
    pub async fn fetch_remote(
        base_url: &str,
        application: &str,
        profile: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let url = match profile {
            Some(profile) => format!("{}/config/{}/{}", base_url, application, profile),
            None => format!("{}/config/{}", base_url, application),
        };
        let response = reqwest::get(&url).await.map_err(ClientError::from)?;
        if !response.status().is_success() {
            return Err(ConfigError::Fetch(ClientError::UnexpectedStatus(
                response.status().as_u16(),
            )));
        }
        let document = response
            .json::<RemoteConfigDocument>()
            .await
            .map_err(|e| ConfigError::Fetch(ClientError::Decode(e.to_string())))?;
        info!("Loaded configuration from config server at {}", url);
        Ok(document.config)
    }
}
