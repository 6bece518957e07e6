//! Ports for the HTTP calls this suite makes to its own peer services and to
//! the upstream store API. Implementations live in `infrastructure::clients`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{entities::Product, errors::ClientError};

/// A department as seen from another service, embedded in enriched responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentSummary {
    pub id: i64,
    pub name: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// An employee as seen from another service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSummary {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<i64>,
}

/// Employee-service view of the department service.
#[async_trait]
pub trait DepartmentDirectory: Send + Sync {
    /// `Ok(None)` means the department does not exist; transport failures are
    /// the implementation's concern (the HTTP client substitutes a fallback
    /// summary instead of failing the caller).
    async fn find_summary(&self, id: i64) -> Result<Option<DepartmentSummary>, ClientError>;
}

/// Department-service view of the employee service, used for the protective
/// delete and the composed per-department employee listing.
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    async fn count_in_department(&self, department_id: i64) -> Result<u64, ClientError>;
    async fn list_in_department(
        &self,
        department_id: i64,
    ) -> Result<Vec<EmployeeSummary>, ClientError>;
}

/// Product-service view of the upstream store API.
#[async_trait]
pub trait StoreGateway: Send + Sync {
    async fn all_products(&self) -> Result<Vec<Product>, ClientError>;
    async fn product_by_id(&self, id: i64) -> Result<Option<Product>, ClientError>;
    async fn categories(&self) -> Result<Vec<String>, ClientError>;
    async fn products_in_category(&self, category: &str) -> Result<Vec<Product>, ClientError>;
    async fn products_with_limit(&self, limit: usize) -> Result<Vec<Product>, ClientError>;
}
