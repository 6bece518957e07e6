use async_trait::async_trait;
use log::{info, warn};
use std::time::Duration;

use crate::domain::{clients::*, entities::Product, errors::ClientError, repositories::Page};

pub const DEFAULT_CLIENT_TIMEOUT: Duration = Duration::from_secs(10);

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

fn build_client(timeout: Duration) -> Result<reqwest::Client, ClientError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(ClientError::from)
}

/// HTTP client for the department service, used by the employee service to
/// enrich responses. When the peer is down the caller still gets a summary:
/// a placeholder marking the service unavailable, the same degradation the
/// original declarative client performed through its fallback.
pub struct HttpDepartmentDirectory {
    http: reqwest::Client,
    base_url: String,
}

impl HttpDepartmentDirectory {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self {
            http: build_client(timeout)?,
            base_url: base_url.into(),
        })
    }

    fn fallback_summary(id: i64) -> DepartmentSummary {
        DepartmentSummary {
            id,
            name: "Department Service Unavailable".to_string(),
            code: "SERVICE_DOWN".to_string(),
            description: Some(
                "Department service is temporarily down, please try again later".to_string(),
            ),
        }
    }
}

#[async_trait]
impl DepartmentDirectory for HttpDepartmentDirectory {
    async fn find_summary(&self, id: i64) -> Result<Option<DepartmentSummary>, ClientError> {
        let url = format!("{}/api/v1/departments/{}", self.base_url, id);
        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Department service unreachable ({}), using fallback", e);
                return Ok(Some(Self::fallback_summary(id)));
            }
        };

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            warn!(
                "Department service returned {} for {}, using fallback",
                response.status(),
                url
            );
            return Ok(Some(Self::fallback_summary(id)));
        }

        match response.json::<DepartmentSummary>().await {
            Ok(summary) => Ok(Some(summary)),
            Err(e) => {
                warn!("Could not decode department {}: {}, using fallback", id, e);
                Ok(Some(Self::fallback_summary(id)))
            }
        }
    }
}

/// HTTP client for the employee service, used by the department service for
/// the protective delete check and the composed per-department listing.
pub struct HttpEmployeeDirectory {
    http: reqwest::Client,
    base_url: String,
}

impl HttpEmployeeDirectory {
    /// Page size used when composing the full per-department listing.
    const LISTING_PAGE_SIZE: usize = 200;

    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self {
            http: build_client(timeout)?,
            base_url: base_url.into(),
        })
    }

    async fn fetch_page(
        &self,
        department_id: i64,
        size: usize,
    ) -> Result<Page<EmployeeSummary>, ClientError> {
        let url = format!(
            "{}/api/v1/employees?departmentId={}&page=0&size={}",
            self.base_url, department_id, size
        );
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::UnexpectedStatus(response.status().as_u16()));
        }
        response
            .json::<Page<EmployeeSummary>>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[async_trait]
impl EmployeeDirectory for HttpEmployeeDirectory {
    async fn count_in_department(&self, department_id: i64) -> Result<u64, ClientError> {
        Ok(self.fetch_page(department_id, 1).await?.total_elements)
    }

    async fn list_in_department(
        &self,
        department_id: i64,
    ) -> Result<Vec<EmployeeSummary>, ClientError> {
        let page = self
            .fetch_page(department_id, Self::LISTING_PAGE_SIZE)
            .await?;
        if page.total_elements > page.content.len() as u64 {
            info!(
                "Department {} has {} employees, returning the first {}",
                department_id,
                page.total_elements,
                page.content.len()
            );
        }
        Ok(page.content)
    }
}

/// HTTP client for the upstream store API the product service proxies.
pub struct HttpStoreGateway {
    http: reqwest::Client,
    base_url: String,
}

impl HttpStoreGateway {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self {
            http: build_client(timeout)?,
            base_url: base_url.into(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::UnexpectedStatus(response.status().as_u16()));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[async_trait]
impl StoreGateway for HttpStoreGateway {
    async fn all_products(&self) -> Result<Vec<Product>, ClientError> {
        self.get_json("/products").await
    }

    async fn product_by_id(&self, id: i64) -> Result<Option<Product>, ClientError> {
        let url = format!("{}/products/{}", self.base_url, id);
        let response = self.http.get(&url).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(ClientError::UnexpectedStatus(response.status().as_u16()));
        }
        response
            .json::<Product>()
            .await
            .map(Some)
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn categories(&self) -> Result<Vec<String>, ClientError> {
        self.get_json("/products/categories").await
    }

    async fn products_in_category(&self, category: &str) -> Result<Vec<Product>, ClientError> {
        self.get_json(&format!("/products/category/{}", category))
            .await
    }

    async fn products_with_limit(&self, limit: usize) -> Result<Vec<Product>, ClientError> {
        self.get_json(&format!("/products?limit={}", limit)).await
    }
}
