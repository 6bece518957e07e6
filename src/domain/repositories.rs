use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{entities::*, errors::RepositoryError};

pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Requested ordering, parsed from the `sort=field,asc` query form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    /// Parse `"lastName,desc"` / `"lastName"`; blank input yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.splitn(2, ',');
        let field = parts.next()?.trim();
        if field.is_empty() {
            return None;
        }
        let direction = match parts.next().map(|d| d.trim().to_lowercase()) {
            Some(d) if d == "desc" => SortDirection::Desc,
            _ => SortDirection::Asc,
        };
        Some(Sort {
            field: field.to_string(),
            direction,
        })
    }
}

/// Zero-based page request with an optional sort.
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
    pub sort: Option<Sort>,
}

impl PageRequest {
    pub fn new(page: usize, size: usize) -> Self {
        Self {
            page,
            size: size.max(1),
            sort: None,
        }
    }

    pub fn with_sort(mut self, sort: Option<Sort>) -> Self {
        self.sort = sort;
        self
    }

    pub fn offset(&self) -> usize {
        self.page * self.size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}

/// One page of results plus the totals clients use to paginate further.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u64,
    pub size: usize,
    pub number: usize,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, total_elements: u64, request: &PageRequest) -> Self {
        let size = request.size.max(1);
        Self {
            content,
            total_elements,
            total_pages: total_elements.div_ceil(size as u64),
            size,
            number: request.page,
        }
    }

    /// Map page content while keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            size: self.size,
            number: self.number,
        }
    }
}

/// Filters for the department listing: contains-matches, case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct DepartmentFilter {
    pub name: Option<String>,
    pub code: Option<String>,
}

/// Filters for the employee listing. Email matches exactly; last name is a
/// case-insensitive contains-match.
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    pub email: Option<String>,
    pub last_name: Option<String>,
    pub department_id: Option<i64>,
}

/// Repository for departments
#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    /// Insert (id 0) or update; returns the stored row with its id assigned.
    async fn save(&self, department: Department) -> Result<Department, RepositoryError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Department>, RepositoryError>;
    async fn find_by_code(&self, code: &str) -> Result<Option<Department>, RepositoryError>;
    async fn exists_by_code(&self, code: &str) -> Result<bool, RepositoryError>;
    async fn delete_by_id(&self, id: i64) -> Result<(), RepositoryError>;
    async fn list(
        &self,
        filter: &DepartmentFilter,
        page: &PageRequest,
    ) -> Result<Page<Department>, RepositoryError>;
}

/// Repository for employees
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Insert (id 0) or update; returns the stored row with its id assigned.
    async fn save(&self, employee: Employee) -> Result<Employee, RepositoryError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Employee>, RepositoryError>;
    async fn exists_by_id(&self, id: i64) -> Result<bool, RepositoryError>;
    async fn exists_by_email(&self, email: &str) -> Result<bool, RepositoryError>;
    async fn delete_by_id(&self, id: i64) -> Result<(), RepositoryError>;
    async fn list(
        &self,
        filter: &EmployeeFilter,
        page: &PageRequest,
    ) -> Result<Page<Employee>, RepositoryError>;
    /// Case-insensitive contains-search over first name, last name, and email.
    async fn search(&self, query: &str, page: &PageRequest)
        -> Result<Page<Employee>, RepositoryError>;
    async fn count(&self) -> Result<u64, RepositoryError>;
    async fn count_by_department(&self) -> Result<HashMap<i64, u64>, RepositoryError>;
    async fn count_without_department(&self) -> Result<u64, RepositoryError>;
}
