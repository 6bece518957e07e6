use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::{entities::*, errors::RepositoryError, repositories::*};

/// In-memory implementation of the DepartmentRepository
pub struct InMemoryDepartmentRepository {
    rows: DashMap<i64, Department>,
    sequence: AtomicI64,
}

impl InMemoryDepartmentRepository {
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
            sequence: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryDepartmentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DepartmentRepository for InMemoryDepartmentRepository {
    async fn save(&self, mut department: Department) -> Result<Department, RepositoryError> {
        if department.id == 0 {
            department.id = self.sequence.fetch_add(1, Ordering::SeqCst);
        }
        self.rows.insert(department.id, department.clone());
        Ok(department)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Department>, RepositoryError> {
        Ok(self.rows.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Department>, RepositoryError> {
        Ok(self
            .rows
            .iter()
            .find(|entry| entry.value().code == code)
            .map(|entry| entry.value().clone()))
    }

    async fn exists_by_code(&self, code: &str) -> Result<bool, RepositoryError> {
        Ok(self.rows.iter().any(|entry| entry.value().code == code))
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), RepositoryError> {
        self.rows.remove(&id);
        Ok(())
    }

    async fn list(
        &self,
        filter: &DepartmentFilter,
        page: &PageRequest,
    ) -> Result<Page<Department>, RepositoryError> {
        let name = filter.name.as_deref().map(str::to_lowercase);
        let code = filter.code.as_deref().map(str::to_lowercase);

        let mut matches: Vec<Department> = self
            .rows
            .iter()
            .map(|entry| entry.value().clone())
            .filter(|d| {
                name.as_deref()
                    .is_none_or(|n| d.name.to_lowercase().contains(n))
                    && code
                        .as_deref()
                        .is_none_or(|c| d.code.to_lowercase().contains(c))
            })
            .collect();

        sort_departments(&mut matches, page.sort.as_ref());
        Ok(paginate(matches, page))
    }
}

/// In-memory implementation of the EmployeeRepository
pub struct InMemoryEmployeeRepository {
    rows: DashMap<i64, Employee>,
    sequence: AtomicI64,
}

impl InMemoryEmployeeRepository {
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
            sequence: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryEmployeeRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeRepository {
    async fn save(&self, mut employee: Employee) -> Result<Employee, RepositoryError> {
        if employee.id == 0 {
            employee.id = self.sequence.fetch_add(1, Ordering::SeqCst);
        }
        self.rows.insert(employee.id, employee.clone());
        Ok(employee)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Employee>, RepositoryError> {
        Ok(self.rows.get(&id).map(|entry| entry.value().clone()))
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, RepositoryError> {
        Ok(self.rows.contains_key(&id))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepositoryError> {
        Ok(self.rows.iter().any(|entry| entry.value().email == email))
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), RepositoryError> {
        self.rows.remove(&id);
        Ok(())
    }

    async fn list(
        &self,
        filter: &EmployeeFilter,
        page: &PageRequest,
    ) -> Result<Page<Employee>, RepositoryError> {
        let last_name = filter.last_name.as_deref().map(str::to_lowercase);

        let mut matches: Vec<Employee> = self
            .rows
            .iter()
            .map(|entry| entry.value().clone())
            .filter(|e| {
                filter.email.as_deref().is_none_or(|email| e.email == email)
                    && last_name
                        .as_deref()
                        .is_none_or(|l| e.last_name.to_lowercase().contains(l))
                    && filter
                        .department_id
                        .is_none_or(|d| e.department_id == Some(d))
            })
            .collect();

        sort_employees(&mut matches, page.sort.as_ref());
        Ok(paginate(matches, page))
    }

    async fn search(
        &self,
        query: &str,
        page: &PageRequest,
    ) -> Result<Page<Employee>, RepositoryError> {
        let mut matches: Vec<Employee> = self
            .rows
            .iter()
            .map(|entry| entry.value().clone())
            .filter(|e| e.matches_query(query))
            .collect();

        sort_employees(&mut matches, page.sort.as_ref());
        Ok(paginate(matches, page))
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.rows.len() as u64)
    }

    async fn count_by_department(&self) -> Result<HashMap<i64, u64>, RepositoryError> {
        let mut counts = HashMap::new();
        for entry in self.rows.iter() {
            if let Some(department_id) = entry.value().department_id {
                *counts.entry(department_id).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    async fn count_without_department(&self) -> Result<u64, RepositoryError> {
        Ok(self
            .rows
            .iter()
            .filter(|entry| entry.value().department_id.is_none())
            .count() as u64)
    }
}

/// Sort by a whitelisted field; anything else falls back to id order so an
/// unknown `sort=` parameter cannot fail the request.
fn sort_departments(rows: &mut [Department], sort: Option<&Sort>) {
    match sort {
        Some(sort) => {
            match sort.field.as_str() {
                "name" => rows.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
                "code" => rows.sort_by(|a, b| a.code.to_lowercase().cmp(&b.code.to_lowercase())),
                _ => rows.sort_by_key(|d| d.id),
            }
            if sort.direction == SortDirection::Desc {
                rows.reverse();
            }
        }
        None => rows.sort_by_key(|d| d.id),
    }
}

fn sort_employees(rows: &mut [Employee], sort: Option<&Sort>) {
    match sort {
        Some(sort) => {
            match sort.field.as_str() {
                "firstName" => {
                    rows.sort_by(|a, b| a.first_name.to_lowercase().cmp(&b.first_name.to_lowercase()))
                }
                "lastName" => {
                    rows.sort_by(|a, b| a.last_name.to_lowercase().cmp(&b.last_name.to_lowercase()))
                }
                "email" => rows.sort_by(|a, b| a.email.to_lowercase().cmp(&b.email.to_lowercase())),
                _ => rows.sort_by_key(|e| e.id),
            }
            if sort.direction == SortDirection::Desc {
                rows.reverse();
            }
        }
        None => rows.sort_by_key(|e| e.id),
    }
}

fn paginate<T>(rows: Vec<T>, page: &PageRequest) -> Page<T> {
    let total = rows.len() as u64;
    let content: Vec<T> = rows
        .into_iter()
        .skip(page.offset())
        .take(page.size)
        .collect();
    Page::new(content, total, page)
}
