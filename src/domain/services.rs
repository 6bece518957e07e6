use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;

use super::{clients::*, entities::*, errors::*, events::*, repositories::*, value_objects::*};

/// Service for managing departments and their lifecycle events
pub struct DepartmentService {
    repo: Arc<dyn DepartmentRepository>,
    employees: Arc<dyn EmployeeDirectory>,
    publisher: Arc<dyn EventPublisher>,
}

impl DepartmentService {
    pub fn new(
        repo: Arc<dyn DepartmentRepository>,
        employees: Arc<dyn EmployeeDirectory>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repo,
            employees,
            publisher,
        }
    }

    pub async fn list(
        &self,
        filter: &DepartmentFilter,
        page: &PageRequest,
    ) -> Result<Page<Department>> {
        debug!("Listing departments with filter {:?}", filter);
        Ok(self.repo.list(filter, page).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Department> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::DepartmentNotFound(id))
    }

    pub async fn get_by_code(&self, code: &str) -> Result<Department> {
        self.repo
            .find_by_code(code)
            .await?
            .ok_or_else(|| DomainError::DepartmentCodeNotFound(code.to_string()))
    }

    /// Create a department with a unique code.
    pub async fn create(
        &self,
        name: String,
        code: DepartmentCode,
        description: Option<String>,
    ) -> Result<Department> {
        if self.repo.exists_by_code(code.as_str()).await? {
            return Err(DomainError::DuplicateCode(code.to_string()));
        }

        let saved = self
            .repo
            .save(Department::new(name, code.to_string(), description))
            .await?;
        info!("Created department {} ({})", saved.id, saved.code);

        self.publish_lifecycle(
            DepartmentEvent::Created(Self::event_data(&saved)),
            format!("New department created: {} ({})", saved.name, saved.code),
        )
        .await;
        Ok(saved)
    }

    /// Full update; the code stays unique across all other departments.
    pub async fn update(
        &self,
        id: i64,
        name: String,
        code: DepartmentCode,
        description: Option<String>,
    ) -> Result<Department> {
        let mut existing = self.get(id).await?;

        if existing.code != code.as_str() && self.repo.exists_by_code(code.as_str()).await? {
            return Err(DomainError::DuplicateCode(code.to_string()));
        }

        existing.name = name;
        existing.code = code.to_string();
        existing.description = description;

        let saved = self.repo.save(existing).await?;
        info!("Updated department {} ({})", saved.id, saved.code);

        self.publish_lifecycle(
            DepartmentEvent::Updated(Self::event_data(&saved)),
            format!("Department updated: {} ({})", saved.name, saved.code),
        )
        .await;
        Ok(saved)
    }

    /// Partial update: only supplied fields change.
    pub async fn patch(
        &self,
        id: i64,
        name: Option<String>,
        code: Option<DepartmentCode>,
        description: Option<String>,
    ) -> Result<Department> {
        let mut existing = self.get(id).await?;

        if let Some(name) = name {
            existing.name = name;
        }
        if let Some(code) = code {
            if existing.code != code.as_str() && self.repo.exists_by_code(code.as_str()).await? {
                return Err(DomainError::DuplicateCode(code.to_string()));
            }
            existing.code = code.to_string();
        }
        if let Some(description) = description {
            existing.description = Some(description);
        }

        let saved = self.repo.save(existing).await?;
        info!("Patched department {} ({})", saved.id, saved.code);

        self.publish_lifecycle(
            DepartmentEvent::Updated(Self::event_data(&saved)),
            format!("Department updated: {} ({})", saved.name, saved.code),
        )
        .await;
        Ok(saved)
    }

    /// Protective delete: refused while the employee service still reports
    /// employees in the department. An unreachable employee service does not
    /// block the delete; the check degrades to a warning.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let department = self.get(id).await?;

        match self.employees.count_in_department(id).await {
            Ok(count) if count > 0 => {
                return Err(DomainError::DepartmentInUse {
                    id,
                    employees: count,
                });
            }
            Ok(_) => {}
            Err(e) => {
                warn!(
                    "Could not verify department {} has no employees: {}",
                    id, e
                );
            }
        }

        self.repo.delete_by_id(id).await?;
        info!("Deleted department {} ({})", department.id, department.code);

        self.publish_lifecycle(
            DepartmentEvent::Deleted(Self::event_data(&department)),
            format!(
                "Department deleted: {} ({}); reassign its employees",
                department.name, department.code
            ),
        )
        .await;
        Ok(())
    }

    /// Employees of a department, composed from the employee service.
    pub async fn employees_of(&self, id: i64) -> Result<(Department, Vec<EmployeeSummary>)> {
        let department = self.get(id).await?;
        let employees = self.employees.list_in_department(id).await?;
        Ok((department, employees))
    }

    fn event_data(department: &Department) -> DepartmentEventData {
        DepartmentEventData {
            department_id: department.id,
            name: department.name.clone(),
            code: department.code.clone(),
            description: department.description.clone(),
        }
    }

    async fn publish_lifecycle(&self, event: DepartmentEvent, notification: String) {
        self.publisher.publish(DomainEvent::Department(event)).await;
        self.publisher
            .publish(DomainEvent::Notification(NotificationEvent::system(
                notification,
            )))
            .await;
    }
}

/// Counts reported by the employee stats endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeStats {
    pub total_employees: u64,
    pub employees_by_department: HashMap<i64, u64>,
    pub employees_without_department: u64,
}

/// Service for managing employees
pub struct EmployeeService {
    repo: Arc<dyn EmployeeRepository>,
    publisher: Arc<dyn EventPublisher>,
}

impl EmployeeService {
    pub fn new(repo: Arc<dyn EmployeeRepository>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self { repo, publisher }
    }

    pub async fn list(
        &self,
        filter: &EmployeeFilter,
        page: &PageRequest,
    ) -> Result<Page<Employee>> {
        debug!("Listing employees with filter {:?}", filter);
        Ok(self.repo.list(filter, page).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Employee> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::EmployeeNotFound(id))
    }

    /// Create an employee with a unique email.
    pub async fn create(
        &self,
        first_name: String,
        last_name: String,
        email: EmailAddress,
        department_id: Option<i64>,
    ) -> Result<Employee> {
        if self.repo.exists_by_email(email.as_str()).await? {
            return Err(DomainError::DuplicateEmail(email.to_string()));
        }

        let saved = self
            .repo
            .save(Employee::new(
                first_name,
                last_name,
                email.to_string(),
                department_id,
            ))
            .await?;
        info!("Created employee {} ({})", saved.id, saved.email);

        self.publisher
            .publish(DomainEvent::Employee(EmployeeEvent::Created {
                employee_id: saved.id,
                email: saved.email.clone(),
                first_name: saved.first_name.clone(),
                last_name: saved.last_name.clone(),
                department_id: saved.department_id,
            }))
            .await;
        Ok(saved)
    }

    /// Full update; changing to an email held by another employee is refused.
    pub async fn update(
        &self,
        id: i64,
        first_name: String,
        last_name: String,
        email: EmailAddress,
        department_id: Option<i64>,
    ) -> Result<Employee> {
        let mut existing = self.get(id).await?;
        let old_department_id = existing.department_id;

        if existing.email != email.as_str() && self.repo.exists_by_email(email.as_str()).await? {
            return Err(DomainError::DuplicateEmail(email.to_string()));
        }

        existing.first_name = first_name;
        existing.last_name = last_name;
        existing.email = email.to_string();
        existing.department_id = department_id;

        let saved = self.repo.save(existing).await?;
        info!("Updated employee {} ({})", saved.id, saved.email);

        self.publish_updated(&saved, old_department_id).await;
        Ok(saved)
    }

    /// Partial update: only supplied fields change (e.g. just departmentId).
    pub async fn patch(
        &self,
        id: i64,
        first_name: Option<String>,
        last_name: Option<String>,
        email: Option<EmailAddress>,
        department_id: Option<i64>,
    ) -> Result<Employee> {
        let mut existing = self.get(id).await?;
        let old_department_id = existing.department_id;

        if let Some(first_name) = first_name {
            existing.first_name = first_name;
        }
        if let Some(last_name) = last_name {
            existing.last_name = last_name;
        }
        if let Some(email) = email {
            if existing.email != email.as_str()
                && self.repo.exists_by_email(email.as_str()).await?
            {
                return Err(DomainError::DuplicateEmail(email.to_string()));
            }
            existing.email = email.to_string();
        }
        if let Some(department_id) = department_id {
            existing.department_id = Some(department_id);
        }

        let saved = self.repo.save(existing).await?;
        info!("Patched employee {} ({})", saved.id, saved.email);

        self.publish_updated(&saved, old_department_id).await;
        Ok(saved)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let existing = self.get(id).await?;
        self.repo.delete_by_id(id).await?;
        info!("Deleted employee {} ({})", existing.id, existing.email);

        self.publisher
            .publish(DomainEvent::Employee(EmployeeEvent::Deleted {
                employee_id: existing.id,
                email: existing.email,
                first_name: existing.first_name,
                last_name: existing.last_name,
                department_id: existing.department_id,
            }))
            .await;
        Ok(())
    }

    pub async fn search(&self, query: &str, page: &PageRequest) -> Result<Page<Employee>> {
        Ok(self.repo.search(query, page).await?)
    }

    pub async fn stats(&self) -> Result<EmployeeStats> {
        Ok(EmployeeStats {
            total_employees: self.repo.count().await?,
            employees_by_department: self.repo.count_by_department().await?,
            employees_without_department: self.repo.count_without_department().await?,
        })
    }

    async fn publish_updated(&self, saved: &Employee, old_department_id: Option<i64>) {
        self.publisher
            .publish(DomainEvent::Employee(EmployeeEvent::Updated {
                employee_id: saved.id,
                email: saved.email.clone(),
                old_department_id,
                new_department_id: saved.department_id,
            }))
            .await;
    }
}

/// Aggregates reported by the product stats endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct ProductStats {
    pub total_products: u64,
    pub categories: Vec<String>,
    pub products_by_category: HashMap<String, u64>,
    pub average_price: f64,
    pub min_price: f64,
    pub max_price: f64,
}

/// Service over the upstream store catalog. List-shaped upstream failures
/// degrade to empty results; only a missing single product is an error.
pub struct ProductService {
    store: Arc<dyn StoreGateway>,
}

impl ProductService {
    pub fn new(store: Arc<dyn StoreGateway>) -> Self {
        Self { store }
    }

    pub async fn all(&self, limit: Option<usize>) -> Vec<Product> {
        let result = match limit {
            Some(limit) => self.store.products_with_limit(limit).await,
            None => self.store.all_products().await,
        };
        Self::degrade("products", result)
    }

    pub async fn by_id(&self, id: i64) -> Result<Product> {
        match self.store.product_by_id(id).await {
            Ok(Some(product)) => Ok(product),
            Ok(None) => Err(DomainError::ProductNotFound(id)),
            Err(e) => {
                warn!("Store lookup for product {} failed: {}", id, e);
                Err(DomainError::ProductNotFound(id))
            }
        }
    }

    pub async fn categories(&self) -> Vec<String> {
        Self::degrade("categories", self.store.categories().await)
    }

    pub async fn by_category(&self, category: &str) -> Vec<Product> {
        Self::degrade(
            "category products",
            self.store.products_in_category(category).await,
        )
    }

    /// Search over title, description, and category; a blank query matches
    /// everything.
    pub async fn search(&self, query: Option<&str>) -> Vec<Product> {
        let products = self.all(None).await;
        match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => products
                .into_iter()
                .filter(|p| p.matches_query(q))
                .collect(),
            None => products,
        }
    }

    pub async fn by_price_range(&self, min: Option<f64>, max: Option<f64>) -> Vec<Product> {
        self.all(None)
            .await
            .into_iter()
            .filter(|p| {
                p.price.is_some_and(|price| {
                    min.is_none_or(|m| price >= m) && max.is_none_or(|m| price <= m)
                })
            })
            .collect()
    }

    pub async fn stats(&self) -> ProductStats {
        let products = self.all(None).await;
        if products.is_empty() {
            return ProductStats {
                total_products: 0,
                categories: Vec::new(),
                products_by_category: HashMap::new(),
                average_price: 0.0,
                min_price: 0.0,
                max_price: 0.0,
            };
        }

        let mut categories: Vec<String> = products
            .iter()
            .filter_map(|p| p.category.clone())
            .collect();
        categories.sort();
        categories.dedup();

        let mut products_by_category: HashMap<String, u64> = HashMap::new();
        for product in &products {
            if let Some(category) = &product.category {
                *products_by_category.entry(category.clone()).or_insert(0) += 1;
            }
        }

        let prices: Vec<f64> = products.iter().filter_map(|p| p.price).collect();
        let (average, min, max) = if prices.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            let sum: f64 = prices.iter().sum();
            let average = sum / prices.len() as f64;
            let min = prices.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = prices.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            (average, min, max)
        };

        ProductStats {
            total_products: products.len() as u64,
            categories,
            products_by_category,
            // two decimal places, matching the wire contract
            average_price: (average * 100.0).round() / 100.0,
            min_price: min,
            max_price: max,
        }
    }

    fn degrade<T>(what: &str, result: std::result::Result<Vec<T>, ClientError>) -> Vec<T> {
        match result {
            Ok(items) => items,
            Err(e) => {
                warn!("Store request for {} failed, returning empty: {}", what, e);
                Vec::new()
            }
        }
    }
}
