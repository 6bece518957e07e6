use log::{debug, info};
use std::sync::Arc;

use crate::domain::{
    clients::DepartmentDirectory,
    entities::{Department, Employee},
    errors::*,
    repositories::*,
    services::*,
    value_objects::IdempotencyKey,
};

use super::{dto::*, idempotency::IdempotencyStore};

/// Department operations as exposed over HTTP: payload validation plus
/// delegation to the domain service.
pub struct DepartmentUseCase {
    service: Arc<DepartmentService>,
}

impl DepartmentUseCase {
    pub fn new(service: Arc<DepartmentService>) -> Self {
        Self { service }
    }

    pub async fn list(
        &self,
        filter: DepartmentFilter,
        page: PageRequest,
    ) -> Result<Page<Department>> {
        self.service.list(&filter, &page).await
    }

    pub async fn get(&self, id: i64) -> Result<Department> {
        self.service.get(id).await
    }

    pub async fn get_by_code(&self, code: &str) -> Result<Department> {
        self.service.get_by_code(code).await
    }

    pub async fn create(&self, payload: DepartmentPayload) -> Result<Department> {
        let (name, code) = payload.validate_full()?;
        self.service
            .create(name, code, normalize(payload.description))
            .await
    }

    pub async fn update(&self, id: i64, payload: DepartmentPayload) -> Result<Department> {
        let (name, code) = payload.validate_full()?;
        self.service
            .update(id, name, code, normalize(payload.description))
            .await
    }

    pub async fn patch(&self, id: i64, payload: DepartmentPayload) -> Result<Department> {
        let code = payload.validate_partial()?;
        self.service
            .patch(id, payload.name, code, payload.description)
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.service.delete(id).await
    }

    pub async fn employees_of(&self, id: i64) -> Result<DepartmentEmployeesDto> {
        let (department, employees) = self.service.employees_of(id).await?;
        Ok(DepartmentEmployeesDto {
            department: crate::domain::clients::DepartmentSummary {
                id: department.id,
                name: department.name,
                code: department.code,
                description: department.description,
            },
            employees,
        })
    }
}

/// Employee operations as exposed over HTTP: validation, DTO mapping,
/// idempotent create, and department enrichment.
pub struct EmployeeUseCase {
    service: Arc<EmployeeService>,
    departments: Arc<dyn DepartmentDirectory>,
    idempotency: IdempotencyStore,
}

impl EmployeeUseCase {
    pub fn new(
        service: Arc<EmployeeService>,
        departments: Arc<dyn DepartmentDirectory>,
        idempotency: IdempotencyStore,
    ) -> Self {
        Self {
            service,
            departments,
            idempotency,
        }
    }

    pub async fn list(
        &self,
        filter: EmployeeFilter,
        page: PageRequest,
    ) -> Result<Page<EmployeeDto>> {
        let employees = self.service.list(&filter, &page).await?;
        Ok(employees.map(|e| EmployeeDto::from_entity(e, None)))
    }

    pub async fn get(&self, id: i64, include_department: bool) -> Result<EmployeeDto> {
        let employee = self.service.get(id).await?;
        Ok(self.to_dto(employee, include_department).await)
    }

    /// Create an employee. A repeated request carrying the same
    /// `Idempotency-Key` is a safe replay and returns the original response.
    pub async fn create(
        &self,
        payload: EmployeePayload,
        key: Option<IdempotencyKey>,
    ) -> Result<EmployeeDto> {
        if let Some(key) = &key {
            if let Some(replayed) = self.idempotency.recall(key) {
                info!("Replaying employee creation for idempotency key {}", key);
                return Ok(replayed);
            }
        }

        let (first_name, last_name, email) = payload.validate_full()?;
        let employee = self
            .service
            .create(first_name, last_name, email, payload.department_id)
            .await?;
        let dto = self.to_dto(employee, true).await;

        if let Some(key) = key {
            self.idempotency.remember(key, dto.clone());
        }
        Ok(dto)
    }

    pub async fn update(&self, id: i64, payload: EmployeePayload) -> Result<EmployeeDto> {
        let (first_name, last_name, email) = payload.validate_full()?;
        let employee = self
            .service
            .update(id, first_name, last_name, email, payload.department_id)
            .await?;
        Ok(self.to_dto(employee, true).await)
    }

    pub async fn patch(&self, id: i64, payload: EmployeePayload) -> Result<EmployeeDto> {
        let email = payload.validate_partial()?;
        let employee = self
            .service
            .patch(
                id,
                payload.first_name,
                payload.last_name,
                email,
                payload.department_id,
            )
            .await?;
        Ok(self.to_dto(employee, true).await)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.service.delete(id).await
    }

    pub async fn search(&self, query: &str, page: PageRequest) -> Result<Page<EmployeeDto>> {
        let employees = self.service.search(query, &page).await?;
        Ok(employees.map(|e| EmployeeDto::from_entity(e, None)))
    }

    pub async fn stats(&self) -> Result<EmployeeStatsDto> {
        Ok(self.service.stats().await?.into())
    }

    /// Attach the department summary when asked for and assigned; enrichment
    /// failures leave the summary out rather than failing the request.
    async fn to_dto(&self, employee: Employee, include_department: bool) -> EmployeeDto {
        let department = match (include_department, employee.department_id) {
            (true, Some(department_id)) => {
                match self.departments.find_summary(department_id).await {
                    Ok(summary) => summary,
                    Err(e) => {
                        debug!(
                            "Department lookup for employee {} failed: {}",
                            employee.id, e
                        );
                        None
                    }
                }
            }
            _ => None,
        };
        EmployeeDto::from_entity(employee, department)
    }
}

/// Product operations as exposed over HTTP: DTO mapping over the catalog
/// service.
pub struct ProductUseCase {
    service: Arc<ProductService>,
}

impl ProductUseCase {
    pub fn new(service: Arc<ProductService>) -> Self {
        Self { service }
    }

    pub async fn list(&self, limit: Option<usize>) -> Vec<ProductDto> {
        self.service
            .all(limit)
            .await
            .into_iter()
            .map(ProductDto::from)
            .collect()
    }

    pub async fn by_id(&self, id: i64) -> Result<ProductDto> {
        Ok(self.service.by_id(id).await?.into())
    }

    pub async fn categories(&self) -> Vec<String> {
        self.service.categories().await
    }

    pub async fn by_category(&self, category: &str) -> Vec<ProductDto> {
        self.service
            .by_category(category)
            .await
            .into_iter()
            .map(ProductDto::from)
            .collect()
    }

    pub async fn search(&self, query: Option<&str>) -> Vec<ProductDto> {
        self.service
            .search(query)
            .await
            .into_iter()
            .map(ProductDto::from)
            .collect()
    }

    pub async fn by_price_range(&self, min: Option<f64>, max: Option<f64>) -> Vec<ProductDto> {
        self.service
            .by_price_range(min, max)
            .await
            .into_iter()
            .map(ProductDto::from)
            .collect()
    }

    pub async fn stats(&self) -> ProductStatsDto {
        self.service.stats().await.into()
    }
}

/// Collapse blank optional strings to `None`.
fn normalize(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
