use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::{
    clients::DepartmentSummary,
    entities::{Employee, Product, Rating},
    errors::{DomainError, FieldViolation},
    services::{EmployeeStats, ProductStats},
    value_objects::{DepartmentCode, EmailAddress},
};

const NAME_MAX: usize = 120;

/// Request body for creating, replacing, or patching a department. Create and
/// replace require name and code; patch applies only the supplied fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DepartmentPayload {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
}

impl DepartmentPayload {
    /// Validate for create/replace: name and code are mandatory.
    pub fn validate_full(&self) -> Result<(String, DepartmentCode), DomainError> {
        let mut violations = Vec::new();

        let name = self.name.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            violations.push(FieldViolation::new("name", "name is required"));
        } else if name.len() > NAME_MAX {
            violations.push(FieldViolation::new(
                "name",
                "name must not exceed 120 characters",
            ));
        }

        let code = match DepartmentCode::new(self.code.clone().unwrap_or_default()) {
            Ok(code) => Some(code),
            Err(DomainError::Validation(mut errs)) => {
                violations.append(&mut errs);
                None
            }
            Err(e) => return Err(e),
        };

        match (violations.is_empty(), code) {
            (true, Some(code)) => Ok((name.to_string(), code)),
            _ => Err(DomainError::Validation(violations)),
        }
    }

    /// Validate for patch: fields stay optional, but a supplied code must
    /// still be well-formed.
    pub fn validate_partial(&self) -> Result<Option<DepartmentCode>, DomainError> {
        self.code.clone().map(DepartmentCode::new).transpose()
    }
}

/// Request body for creating, replacing, or patching an employee.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeePayload {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub department_id: Option<i64>,
}

impl EmployeePayload {
    /// Validate for create/replace: names and email are mandatory.
    pub fn validate_full(&self) -> Result<(String, String, EmailAddress), DomainError> {
        let mut violations = Vec::new();

        let first_name = self.first_name.as_deref().map(str::trim).unwrap_or_default();
        if first_name.is_empty() {
            violations.push(FieldViolation::new("firstName", "firstName is required"));
        } else if first_name.len() > NAME_MAX {
            violations.push(FieldViolation::new(
                "firstName",
                "firstName must not exceed 120 characters",
            ));
        }

        let last_name = self.last_name.as_deref().map(str::trim).unwrap_or_default();
        if last_name.is_empty() {
            violations.push(FieldViolation::new("lastName", "lastName is required"));
        } else if last_name.len() > NAME_MAX {
            violations.push(FieldViolation::new(
                "lastName",
                "lastName must not exceed 120 characters",
            ));
        }

        let email = match EmailAddress::new(self.email.clone().unwrap_or_default()) {
            Ok(email) => Some(email),
            Err(DomainError::Validation(mut errs)) => {
                violations.append(&mut errs);
                None
            }
            Err(e) => return Err(e),
        };

        match (violations.is_empty(), email) {
            (true, Some(email)) => Ok((first_name.to_string(), last_name.to_string(), email)),
            _ => Err(DomainError::Validation(violations)),
        }
    }

    /// Validate for patch: a supplied email must still be well-formed.
    pub fn validate_partial(&self) -> Result<Option<EmailAddress>, DomainError> {
        self.email.clone().map(EmailAddress::new).transpose()
    }
}

/// Employee response, optionally enriched with its department summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDto {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<DepartmentSummary>,
}

impl EmployeeDto {
    pub fn from_entity(employee: Employee, department: Option<DepartmentSummary>) -> Self {
        Self {
            id: employee.id,
            first_name: employee.first_name,
            last_name: employee.last_name,
            email: employee.email,
            department_id: employee.department_id,
            department,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeStatsDto {
    pub total_employees: u64,
    pub employees_by_department: HashMap<i64, u64>,
    pub employees_without_department: u64,
}

impl From<EmployeeStats> for EmployeeStatsDto {
    fn from(stats: EmployeeStats) -> Self {
        Self {
            total_employees: stats.total_employees,
            employees_by_department: stats.employees_by_department,
            employees_without_department: stats.employees_without_department,
        }
    }
}

/// Composed response for `GET /departments/{id}/employees`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentEmployeesDto {
    pub department: DepartmentSummary,
    pub employees: Vec<crate::domain::clients::EmployeeSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

impl From<Product> for ProductDto {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            description: product.description,
            category: product.category,
            image: product.image,
            rating: product.rating,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStatsDto {
    pub total_products: u64,
    pub categories: Vec<String>,
    pub products_by_category: HashMap<String, u64>,
    pub average_price: f64,
    pub min_price: f64,
    pub max_price: f64,
}

impl From<ProductStats> for ProductStatsDto {
    fn from(stats: ProductStats) -> Self {
        Self {
            total_products: stats.total_products,
            categories: stats.categories,
            products_by_category: stats.products_by_category,
            average_price: stats.average_price,
            min_price: stats.min_price,
            max_price: stats.max_price,
        }
    }
}
