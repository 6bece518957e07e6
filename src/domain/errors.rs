use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DomainError>;

/// A single failed validation check, reported in 400 responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Department with id {0} not found")]
    DepartmentNotFound(i64),

    #[error("Department with code '{0}' not found")]
    DepartmentCodeNotFound(String),

    #[error("Employee with id {0} not found")]
    EmployeeNotFound(i64),

    #[error("Product with id {0} not found")]
    ProductNotFound(i64),

    #[error("Department code '{0}' already exists")]
    DuplicateCode(String),

    #[error("Email already exists")]
    DuplicateEmail(String),

    #[error("Department {id} still has {employees} employee(s); reassign them first")]
    DepartmentInUse { id: i64, employees: u64 },

    #[error("Validation failed")]
    Validation(Vec<FieldViolation>),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Upstream service error: {0}")]
    Upstream(#[from] ClientError),
}

impl DomainError {
    /// Shorthand for a single-field validation failure.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        DomainError::Validation(vec![FieldViolation::new(field, message)])
    }
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Serialization(err.to_string())
    }
}

/// Failures talking to a peer service or an upstream API.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected status {0} from peer")]
    UnexpectedStatus(u16),

    #[error("Could not decode peer response: {0}")]
    Decode(String),
}
