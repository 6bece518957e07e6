//! # orghub
//!
//! A small suite of organization-management services: departments, employees,
//! a product catalog proxy, and a config server, all subcommands of one
//! binary.
//!
//! ## Architecture
//!
//! The codebase keeps a clear separation between:
//! - **Domain Layer**: entities, business services, and the ports they need
//!   (repositories, peer-service clients, event publisher)
//! - **Application Layer**: request/response DTOs, validation, idempotent
//!   create, and cross-service enrichment
//! - **Infrastructure Layer**: axum routers, in-memory persistence, the
//!   event bus, response cache, HTTP clients, and configuration
//!
//! Each service talks to its peers over plain HTTP and publishes lifecycle
//! events to named topics on an in-process event bus.
//!
//! ## Usage
//!
//! ```rust
//! use orghub::application::idempotency::IdempotencyStore;
//! use orghub::application::use_cases::EmployeeUseCase;
//! use orghub::application::dto::EmployeePayload;
//! use orghub::domain::services::EmployeeService;
//! use orghub::infrastructure::clients::HttpDepartmentDirectory;
//! use orghub::infrastructure::clients::DEFAULT_CLIENT_TIMEOUT;
//! use orghub::infrastructure::event_bus::InMemoryEventBus;
//! use orghub::infrastructure::persistence::InMemoryEmployeeRepository;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Set up the repository and event bus
//!     let repo = Arc::new(InMemoryEmployeeRepository::new());
//!     let bus = Arc::new(InMemoryEventBus::new());
//!
//!     // Wire the employee service and its use case
//!     let service = Arc::new(EmployeeService::new(repo, bus));
//!     let departments = Arc::new(HttpDepartmentDirectory::new(
//!         "http://127.0.0.1:8082",
//!         DEFAULT_CLIENT_TIMEOUT,
//!     )?);
//!     let employees = EmployeeUseCase::new(service, departments, IdempotencyStore::default());
//!
//!     // Create an employee
//!     let payload = EmployeePayload {
//!         first_name: Some("Ada".to_string()),
//!         last_name: Some("Lovelace".to_string()),
//!         email: Some("ada@example.com".to_string()),
//!         department_id: None,
//!     };
//!     let created = employees.create(payload, None).await?;
//!     println!("Created employee {}", created.id);
//!     Ok(())
//! }
//! ```

pub mod domain;
pub mod application;
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::entities::{Department, Employee, Product};
pub use domain::errors::{DomainError, Result};
pub use domain::repositories::{Page, PageRequest};
pub use domain::services::{DepartmentService, EmployeeService, ProductService};
pub use infrastructure::event_bus::InMemoryEventBus;
pub use infrastructure::persistence::{InMemoryDepartmentRepository, InMemoryEmployeeRepository};
pub use infrastructure::server::HttpServer;
