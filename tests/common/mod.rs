#![allow(dead_code)]

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use orghub::application::idempotency::IdempotencyStore;
use orghub::application::use_cases::{DepartmentUseCase, EmployeeUseCase, ProductUseCase};
use orghub::domain::services::{DepartmentService, EmployeeService, ProductService};
use orghub::infrastructure::cache::ResponseCache;
use orghub::infrastructure::clients::{
    HttpDepartmentDirectory, HttpEmployeeDirectory, HttpStoreGateway,
};
use orghub::infrastructure::department_api::{self, DepartmentApiState};
use orghub::infrastructure::employee_api::{self, EmployeeApiState};
use orghub::infrastructure::event_bus::InMemoryEventBus;
use orghub::infrastructure::persistence::{
    InMemoryDepartmentRepository, InMemoryEmployeeRepository,
};
use orghub::infrastructure::product_api::{self, ProductApiState};

pub const TEST_CLIENT_TIMEOUT: Duration = Duration::from_secs(2);
pub const TEST_CACHE_TTL: Duration = Duration::from_secs(60);

/// Serve a router on an ephemeral port and return its base URL.
pub async fn spawn_app(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr: SocketAddr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve test app");
    });
    format!("http://{}", addr)
}

pub struct DepartmentHarness {
    pub base_url: String,
    pub bus: Arc<InMemoryEventBus>,
}

/// Department service wired against the given employee-service base URL.
pub async fn spawn_department_service(employee_service_url: &str) -> DepartmentHarness {
    let bus = Arc::new(InMemoryEventBus::new());
    let repo = Arc::new(InMemoryDepartmentRepository::new());
    let employees = Arc::new(
        HttpEmployeeDirectory::new(employee_service_url, TEST_CLIENT_TIMEOUT)
            .expect("employee directory client"),
    );
    let service = Arc::new(DepartmentService::new(repo, employees, bus.clone()));
    let departments = Arc::new(DepartmentUseCase::new(service));
    let base_url = spawn_app(department_api::router(DepartmentApiState { departments })).await;
    DepartmentHarness { base_url, bus }
}

pub struct EmployeeHarness {
    pub base_url: String,
    pub bus: Arc<InMemoryEventBus>,
    pub cache: Arc<ResponseCache>,
}

/// Employee service wired against the given department-service base URL.
pub async fn spawn_employee_service(department_service_url: &str) -> EmployeeHarness {
    let bus = Arc::new(InMemoryEventBus::new());
    let repo = Arc::new(InMemoryEmployeeRepository::new());
    let departments = Arc::new(
        HttpDepartmentDirectory::new(department_service_url, TEST_CLIENT_TIMEOUT)
            .expect("department directory client"),
    );
    let service = Arc::new(EmployeeService::new(repo, bus.clone()));
    let employees = Arc::new(EmployeeUseCase::new(
        service,
        departments,
        IdempotencyStore::default(),
    ));
    let cache = Arc::new(ResponseCache::new(TEST_CACHE_TTL));
    let base_url = spawn_app(employee_api::router(EmployeeApiState {
        employees,
        cache: cache.clone(),
    }))
    .await;
    EmployeeHarness {
        base_url,
        bus,
        cache,
    }
}

pub struct ProductHarness {
    pub base_url: String,
}

/// Product service wired against the given upstream store base URL.
pub async fn spawn_product_service(store_url: &str) -> ProductHarness {
    let store = Arc::new(
        HttpStoreGateway::new(store_url, TEST_CLIENT_TIMEOUT).expect("store gateway client"),
    );
    let service = Arc::new(ProductService::new(store));
    let products = Arc::new(ProductUseCase::new(service));
    let cache = Arc::new(ResponseCache::new(TEST_CACHE_TTL));
    let base_url = spawn_app(product_api::router(ProductApiState { products, cache })).await;
    ProductHarness { base_url }
}

/// Base URL nothing listens on; connections are refused immediately.
pub fn unreachable_url() -> String {
    "http://127.0.0.1:9".to_string()
}
