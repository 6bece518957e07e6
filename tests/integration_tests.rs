//! Integration tests for the domain services and the in-process
//! infrastructure they rely on (event bus, cache, idempotency store).

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use orghub::application::dto::EmployeeDto;
use orghub::application::idempotency::IdempotencyStore;
use orghub::domain::clients::{EmployeeDirectory, EmployeeSummary};
use orghub::domain::errors::{ClientError, DomainError};
use orghub::domain::events::{DomainEvent, EventPublisher, NotificationEvent, NOTIFICATIONS_TOPIC};
use orghub::domain::repositories::{PageRequest, Sort, SortDirection};
use orghub::domain::services::{DepartmentService, EmployeeService};
use orghub::domain::value_objects::{DepartmentCode, EmailAddress, IdempotencyKey, TopicName};
use orghub::infrastructure::cache::ResponseCache;
use orghub::infrastructure::event_bus::InMemoryEventBus;
use orghub::infrastructure::persistence::{
    InMemoryDepartmentRepository, InMemoryEmployeeRepository,
};

/// Employee directory stub reporting a fixed headcount for every department.
struct StaticEmployeeDirectory {
    count: u64,
}

#[async_trait]
impl EmployeeDirectory for StaticEmployeeDirectory {
    async fn count_in_department(&self, _department_id: i64) -> Result<u64, ClientError> {
        Ok(self.count)
    }

    async fn list_in_department(
        &self,
        _department_id: i64,
    ) -> Result<Vec<EmployeeSummary>, ClientError> {
        Ok(Vec::new())
    }
}

fn department_service(headcount: u64) -> (DepartmentService, Arc<InMemoryEventBus>) {
    let bus = Arc::new(InMemoryEventBus::new());
    let service = DepartmentService::new(
        Arc::new(InMemoryDepartmentRepository::new()),
        Arc::new(StaticEmployeeDirectory { count: headcount }),
        bus.clone(),
    );
    (service, bus)
}

#[tokio::test]
async fn test_department_create_enforces_unique_code() {
    // Arrange
    let (service, _bus) = department_service(0);
    let code = DepartmentCode::new("ENG".to_string()).unwrap();

    // Act
    let first = service
        .create("Engineering".to_string(), code.clone(), None)
        .await;
    let second = service
        .create("Engine Room".to_string(), code, None)
        .await;

    // Assert
    assert!(first.is_ok());
    assert!(matches!(second, Err(DomainError::DuplicateCode(_))));
}

#[tokio::test]
async fn test_department_delete_refused_with_headcount() {
    // Arrange
    let (service, _bus) = department_service(5);
    let code = DepartmentCode::new("ENG".to_string()).unwrap();
    let created = service
        .create("Engineering".to_string(), code, None)
        .await
        .unwrap();

    // Act
    let result = service.delete(created.id).await;

    // Assert
    assert!(matches!(
        result,
        Err(DomainError::DepartmentInUse { employees: 5, .. })
    ));
}

#[tokio::test]
async fn test_employee_service_stats() {
    // Arrange
    let repo = Arc::new(InMemoryEmployeeRepository::new());
    let bus = Arc::new(InMemoryEventBus::new());
    let service = EmployeeService::new(repo, bus);
    for (email, dept) in [
        ("a@example.com", Some(1)),
        ("b@example.com", Some(1)),
        ("c@example.com", None),
    ] {
        service
            .create(
                "X".to_string(),
                "Y".to_string(),
                EmailAddress::new(email.to_string()).unwrap(),
                dept,
            )
            .await
            .unwrap();
    }

    // Act
    let stats = service.stats().await.unwrap();

    // Assert
    assert_eq!(stats.total_employees, 3);
    assert_eq!(stats.employees_by_department.get(&1), Some(&2));
    assert_eq!(stats.employees_without_department, 1);
}

#[tokio::test]
async fn test_event_bus_assigns_offsets_and_broadcasts() {
    // Arrange
    let bus = InMemoryEventBus::new();
    let topic = TopicName::from(NOTIFICATIONS_TOPIC);
    let mut rx = bus.subscribe(&topic);

    // Act
    let first = bus
        .publish(DomainEvent::Notification(NotificationEvent::system("one")))
        .await;
    let second = bus
        .publish(DomainEvent::Notification(NotificationEvent::system("two")))
        .await;

    // Assert
    assert_eq!(first, 0);
    assert_eq!(second, 1);
    let delivered = rx.recv().await.unwrap();
    assert_eq!(delivered.offset, 0);
    assert_eq!(delivered.payload["message"], "one");
    let replay = bus.records_from(&topic, 1);
    assert_eq!(replay.len(), 1);
    assert_eq!(replay[0].payload["message"], "two");
}

#[tokio::test]
async fn test_response_cache_expires_and_evicts() {
    // Arrange
    let cache = ResponseCache::new(Duration::from_millis(50));
    cache.store("employees", "1", &"cached".to_string());

    // Act & Assert: fresh entry is served
    assert_eq!(
        cache.lookup::<String>("employees", "1"),
        Some("cached".to_string())
    );

    // Region eviction clears it
    cache.evict_regions(&["employees"]);
    assert_eq!(cache.lookup::<String>("employees", "1"), None);

    // TTL expiry clears it
    cache.store("employees", "2", &"cached".to_string());
    tokio::time::sleep(Duration::from_millis(80)).await;
    assert_eq!(cache.lookup::<String>("employees", "2"), None);
}

#[tokio::test]
async fn test_idempotency_store_replays_within_ttl() {
    // Arrange
    let store = IdempotencyStore::new(Duration::from_millis(60));
    let key = IdempotencyKey::parse(Some("req-1")).unwrap();
    let reply = EmployeeDto {
        id: 7,
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        department_id: None,
        department: None,
    };

    // Act & Assert
    store.remember(key.clone(), reply.clone());
    assert_eq!(store.recall(&key), Some(reply));

    tokio::time::sleep(Duration::from_millis(90)).await;
    assert_eq!(store.recall(&key), None);
}

#[tokio::test]
async fn test_blank_idempotency_keys_are_ignored() {
    assert_eq!(IdempotencyKey::parse(None), None);
    assert_eq!(IdempotencyKey::parse(Some("   ")), None);
    assert!(IdempotencyKey::parse(Some(" req-1 ")).is_some());
}

#[tokio::test]
async fn test_sort_parsing() {
    let sort = Sort::parse("lastName,desc").unwrap();
    assert_eq!(sort.field, "lastName");
    assert_eq!(sort.direction, SortDirection::Desc);

    let sort = Sort::parse("name").unwrap();
    assert_eq!(sort.direction, SortDirection::Asc);

    assert!(Sort::parse("").is_none());
    assert!(Sort::parse(",desc").is_none());

    // Page maths: 5 rows at size 2 make 3 pages
    let request = PageRequest::new(0, 2);
    let page = orghub::domain::repositories::Page::new(vec![1, 2], 5, &request);
    assert_eq!(page.total_pages, 3);
}
