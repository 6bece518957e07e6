use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::value_objects::TopicName;

pub const DEPARTMENT_EVENTS_TOPIC: &str = "department-events";
pub const EMPLOYEE_EVENTS_TOPIC: &str = "employee-events";
pub const NOTIFICATIONS_TOPIC: &str = "notifications";

/// Department lifecycle data carried by every department event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentEventData {
    pub department_id: i64,
    pub name: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DepartmentEvent {
    Created(DepartmentEventData),
    Updated(DepartmentEventData),
    Deleted(DepartmentEventData),
}

#[derive(Debug, Clone, PartialEq)]
pub enum EmployeeEvent {
    Created {
        employee_id: i64,
        email: String,
        first_name: String,
        last_name: String,
        department_id: Option<i64>,
    },
    Updated {
        employee_id: i64,
        email: String,
        old_department_id: Option<i64>,
        new_department_id: Option<i64>,
    },
    Deleted {
        employee_id: i64,
        email: String,
        first_name: String,
        last_name: String,
        department_id: Option<i64>,
    },
}

/// System notification addressed to a recipient (logged, not delivered)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    pub recipient: String,
    pub message: String,
}

impl NotificationEvent {
    pub fn system(message: impl Into<String>) -> Self {
        Self {
            recipient: "admin@company.com".to_string(),
            message: message.into(),
        }
    }
}

/// Any event this suite publishes, with its topic and wire type name
#[derive(Debug, Clone, PartialEq)]
pub enum DomainEvent {
    Department(DepartmentEvent),
    Employee(EmployeeEvent),
    Notification(NotificationEvent),
}

impl DomainEvent {
    pub fn topic(&self) -> TopicName {
        match self {
            DomainEvent::Department(_) => TopicName::from(DEPARTMENT_EVENTS_TOPIC),
            DomainEvent::Employee(_) => TopicName::from(EMPLOYEE_EVENTS_TOPIC),
            DomainEvent::Notification(_) => TopicName::from(NOTIFICATIONS_TOPIC),
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            DomainEvent::Department(DepartmentEvent::Created(_)) => "DEPARTMENT_CREATED",
            DomainEvent::Department(DepartmentEvent::Updated(_)) => "DEPARTMENT_UPDATED",
            DomainEvent::Department(DepartmentEvent::Deleted(_)) => "DEPARTMENT_DELETED",
            DomainEvent::Employee(EmployeeEvent::Created { .. }) => "EMPLOYEE_CREATED",
            DomainEvent::Employee(EmployeeEvent::Updated { .. }) => "EMPLOYEE_UPDATED",
            DomainEvent::Employee(EmployeeEvent::Deleted { .. }) => "EMPLOYEE_DELETED",
            DomainEvent::Notification(_) => "SYSTEM",
        }
    }

    /// JSON payload as it appears on the bus.
    pub fn payload(&self) -> Value {
        match self {
            DomainEvent::Department(
                DepartmentEvent::Created(data)
                | DepartmentEvent::Updated(data)
                | DepartmentEvent::Deleted(data),
            ) => serde_json::to_value(data).unwrap_or_else(|_| json!({})),
            DomainEvent::Employee(EmployeeEvent::Created {
                employee_id,
                email,
                first_name,
                last_name,
                department_id,
            })
            | DomainEvent::Employee(EmployeeEvent::Deleted {
                employee_id,
                email,
                first_name,
                last_name,
                department_id,
            }) => json!({
                "employeeId": employee_id,
                "email": email,
                "firstName": first_name,
                "lastName": last_name,
                "departmentId": department_id,
            }),
            DomainEvent::Employee(EmployeeEvent::Updated {
                employee_id,
                email,
                old_department_id,
                new_department_id,
            }) => json!({
                "employeeId": employee_id,
                "email": email,
                "oldDepartmentId": old_department_id,
                "newDepartmentId": new_department_id,
            }),
            DomainEvent::Notification(event) => {
                serde_json::to_value(event).unwrap_or_else(|_| json!({}))
            }
        }
    }
}

/// Envelope stored in a topic log and delivered to subscribers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub topic: TopicName,
    pub event_type: String,
    pub payload: Value,
    pub offset: u64,
    pub timestamp: DateTime<Utc>,
}

/// Port through which domain services publish events. Publication is
/// fire-and-forget: a failed or unobserved delivery never fails the request
/// that triggered it.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Append the event to its topic; returns the assigned offset.
    async fn publish(&self, event: DomainEvent) -> u64;
}

/// Publisher that drops every event; useful in tests and tools.
pub struct NoopEventPublisher;

#[async_trait]
impl EventPublisher for NoopEventPublisher {
    async fn publish(&self, _event: DomainEvent) -> u64 {
        0
    }
}
