use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use log::{info, warn};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::domain::{events::*, value_objects::TopicName};

const CHANNEL_CAPACITY: usize = 256;

struct TopicLog {
    records: Vec<EventRecord>,
    channel: broadcast::Sender<EventRecord>,
}

impl TopicLog {
    fn new() -> Self {
        let (channel, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            records: Vec::new(),
            channel,
        }
    }
}

/// In-process event bus: one append-only record log per topic, with offsets
/// assigned in publication order and broadcast fan-out to live subscribers.
/// Each service process owns its own bus; records are not delivered across
/// processes.
pub struct InMemoryEventBus {
    topics: DashMap<TopicName, TopicLog>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self {
            topics: DashMap::new(),
        }
    }

    fn append(&self, topic: TopicName, event_type: &str, payload: Value) -> u64 {
        let mut log = self.topics.entry(topic.clone()).or_insert_with(TopicLog::new);
        let offset = log.records.len() as u64;
        let record = EventRecord {
            topic,
            event_type: event_type.to_string(),
            payload,
            offset,
            timestamp: Utc::now(),
        };
        log.records.push(record.clone());
        // No receivers is fine; the log still retains the record
        let _ = log.channel.send(record);
        offset
    }

    /// Subscribe to a topic; only records published after this call are
    /// delivered. Use [`records_from`](Self::records_from) for history.
    pub fn subscribe(&self, topic: &TopicName) -> broadcast::Receiver<EventRecord> {
        self.topics
            .entry(topic.clone())
            .or_insert_with(TopicLog::new)
            .channel
            .subscribe()
    }

    /// Records of a topic starting at the given offset.
    pub fn records_from(&self, topic: &TopicName, offset: u64) -> Vec<EventRecord> {
        self.topics
            .get(topic)
            .map(|log| {
                log.records
                    .iter()
                    .skip(offset as usize)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of records published to a topic so far.
    pub fn len(&self, topic: &TopicName) -> u64 {
        self.topics
            .get(topic)
            .map(|log| log.records.len() as u64)
            .unwrap_or(0)
    }

    pub fn is_empty(&self, topic: &TopicName) -> bool {
        self.len(topic) == 0
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: DomainEvent) -> u64 {
        let topic = event.topic();
        let event_type = event.event_type();
        let offset = self.append(topic.clone(), event_type, event.payload());
        info!("Published {} to {} at offset {}", event_type, topic, offset);
        offset
    }
}

/// Log every department event, keyed by its type.
pub fn spawn_department_event_listener(bus: &Arc<InMemoryEventBus>) {
    let mut rx = bus.subscribe(&TopicName::from(DEPARTMENT_EVENTS_TOPIC));
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(record) => match record.event_type.as_str() {
                    "DEPARTMENT_CREATED" => {
                        info!("Department created: {}", record.payload);
                    }
                    "DEPARTMENT_UPDATED" => {
                        info!("Department updated: {}", record.payload);
                    }
                    "DEPARTMENT_DELETED" => {
                        info!("Department deleted: {}", record.payload);
                    }
                    other => warn!("Unknown department event type: {}", other),
                },
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!("Department event listener lagged, missed {}", missed);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

/// Log every employee event, keyed by its type.
pub fn spawn_employee_event_listener(bus: &Arc<InMemoryEventBus>) {
    let mut rx = bus.subscribe(&TopicName::from(EMPLOYEE_EVENTS_TOPIC));
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(record) => match record.event_type.as_str() {
                    "EMPLOYEE_CREATED" => info!("Employee created: {}", record.payload),
                    "EMPLOYEE_UPDATED" => info!("Employee updated: {}", record.payload),
                    "EMPLOYEE_DELETED" => info!("Employee deleted: {}", record.payload),
                    other => warn!("Unknown employee event type: {}", other),
                },
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!("Employee event listener lagged, missed {}", missed);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

/// Log notifications with their recipient and message.
pub fn spawn_notification_listener(bus: &Arc<InMemoryEventBus>) {
    let mut rx = bus.subscribe(&TopicName::from(NOTIFICATIONS_TOPIC));
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(record) => {
                    let recipient = record
                        .payload
                        .get("recipient")
                        .and_then(Value::as_str)
                        .unwrap_or("unknown");
                    let message = record
                        .payload
                        .get("message")
                        .and_then(Value::as_str)
                        .unwrap_or_default();
                    info!(
                        "Notification ({}) for {}: {}",
                        record.event_type, recipient, message
                    );
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!("Notification listener lagged, missed {}", missed);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}
