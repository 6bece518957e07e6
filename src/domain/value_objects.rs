use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::errors::DomainError;

/// Short, unique business key for a department (e.g. `TECH`, `MKT`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DepartmentCode(pub String);

impl DepartmentCode {
    pub fn new(code: String) -> Result<Self, DomainError> {
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid("code", "code is required"));
        }
        if trimmed.len() > 20 {
            return Err(DomainError::invalid(
                "code",
                "code must not exceed 20 characters",
            ));
        }
        Ok(DepartmentCode(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DepartmentCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Employee email address; unique across the employee service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(pub String);

impl EmailAddress {
    pub fn new(email: String) -> Result<Self, DomainError> {
        let trimmed = email.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid("email", "email is required"));
        }
        if trimmed.len() > 200 {
            return Err(DomainError::invalid(
                "email",
                "email must not exceed 200 characters",
            ));
        }
        // Shape check only; full RFC validation is not the point here
        let mut parts = trimmed.splitn(2, '@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().unwrap_or_default();
        if local.is_empty() || domain.is_empty() || !domain.contains('.') {
            return Err(DomainError::invalid("email", "email must be valid"));
        }
        Ok(EmailAddress(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Client-supplied token that deduplicates repeated creation requests
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdempotencyKey(pub String);

impl IdempotencyKey {
    /// Returns `None` for absent or blank keys; a blank key is treated the
    /// same as no key at all.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let trimmed = raw?.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(IdempotencyKey(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name of an event topic with validation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TopicName(pub String);

impl TopicName {
    pub fn new(name: String) -> Result<Self, DomainError> {
        if name.is_empty() {
            return Err(DomainError::invalid("topic", "topic name cannot be empty"));
        }
        if name.contains(char::is_whitespace) {
            return Err(DomainError::invalid(
                "topic",
                "topic name cannot contain whitespace",
            ));
        }
        Ok(TopicName(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TopicName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Request correlation id, taken from the `X-Trace-Id` header or generated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceId(pub String);

impl TraceId {
    pub fn generate() -> Self {
        TraceId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::generate()
    }
}

impl From<String> for TraceId {
    fn from(id: String) -> Self {
        TraceId(id)
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TopicName {
    fn from(name: &str) -> Self {
        TopicName(name.to_string())
    }
}

impl From<String> for TopicName {
    fn from(name: String) -> Self {
        TopicName(name)
    }
}
