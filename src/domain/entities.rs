use serde::{Deserialize, Serialize};

/// An organizational unit with a unique short code as its business key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
}

impl Department {
    /// Create an unsaved department; the repository assigns the id on save.
    pub fn new(name: String, code: String, description: Option<String>) -> Self {
        Self {
            id: 0,
            name,
            code,
            description,
        }
    }
}

/// A person, optionally assigned to a department by id. The department row
/// lives in a different service; only the id is stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department_id: Option<i64>,
}

impl Employee {
    /// Create an unsaved employee; the repository assigns the id on save.
    pub fn new(
        first_name: String,
        last_name: String,
        email: String,
        department_id: Option<i64>,
    ) -> Self {
        Self {
            id: 0,
            first_name,
            last_name,
            email,
            department_id,
        }
    }

    /// Case-insensitive match against first name, last name, or email.
    pub fn matches_query(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        self.first_name.to_lowercase().contains(&q)
            || self.last_name.to_lowercase().contains(&q)
            || self.email.to_lowercase().contains(&q)
    }
}

/// Catalog product as served by the upstream store API; never persisted here
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub rating: Option<Rating>,
}

impl Product {
    /// Case-insensitive match against title, description, or category.
    pub fn matches_query(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        self.title.to_lowercase().contains(&q)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&q))
            || self
                .category
                .as_deref()
                .is_some_and(|c| c.to_lowercase().contains(&q))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub rate: Option<f64>,
    pub count: Option<u32>,
}
