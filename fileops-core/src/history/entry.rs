use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One journaled operation. Operation specific fields are stored flat next
/// to the common ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub operation: String,
    /// Number of files the operation touched.
    pub files: usize,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl HistoryEntry {
    pub fn new(operation: impl Into<String>, files: usize, success: bool) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            operation: operation.into(),
            files,
            timestamp: Utc::now(),
            success,
            details: Map::new(),
        }
    }

    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.get(key)
    }
}
