//! Correlation types for tracking a single persistence operation
//!
//! Every hydrate or persist call mints one `OperationId`. It is attached to
//! the operation's log events and to any error it returns, so a failed
//! persist can be matched to its start/end events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for one read or write of a store file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationId(String);

impl OperationId {
    /// Generate a new OperationId using UUIDv7 (time ordered)
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for OperationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OperationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_id_generation() {
        let id1 = OperationId::new();
        let id2 = OperationId::new();

        assert_ne!(id1, id2);
        assert!(!id1.as_str().is_empty());
    }

    #[test]
    fn test_operation_ids_sort_by_creation() {
        let first = OperationId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = OperationId::new();

        assert!(first.as_str() < second.as_str());
    }

    #[test]
    fn test_operation_id_display() {
        let id = OperationId::new();
        assert_eq!(format!("{}", id), id.as_str());
    }

    #[test]
    fn test_serialization() {
        let id = OperationId::from_string("op-1".to_string());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"op-1\"");
        let deserialized: OperationId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
