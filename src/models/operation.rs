//! Operation model.
//!
//! An operation is the smallest schedulable unit of work. It belongs to
//! exactly one job at a fixed position, is bound to one resource, and
//! occupies that resource for a fixed duration.

use serde::{Deserialize, Serialize};

/// An operation (task) within a job.
///
/// The position inside the owning job is implicit: it is the operation's
/// index in [`Job::operations`](super::Job::operations).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// ID of the resource this operation occupies.
    pub resource: String,
    /// Processing time (time units). Must be positive.
    pub duration: i64,
    /// Activity label, used by named-activity ordering policies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Operation {
    /// Creates an operation on `resource` lasting `duration`.
    pub fn new(resource: impl Into<String>, duration: i64) -> Self {
        Self {
            resource: resource.into(),
            duration,
            label: None,
        }
    }

    /// Sets the activity label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_builder() {
        let op = Operation::new("R1", 5).with_label("Excavation");
        assert_eq!(op.resource, "R1");
        assert_eq!(op.duration, 5);
        assert_eq!(op.label.as_deref(), Some("Excavation"));
    }

    #[test]
    fn test_label_omitted_from_json_when_absent() {
        let json = serde_json::to_string(&Operation::new("R1", 2)).unwrap();
        assert_eq!(json, r#"{"resource":"R1","duration":2}"#);
    }
}
