//! Resource model.
//!
//! Resources are the exclusive units of capacity that process operations:
//! machines, crews, teams. A resource processes at most one operation at
//! any instant.

use serde::{Deserialize, Serialize};

/// A resource that operations are bound to.
///
/// Identified by an opaque string ID. The problem model assigns each
/// distinct resource a dense integer slot once, and that slot is reused
/// for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Unique resource identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
}

impl Resource {
    /// Creates a new resource.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
        }
    }

    /// Creates a resource for an integer team number.
    ///
    /// The ID is the number itself; the name is `Team {index}`.
    pub fn indexed(index: usize) -> Self {
        Self::new(index.to_string()).with_name(format!("Team {index}"))
    }

    /// Sets the resource name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Name if set, otherwise the ID.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    /// Whether the ID is usable (non-blank).
    pub fn is_well_formed(&self) -> bool {
        !self.id.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_builder() {
        let r = Resource::new("M1").with_name("Lathe");
        assert_eq!(r.id, "M1");
        assert_eq!(r.display_name(), "Lathe");
        assert!(r.is_well_formed());
    }

    #[test]
    fn test_indexed_resource() {
        let r = Resource::indexed(3);
        assert_eq!(r.id, "3");
        assert_eq!(r.name, "Team 3");
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        assert_eq!(Resource::new("R7").display_name(), "R7");
    }

    #[test]
    fn test_blank_id_not_well_formed() {
        assert!(!Resource::new("").is_well_formed());
        assert!(!Resource::new(" \t").is_well_formed());
    }
}
