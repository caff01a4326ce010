//! JSON problem files.
//!
//! A file describes the jobs either by resource ID:
//!
//! ```json
//! { "jobs": [ { "id": "A", "operations": [ { "resource": "M1", "duration": 3 } ] } ] }
//! ```
//!
//! or by integer resource index, one `[resource, duration]` pair per
//! operation:
//!
//! ```json
//! { "indexed": [ [[0, 3], [1, 2]], [[1, 4], [0, 1]] ] }
//! ```
//!
//! An optional `config` object overrides [`AcoConfig`] defaults and an
//! optional `activity_order` lists operation labels in their required order.

use serde::{Deserialize, Serialize};

use crate::aco::{AcoConfig, NamedActivityOrder};
use crate::error::{AcoError, AcoResult};
use crate::models::{Job, ProblemModel, Resource};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProblemFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobs: Option<Vec<Job>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<Resource>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexed: Option<Vec<Vec<(usize, i64)>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<AcoConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_order: Option<Vec<String>>,
}

impl ProblemFile {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Builds the problem model.
    ///
    /// # Errors
    /// `InvalidParameter` unless exactly one of `jobs` and `indexed` is
    /// present, or if `resources` accompanies `indexed`. Otherwise any
    /// validation failure of the jobs themselves.
    pub fn problem(&self) -> AcoResult<ProblemModel> {
        match (&self.jobs, &self.indexed) {
            (Some(jobs), None) => match &self.resources {
                Some(resources) => ProblemModel::with_resources(jobs.clone(), resources.clone()),
                None => ProblemModel::new(jobs.clone()),
            },
            (None, Some(_)) if self.resources.is_some() => Err(AcoError::parameter(
                "\"resources\" cannot be combined with \"indexed\"",
            )),
            (None, Some(indexed)) => ProblemModel::from_indexed(indexed),
            (Some(_), Some(_)) => Err(AcoError::parameter(
                "problem file has both \"jobs\" and \"indexed\"",
            )),
            (None, None) => Err(AcoError::parameter(
                "problem file needs \"jobs\" or \"indexed\"",
            )),
        }
    }

    /// The file's config, or defaults.
    pub fn config(&self) -> AcoConfig {
        self.config.clone().unwrap_or_default()
    }

    /// Label ordering policy for `problem`, if the file lists one.
    pub fn activity_order(&self, problem: &ProblemModel) -> Option<NamedActivityOrder> {
        self.activity_order
            .as_ref()
            .map(|labels| NamedActivityOrder::new(problem, labels))
    }
}
