use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Scoring dimension, always within `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CriterionId(u8);

impl CriterionId {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(raw: i64) -> Option<Self> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&raw) {
            Some(Self(raw as u8))
        } else {
            None
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        usize::from(self.0 - Self::MIN)
    }

    pub fn all() -> impl Iterator<Item = CriterionId> {
        (Self::MIN..=Self::MAX).map(CriterionId)
    }
}

impl fmt::Display for CriterionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Store clock value with seconds resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp {
    pub seconds: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RatingEvent {
    pub id: String,
    pub project_id: ProjectId,
    /// Raw criterion as submitted; out-of-range values are dropped during aggregation.
    pub criterion_id: i64,
    pub score: f64,
    pub timestamp: Option<Timestamp>,
}

impl RatingEvent {
    #[cfg(test)]
    pub fn new(
        id: impl Into<String>,
        project_id: impl Into<String>,
        criterion_id: i64,
        score: f64,
        timestamp: Option<i64>,
    ) -> Self {
        Self {
            id: id.into(),
            project_id: ProjectId::new(project_id),
            criterion_id,
            score,
            timestamp: timestamp.map(|seconds| Timestamp { seconds }),
        }
    }
}

pub type NameLookup = HashMap<ProjectId, String>;
