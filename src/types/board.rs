use crate::types::rating::{CriterionId, ProjectId, Timestamp};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Summed ratings for one project. Criteria without ratings are absent.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectAggregate {
    pub project_id: ProjectId,
    pub name: String,
    pub criteria: BTreeMap<CriterionId, f64>,
    pub timestamp: Option<Timestamp>,
}

impl ProjectAggregate {
    pub fn criterion(&self, id: CriterionId) -> f64 {
        self.criteria.get(&id).copied().unwrap_or(0.0)
    }

    /// Recency key; an absent timestamp orders as zero.
    pub fn recency(&self) -> i64 {
        self.timestamp.map(|ts| ts.seconds).unwrap_or(0)
    }
}

/// One display row. `id` is positional and carries no identity across publishes.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamRow {
    pub id: usize,
    pub name: String,
    pub criteria: [f64; 5],
}

impl TeamRow {
    pub fn criterion(&self, id: CriterionId) -> f64 {
        self.criteria[id.index()]
    }

    pub fn average(&self) -> f64 {
        crate::score::average(self)
    }
}

impl Serialize for TeamRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut row = serializer.serialize_struct("TeamRow", 8)?;
        row.serialize_field("id", &self.id)?;
        row.serialize_field("name", &self.name)?;
        row.serialize_field("criteria1", &self.criteria[0])?;
        row.serialize_field("criteria2", &self.criteria[1])?;
        row.serialize_field("criteria3", &self.criteria[2])?;
        row.serialize_field("criteria4", &self.criteria[3])?;
        row.serialize_field("criteria5", &self.criteria[4])?;
        row.serialize_field("average", &self.average())?;
        row.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_row_serializes_flat_criteria_and_average() {
        let row = TeamRow {
            id: 1,
            name: "Alpha".to_string(),
            criteria: [3.0, 4.0, 0.0, 0.0, 0.0],
        };
        let value = serde_json::to_value(&row).expect("row should serialize");
        assert_eq!(value["id"], 1);
        assert_eq!(value["name"], "Alpha");
        assert_eq!(value["criteria2"], 4.0);
        assert_eq!(value["criteria5"], 0.0);
        assert_eq!(value["average"], 3.5);
    }

    #[test]
    fn aggregate_reads_absent_criterion_as_zero() {
        let aggregate = ProjectAggregate {
            project_id: ProjectId::new("p1"),
            name: "Project p1".to_string(),
            criteria: BTreeMap::new(),
            timestamp: None,
        };
        let id = CriterionId::new(3).expect("3 is a valid criterion");
        assert_eq!(aggregate.criterion(id), 0.0);
        assert_eq!(aggregate.recency(), 0);
    }
}
