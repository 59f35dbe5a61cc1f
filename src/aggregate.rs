use crate::types::board::ProjectAggregate;
use crate::types::rating::{CriterionId, NameLookup, ProjectId, RatingEvent};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// Reduces a full ratings snapshot to one aggregate per rated project.
///
/// Groups keep the order in which their project first appears in `events`.
/// The representative timestamp is the one carried by the first event of the
/// group. Events with a criterion outside `1..=5` or a non-finite score are
/// skipped and logged.
pub fn aggregate(events: &[RatingEvent], names: &NameLookup) -> Vec<ProjectAggregate> {
    let mut aggregates: Vec<ProjectAggregate> = Vec::new();
    let mut slots: HashMap<&ProjectId, usize> = HashMap::new();
    let mut skipped = 0usize;

    for event in events {
        let Some(criterion) = CriterionId::new(event.criterion_id) else {
            warn!(
                rating = %event.id,
                project = %event.project_id,
                criterion = event.criterion_id,
                "skipping rating with out-of-range criterion"
            );
            skipped += 1;
            continue;
        };
        if !event.score.is_finite() {
            warn!(
                rating = %event.id,
                project = %event.project_id,
                "skipping rating with non-finite score"
            );
            skipped += 1;
            continue;
        }

        let slot = *slots.entry(&event.project_id).or_insert_with(|| {
            aggregates.push(ProjectAggregate {
                project_id: event.project_id.clone(),
                name: display_name(&event.project_id, names),
                criteria: BTreeMap::new(),
                timestamp: event.timestamp,
            });
            aggregates.len() - 1
        });
        *aggregates[slot].criteria.entry(criterion).or_insert(0.0) += event.score;
    }

    debug!(
        events = events.len(),
        projects = aggregates.len(),
        skipped,
        "aggregated ratings snapshot"
    );
    aggregates
}

pub fn display_name(project_id: &ProjectId, names: &NameLookup) -> String {
    match names.get(project_id) {
        Some(name) => name.clone(),
        None => {
            debug!(project = %project_id, "no team name; using placeholder");
            format!("Project {project_id}")
        }
    }
}
