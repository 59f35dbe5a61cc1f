use crate::types::board::{ProjectAggregate, TeamRow};

/// Most recent first. Absent timestamps rank as zero; ties keep input order.
pub fn ingest_order(aggregates: &mut [ProjectAggregate]) {
    aggregates.sort_by(|a, b| b.recency().cmp(&a.recency()));
}

/// Highest average first. Ties keep their current relative order.
pub fn score_order(rows: &mut [TeamRow]) {
    rows.sort_by(|a, b| b.average().total_cmp(&a.average()));
}
