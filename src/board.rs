use crate::aggregate::aggregate;
use crate::rank::{ingest_order, score_order};
use crate::types::board::{ProjectAggregate, TeamRow};
use crate::types::rating::{CriterionId, NameLookup, RatingEvent};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use tracing::{debug, trace};

/// Maps aggregates, in their current order, to rows ranked from 1.
pub fn publish(aggregates: &[ProjectAggregate]) -> Vec<TeamRow> {
    aggregates
        .iter()
        .enumerate()
        .map(|(index, aggregate)| {
            let mut criteria = [0.0; 5];
            for id in CriterionId::all() {
                criteria[id.index()] = aggregate.criterion(id);
            }
            trace!(rank = index + 1, project = %aggregate.project_id, "published row");
            TeamRow {
                id: index + 1,
                name: aggregate.name.clone(),
                criteria,
            }
        })
        .collect()
}

/// Owns the rows shown to the presentation layer.
///
/// Rows are replaced as a whole on every change and pushed to each listener,
/// so a reader never sees a half-updated table.
#[derive(Debug)]
pub struct Board {
    rows: Arc<[TeamRow]>,
    listeners: Vec<Sender<Arc<[TeamRow]>>>,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            rows: Arc::from(Vec::new()),
            listeners: Vec::new(),
        }
    }
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> Arc<[TeamRow]> {
        Arc::clone(&self.rows)
    }

    pub fn listen(&mut self) -> Receiver<Arc<[TeamRow]>> {
        let (tx, rx) = mpsc::channel();
        self.listeners.push(tx);
        rx
    }

    /// Rebuilds the board from a full ratings snapshot in ingest order.
    ///
    /// Any earlier score sort is discarded.
    pub fn refresh(&mut self, events: &[RatingEvent], names: &NameLookup) {
        let mut aggregates = aggregate(events, names);
        ingest_order(&mut aggregates);
        self.replace(publish(&aggregates).into());
    }

    /// Reorders the current rows by descending average without refetching.
    pub fn sort_teams_descending(&mut self) {
        let mut rows = self.rows.to_vec();
        score_order(&mut rows);
        self.replace(rows.into());
    }

    fn replace(&mut self, rows: Arc<[TeamRow]>) {
        debug!(rows = rows.len(), listeners = self.listeners.len(), "publishing board");
        self.rows = rows;
        let rows = &self.rows;
        self.listeners
            .retain(|listener| listener.send(Arc::clone(rows)).is_ok());
    }
}
