use crate::board::Board;
use crate::error::{Result, ScoreboardError};
use crate::store::{RatingStore, Subscription};
use crate::types::board::TeamRow;
use crate::types::rating::{NameLookup, RatingEvent};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Unsubscribed,
    Subscribing,
    Streaming,
    Updating,
    Error,
}

#[derive(Debug)]
pub enum StoreEvent {
    Snapshot(Vec<RatingEvent>),
    Failed(ScoreboardError),
}

/// Live scoreboard: one store subscription feeding one [`Board`].
///
/// Store callbacks only forward into a channel; every update is applied on
/// the thread that calls [`Pipeline::process_next`], one at a time.
pub struct Pipeline<S: RatingStore> {
    store: S,
    board: Board,
    names: NameLookup,
    state: PipelineState,
    subscription: Option<Subscription>,
    events: Option<Receiver<StoreEvent>>,
}

impl<S: RatingStore> Pipeline<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            board: Board::new(),
            names: NameLookup::new(),
            state: PipelineState::Unsubscribed,
            subscription: None,
            events: None,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    #[cfg(test)]
    pub fn rows(&self) -> Arc<[TeamRow]> {
        self.board.rows()
    }

    pub fn listen(&mut self) -> Receiver<Arc<[TeamRow]>> {
        self.board.listen()
    }

    #[cfg(test)]
    pub fn sort_teams_descending(&mut self) {
        self.board.sort_teams_descending();
    }

    /// Loads project names once, then opens the ratings subscription.
    ///
    /// A failed name load is logged and leaves the lookup empty. Names are
    /// not reloaded while streaming. Starting from [`PipelineState::Error`]
    /// resubscribes and keeps the last board until the next snapshot.
    pub fn start(&mut self) -> Result<()> {
        match self.state {
            PipelineState::Unsubscribed => {}
            PipelineState::Error => {
                info!("restarting pipeline after subscription failure");
                self.release();
            }
            state => {
                debug!(?state, "pipeline already started");
                return Ok(());
            }
        }
        self.state = PipelineState::Subscribing;

        self.names = match self.store.load_project_names() {
            Ok(names) => names,
            Err(err) => {
                warn!(error = %err, "project names unavailable; using placeholders");
                NameLookup::new()
            }
        };

        let (tx, rx) = mpsc::channel();
        let error_tx = tx.clone();
        let subscription = self.store.subscribe_ratings(
            Box::new(move |events| {
                let _ = tx.send(StoreEvent::Snapshot(events));
            }),
            Box::new(move |err| {
                let _ = error_tx.send(StoreEvent::Failed(err));
            }),
        );

        match subscription {
            Ok(subscription) => {
                self.subscription = Some(subscription);
                self.events = Some(rx);
                self.state = PipelineState::Streaming;
                info!("pipeline streaming");
                Ok(())
            }
            Err(err) => {
                self.state = PipelineState::Unsubscribed;
                Err(err)
            }
        }
    }

    /// Waits up to `timeout` for the next store event and applies it.
    ///
    /// Returns `Ok(true)` when the board was rebuilt and `Ok(false)` on
    /// timeout. A transport failure moves the pipeline to
    /// [`PipelineState::Error`], keeps the last good rows, and is returned.
    pub fn process_next(&mut self, timeout: Duration) -> Result<bool> {
        let Some(events) = &self.events else {
            return Err(ScoreboardError::Subscription(format!(
                "pipeline is not streaming (state {:?})",
                self.state
            )));
        };

        let event = match events.recv_timeout(timeout) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => return Ok(false),
            Err(RecvTimeoutError::Disconnected) => StoreEvent::Failed(
                ScoreboardError::Subscription("ratings stream closed".to_string()),
            ),
        };
        self.apply(event)
    }

    fn apply(&mut self, event: StoreEvent) -> Result<bool> {
        match event {
            StoreEvent::Snapshot(events) => {
                self.state = PipelineState::Updating;
                self.board.refresh(&events, &self.names);
                self.state = PipelineState::Streaming;
                debug!(
                    ratings = events.len(),
                    projects = self.board.rows().len(),
                    "applied ratings snapshot"
                );
                Ok(true)
            }
            StoreEvent::Failed(err) => {
                error!(error = %err, "ratings subscription failed; keeping last board");
                self.release();
                self.state = PipelineState::Error;
                Err(err)
            }
        }
    }

    /// Tears the subscription down. Safe to call repeatedly or before `start`.
    pub fn stop(&mut self) {
        if self.release() {
            info!("pipeline stopped");
        }
        self.state = PipelineState::Unsubscribed;
    }

    fn release(&mut self) -> bool {
        self.events = None;
        match self.subscription.take() {
            Some(subscription) => {
                subscription.unsubscribe();
                true
            }
            None => false,
        }
    }
}
