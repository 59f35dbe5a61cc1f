pub mod filesystem;
pub mod subscription;

use crate::error::{Result, ScoreboardError};
use crate::types::rating::{NameLookup, RatingEvent};

pub use filesystem::FileStore;
pub use subscription::Subscription;

pub type SnapshotCallback = Box<dyn FnMut(Vec<RatingEvent>) + Send>;
pub type ErrorCallback = Box<dyn FnMut(ScoreboardError) + Send>;

/// Source of project names and of the live ratings collection.
pub trait RatingStore {
    /// One-shot read of project id to team name.
    fn load_project_names(&self) -> Result<NameLookup>;

    /// Delivers the complete ratings set every time it changes, starting with
    /// the current contents.
    ///
    /// `on_error` fires at most once, after which the subscription delivers
    /// nothing more. Nothing is retried.
    fn subscribe_ratings(
        &self,
        on_snapshot: SnapshotCallback,
        on_error: ErrorCallback,
    ) -> Result<Subscription>;
}
