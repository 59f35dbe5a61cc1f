use crate::error::ScoreboardError;
use crate::types::rating::CriterionId;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoreboardConfig {
    pub store: Option<StoreConfig>,
    pub board: Option<BoardConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_projects_collection")]
    pub projects: String,
    #[serde(default = "default_ratings_collection")]
    pub ratings: String,
    pub poll_interval_ms: Option<u64>,
}

fn default_projects_collection() -> String {
    "projects".to_string()
}

fn default_ratings_collection() -> String {
    "ratings".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoardConfig {
    pub title: Option<String>,
    pub visible_criteria: Option<Vec<i64>>,
}

impl ScoreboardConfig {
    pub const DEFAULT_TITLE: &'static str = "Scoreboard";
    pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

    pub fn projects_collection(&self) -> &str {
        self.store
            .as_ref()
            .map(|store| store.projects.as_str())
            .unwrap_or("projects")
    }

    pub fn ratings_collection(&self) -> &str {
        self.store
            .as_ref()
            .map(|store| store.ratings.as_str())
            .unwrap_or("ratings")
    }

    pub fn poll_interval(&self) -> Duration {
        let millis = self
            .store
            .as_ref()
            .and_then(|store| store.poll_interval_ms)
            .unwrap_or(Self::DEFAULT_POLL_INTERVAL_MS);
        Duration::from_millis(millis)
    }

    pub fn title(&self) -> &str {
        self.board
            .as_ref()
            .and_then(|board| board.title.as_deref())
            .unwrap_or(Self::DEFAULT_TITLE)
    }

    /// Criteria shown as table columns. The average always covers all five.
    pub fn visible_criteria(&self) -> Vec<CriterionId> {
        match self
            .board
            .as_ref()
            .and_then(|board| board.visible_criteria.as_ref())
        {
            Some(ids) => ids.iter().filter_map(|id| CriterionId::new(*id)).collect(),
            None => CriterionId::all().collect(),
        }
    }

    pub fn validate(&self) -> Result<(), ScoreboardError> {
        if let Some(store) = &self.store {
            if store.poll_interval_ms == Some(0) {
                return Err(ScoreboardError::ConfigParse(
                    "store.poll_interval_ms must be greater than 0".to_string(),
                ));
            }
            for (key, name) in [("projects", &store.projects), ("ratings", &store.ratings)] {
                if name.trim().is_empty() {
                    return Err(ScoreboardError::ConfigParse(format!(
                        "store.{key} must be a non-empty collection name"
                    )));
                }
            }
            if store.projects == store.ratings {
                return Err(ScoreboardError::ConfigParse(
                    "store.projects and store.ratings must name different collections"
                        .to_string(),
                ));
            }
        }

        if let Some(ids) = self
            .board
            .as_ref()
            .and_then(|board| board.visible_criteria.as_ref())
        {
            if ids.is_empty() {
                return Err(ScoreboardError::ConfigParse(
                    "board.visible_criteria cannot be empty".to_string(),
                ));
            }
            let mut seen = HashSet::new();
            for id in ids {
                if CriterionId::new(*id).is_none() {
                    return Err(ScoreboardError::ConfigParse(format!(
                        "board.visible_criteria entries must be between 1 and 5 (found {id})"
                    )));
                }
                if !seen.insert(*id) {
                    return Err(ScoreboardError::ConfigParse(format!(
                        "board.visible_criteria contains duplicate criterion: {id}"
                    )));
                }
            }
        }

        Ok(())
    }
}
