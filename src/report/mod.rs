pub mod json;
pub mod md;

use crate::error::ScoreboardError;
use crate::types::board::TeamRow;
use crate::types::rating::CriterionId;
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Md,
}

/// Everything the presentation layer needs to draw one board.
#[derive(Debug, Clone)]
pub struct BoardView {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub visible_criteria: Vec<CriterionId>,
    pub rows: Arc<[TeamRow]>,
}

impl BoardView {
    pub fn new(title: &str, visible_criteria: Vec<CriterionId>, rows: Arc<[TeamRow]>) -> Self {
        Self {
            title: title.to_string(),
            generated_at: Utc::now(),
            visible_criteria,
            rows,
        }
    }
}

pub fn render(view: &BoardView, format: OutputFormat) -> Result<String, ScoreboardError> {
    match format {
        OutputFormat::Json => json::to_json(view).map_err(ScoreboardError::Json),
        OutputFormat::Md => Ok(md::to_markdown(view)),
    }
}
