use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoreboardError {
    #[error("store not found: {0}")]
    StoreNotFound(String),

    #[error("collection unavailable: {0}")]
    CollectionUnavailable(String),

    #[error("malformed document {0}: {1}")]
    MalformedDocument(String, String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("subscription failed: {0}")]
    Subscription(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

pub type Result<T> = std::result::Result<T, ScoreboardError>;
