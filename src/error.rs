use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildscopeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Parsing error: {0}")]
    Parsing(String),
    #[error("Version control error: {0}")]
    Vcs(String),
    #[error("An analysis is already in progress")]
    AnalysisInProgress,
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, BuildscopeError>;
