use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),
}

pub type Result<T> = std::result::Result<T, MemoryError>;
