use somna_core::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("invalid record: {0}")]
    Invalid(#[from] CoreError),
    #[error("session not found: {0}")]
    SessionNotFound(String),
    #[error("configuration error: {0}")]
    Config(String),
}
