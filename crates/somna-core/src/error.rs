#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("invalid wake time: {0} (expected HH:MM)")]
    InvalidWakeTime(String),
    #[error("session ends before it starts: {0}")]
    InvalidSessionRange(String),
    #[error("quality rating must be between 1 and 5, got {0}")]
    InvalidQuality(u8),
    #[error("notes must be less than 500 characters")]
    NotesTooLong,
}
