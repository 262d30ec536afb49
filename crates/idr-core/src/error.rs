use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectorError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Missing rule table: {0}")]
    MissingRuleTable(String),

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for ProjectorError {
    fn from(e: serde_json::Error) -> Self {
        ProjectorError::SerializationError(e.to_string())
    }
}
