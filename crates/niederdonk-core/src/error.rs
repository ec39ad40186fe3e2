use thiserror::Error;

#[derive(Debug, Error)]
pub enum NiederdonkError {
    /// A base case or catalog constant violates a structural precondition.
    /// Raised once at setup, never during interactive recomputation.
    #[error("Configuration error: {field}: {reason}")]
    Configuration { field: String, reason: String },

    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl NiederdonkError {
    pub(crate) fn configuration(field: &str, reason: impl Into<String>) -> Self {
        NiederdonkError::Configuration {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        NiederdonkError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for NiederdonkError {
    fn from(e: serde_json::Error) -> Self {
        NiederdonkError::SerializationError(e.to_string())
    }
}
