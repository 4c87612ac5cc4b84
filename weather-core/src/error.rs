use thiserror::Error;

use crate::model::WeatherSnapshot;

/// Result of one query: either a complete snapshot or a classified failure.
pub type PipelineOutcome = Result<WeatherSnapshot, QueryError>;

/// Every way a query can end without a snapshot.
///
/// Low-level transport faults never leave the crate unclassified; they are
/// folded into one of these variants at the provider boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The name search returned no candidates. Not a defect.
    #[error("No location found for '{place}'")]
    NotFound { place: String },

    /// Timeout, refused connection or non-success status on either upstream call.
    #[error("Network error: {0}")]
    Network(String),

    /// Success status, but the body lacked required fields or held out-of-range values.
    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),
}

impl QueryError {
    /// Network and malformed-response failures get the same "try again later" treatment.
    pub fn is_transient(&self) -> bool {
        !matches!(self, QueryError::NotFound { .. })
    }
}

impl From<reqwest::Error> for QueryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            QueryError::Network(format!("request timed out: {err}"))
        } else {
            QueryError::Network(err.to_string())
        }
    }
}

/// Rejected place-name input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Place name must not be empty")]
pub struct InvalidPlaceName;
