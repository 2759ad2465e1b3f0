use std::fmt;
use thiserror::Error;

use crate::ranks::FilterSyntaxError;
use crate::stats::ProviderError;

#[derive(Debug, Error)]
pub enum QueryError {
    /// Malformed user input. Reported back to the user, never logged as a fault.
    #[error("{0}")]
    BadRequest(String),

    /// A stats call failed for a reason other than missing data.
    #[error("Stats service failure: {0}")]
    Service(#[from] ProviderError),

    #[error("Failed to render report")]
    Render(#[from] fmt::Error),
}

impl QueryError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        QueryError::BadRequest(message.into())
    }

    pub fn is_bad_request(&self) -> bool {
        matches!(self, QueryError::BadRequest(_))
    }
}

impl From<FilterSyntaxError> for QueryError {
    fn from(err: FilterSyntaxError) -> Self {
        QueryError::BadRequest(err.to_string())
    }
}
