//! Error types for analytics operations

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Outcomes that stop an analytics operation before any scoring happens
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    /// Window end precedes window start
    #[error("Invalid range: from ({start}) must not be after to ({end})")]
    InvalidRange {
        /// Requested start
        start: DateTime<Utc>,
        /// Requested end
        end: DateTime<Utc>,
    },

    /// Detail lookup for a port that does not exist
    #[error("Port {0} not found")]
    PortNotFound(String),

    /// Detail lookup for an inspector that does not exist
    #[error("Inspector {0} not found")]
    InspectorNotFound(String),
}

impl AnalyticsError {
    /// Whether this is a missing-entity outcome rather than a bad request
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AnalyticsError::PortNotFound(_) | AnalyticsError::InspectorNotFound(_)
        )
    }
}
