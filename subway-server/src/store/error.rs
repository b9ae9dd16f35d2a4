//! Store error types.

use crate::domain::{LineId, StationId, TopologyError};

/// Errors that can occur when reading or writing line data.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No line with this id
    #[error("line {0} not found")]
    LineNotFound(LineId),

    /// No station with this id
    #[error("station {0} not found")]
    StationNotFound(StationId),

    /// Station names are unique
    #[error("a station named {0:?} already exists")]
    DuplicateStationName(String),

    /// Line names are unique
    #[error("a line named {0:?} already exists")]
    DuplicateLineName(String),

    /// Line colors are unique
    #[error("a line with color {0:?} already exists")]
    DuplicateLineColor(String),

    /// The station is still part of at least one line
    #[error("station {0} is still registered on a line")]
    StationInUse(StationId),

    /// Sections to delete no longer match what is stored
    #[error("sections of line {0} changed since they were read")]
    StaleSnapshot(LineId),

    /// Stored or submitted values failed domain validation
    #[error(transparent)]
    Domain(#[from] TopologyError),

    /// Snapshot file could not be read or written
    #[error("snapshot error: {message}")]
    Snapshot { message: String },
}
