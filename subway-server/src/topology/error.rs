//! Errors from topology operations.

use crate::domain::{LineId, StationId, TopologyError};
use crate::store::StoreError;

/// Error from a [`LineTopologyService`](super::LineTopologyService) operation.
///
/// Validation always runs before any write, so when one of these is
/// returned the stored sections are exactly as they were before the call.
#[derive(Debug, thiserror::Error)]
pub enum TopologyServiceError {
    /// The line does not exist
    #[error("line {0} not found")]
    LineNotFound(LineId),

    /// The station does not exist at all (as opposed to not being on the line)
    #[error("station {0} not found")]
    UnknownStation(StationId),

    /// The requested change breaks the line's topology rules
    #[error(transparent)]
    Topology(#[from] TopologyError),

    /// Storage failed or refused the change
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TopologyServiceError {
    /// True for errors that indicate a bug, damaged data or failed
    /// persistence rather than a bad request.
    pub fn is_defect(&self) -> bool {
        matches!(
            self,
            TopologyServiceError::Topology(TopologyError::TopologyCorrupt(_))
                | TopologyServiceError::Store(StoreError::Domain(
                    TopologyError::TopologyCorrupt(_)
                ))
                | TopologyServiceError::Store(StoreError::Snapshot { .. })
        )
    }
}
