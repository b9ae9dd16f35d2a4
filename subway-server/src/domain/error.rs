//! Domain error types.
//!
//! These errors represent validation failures of stations, sections and
//! lines, and violations of the single-path invariant of a line. They are
//! distinct from storage and HTTP errors.

use super::StationId;

/// Domain-level errors for section topology and value validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    /// A section distance (given or derived) is below 1
    #[error("invalid distance {0}: a section must be at least 1 long")]
    InvalidDistance(i64),

    /// A section starts and ends at the same station
    #[error("section cannot start and end at station {0}")]
    SelfLoop(StationId),

    /// The new section does not attach to the current path
    #[error("section {up} -> {down} does not connect to the line")]
    SectionConnection { up: StationId, down: StationId },

    /// Both stations of the new section are already on the line
    #[error("stations {up} and {down} are both already on the line")]
    DuplicateStation { up: StationId, down: StationId },

    /// The station is not part of the line's path
    #[error("station {0} is not on the line")]
    StationNotFound(StationId),

    /// Stored sections do not form a single simple path
    #[error("section topology is corrupt: {0}")]
    TopologyCorrupt(&'static str),

    /// Line metadata failed validation
    #[error("invalid line: {0}")]
    InvalidLine(&'static str),

    /// Station metadata failed validation
    #[error("invalid station: {0}")]
    InvalidStation(&'static str),
}
