//! Identifier newtypes for stations and lines.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a station.
///
/// Stations compare and hash by this id alone; the name is descriptive only.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(pub u64);

/// Identity of a line.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(pub u64);

impl LineId {
    /// Placeholder used for sections that are validated before their line
    /// has been allocated an id.
    pub const UNASSIGNED: LineId = LineId(0);
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineId({})", self.0)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_debug() {
        assert_eq!(StationId(7).to_string(), "7");
        assert_eq!(format!("{:?}", StationId(7)), "StationId(7)");
        assert_eq!(LineId(3).to_string(), "3");
        assert_eq!(format!("{:?}", LineId(3)), "LineId(3)");
    }

    #[test]
    fn serializes_as_bare_number() {
        assert_eq!(serde_json::to_string(&StationId(42)).unwrap(), "42");
        let id: LineId = serde_json::from_str("9").unwrap();
        assert_eq!(id, LineId(9));
    }
}
