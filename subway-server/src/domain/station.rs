//! Station value type.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::{StationId, TopologyError};

/// A named station.
///
/// Equality and hashing use the id only. Name uniqueness is a storage
/// concern, not something this type can check.
///
/// # Examples
///
/// ```
/// use subway_server::domain::{Station, StationId};
///
/// let a = Station::new(StationId(1), "Gangnam").unwrap();
/// let renamed = Station::new(StationId(1), "Gangnam Stn").unwrap();
/// assert_eq!(a, renamed);
///
/// assert!(Station::new(StationId(2), "  ").is_err());
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "RawStation")]
pub struct Station {
    id: StationId,
    name: String,
}

/// Unchecked wire form of [`Station`].
#[derive(Deserialize)]
struct RawStation {
    id: StationId,
    name: String,
}

impl TryFrom<RawStation> for Station {
    type Error = TopologyError;

    fn try_from(raw: RawStation) -> Result<Self, Self::Error> {
        Station::new(raw.id, raw.name)
    }
}

impl Station {
    /// Create a station, rejecting blank names.
    pub fn new(id: StationId, name: impl Into<String>) -> Result<Self, TopologyError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TopologyError::InvalidStation("name must not be blank"));
        }
        Ok(Station { id, name })
    }

    pub fn id(&self) -> StationId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Station {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Station {}

impl Hash for Station {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Station({} {:?})", self.id, self.name)
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
