//! Section distance type.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::TopologyError;

/// A strictly positive section length.
///
/// Any `Distance` value is at least [`Distance::MIN`], so sums of distances
/// never need re-checking for positivity, only for overflow.
///
/// # Examples
///
/// ```
/// use subway_server::domain::Distance;
///
/// let d = Distance::new(10).unwrap();
/// assert_eq!(d.get(), 10);
///
/// assert!(Distance::new(0).is_err());
/// assert!(Distance::new(-3).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct Distance(u32);

impl Distance {
    /// Smallest legal distance.
    pub const MIN: u32 = 1;

    /// Validate a raw distance.
    pub fn new(value: i64) -> Result<Self, TopologyError> {
        if value < i64::from(Self::MIN) || value > i64::from(u32::MAX) {
            return Err(TopologyError::InvalidDistance(value));
        }
        Ok(Distance(value as u32))
    }

    /// Returns the distance as a plain integer.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Sum of two distances, rejected if it does not fit.
    pub fn checked_add(self, other: Distance) -> Result<Distance, TopologyError> {
        Distance::new(i64::from(self.0) + i64::from(other.0))
    }

    /// `self - other`, rejected unless the result is still a legal distance.
    pub fn checked_sub(self, other: Distance) -> Result<Distance, TopologyError> {
        Distance::new(i64::from(self.0) - i64::from(other.0))
    }
}

impl TryFrom<i64> for Distance {
    type Error = TopologyError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Distance::new(value)
    }
}

impl From<Distance> for u32 {
    fn from(d: Distance) -> u32 {
        d.0
    }
}

impl fmt::Debug for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Distance({})", self.0)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
