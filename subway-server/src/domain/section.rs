//! Section value type: one directed, weighted edge of a line.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Distance, LineId, Station, TopologyError};

/// A directed edge `up_station -> down_station` on one line.
///
/// Sections are immutable. Splitting or merging produces new sections that
/// replace the old ones in storage. Two sections are equal when they belong
/// to the same line, join the same stations in the same direction and have
/// the same distance.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawSection")]
pub struct Section {
    line_id: LineId,
    up_station: Station,
    down_station: Station,
    distance: Distance,
}

/// Wire form of [`Section`]; the stations and distance are already checked
/// by their own deserializers, the self-loop rule is checked on conversion.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSection {
    line_id: LineId,
    up_station: Station,
    down_station: Station,
    distance: Distance,
}

impl TryFrom<RawSection> for Section {
    type Error = TopologyError;

    fn try_from(raw: RawSection) -> Result<Self, Self::Error> {
        Section::with_distance(raw.line_id, raw.up_station, raw.down_station, raw.distance)
    }
}

impl Section {
    /// Create a section from a raw distance.
    ///
    /// Fails with [`TopologyError::SelfLoop`] if both ends are the same
    /// station and [`TopologyError::InvalidDistance`] if `distance < 1`.
    pub fn new(
        line_id: LineId,
        up_station: Station,
        down_station: Station,
        distance: i64,
    ) -> Result<Self, TopologyError> {
        Self::with_distance(line_id, up_station, down_station, Distance::new(distance)?)
    }

    /// Create a section from an already validated distance.
    pub fn with_distance(
        line_id: LineId,
        up_station: Station,
        down_station: Station,
        distance: Distance,
    ) -> Result<Self, TopologyError> {
        if up_station == down_station {
            return Err(TopologyError::SelfLoop(up_station.id()));
        }
        Ok(Section {
            line_id,
            up_station,
            down_station,
            distance,
        })
    }

    /// The same section, assigned to another line.
    pub fn on_line(&self, line_id: LineId) -> Section {
        Section {
            line_id,
            ..self.clone()
        }
    }

    pub fn line_id(&self) -> LineId {
        self.line_id
    }

    pub fn up_station(&self) -> &Station {
        &self.up_station
    }

    pub fn down_station(&self) -> &Station {
        &self.down_station
    }

    pub fn distance(&self) -> Distance {
        self.distance
    }

    /// Distance of this section followed by `adjacent`, used when merging.
    pub fn connected_distance(&self, adjacent: &Section) -> Result<Distance, TopologyError> {
        self.distance.checked_add(adjacent.distance)
    }

    /// What is left of this section once `inner` is carved out of it.
    ///
    /// Fails with [`TopologyError::InvalidDistance`] unless `inner` is
    /// strictly shorter than `self`.
    pub fn remainder_distance(&self, inner: &Section) -> Result<Distance, TopologyError> {
        self.distance.checked_sub(inner.distance)
    }

    pub fn shares_up_station(&self, station: &Station) -> bool {
        &self.up_station == station
    }

    pub fn shares_down_station(&self, station: &Station) -> bool {
        &self.down_station == station
    }

    /// True if `station` is either end of this section.
    pub fn touches(&self, station: &Station) -> bool {
        self.shares_up_station(station) || self.shares_down_station(station)
    }
}

impl fmt::Debug for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Section(line {}: {} -> {}, {})",
            self.line_id,
            self.up_station.id(),
            self.down_station.id(),
            self.distance
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StationId;

    fn station(id: u64) -> Station {
        Station::new(StationId(id), format!("S{id}")).unwrap()
    }

    fn section(up: u64, down: u64, distance: i64) -> Section {
        Section::new(LineId(1), station(up), station(down), distance).unwrap()
    }

    #[test]
    fn deserializing_checks_the_section() {
        let json = |up: u64, down: u64, distance: i64| {
            format!(
                r#"{{"lineId":1,"upStation":{{"id":{up},"name":"S{up}"}},"downStation":{{"id":{down},"name":"S{down}"}},"distance":{distance}}}"#
            )
        };

        let parsed: Section = serde_json::from_str(&json(1, 2, 7)).unwrap();
        assert_eq!(parsed, section(1, 2, 7));

        let err = serde_json::from_str::<Section>(&json(1, 1, 7)).unwrap_err();
        assert!(err.to_string().contains("cannot start and end"));
        assert!(serde_json::from_str::<Section>(&json(1, 2, 0)).is_err());
    }

    #[test]
    fn rejects_self_loop() {
        let err = Section::new(LineId(1), station(1), station(1), 5).unwrap_err();
        assert_eq!(err, TopologyError::SelfLoop(StationId(1)));
    }

    #[test]
    fn rejects_non_positive_distance() {
        let err = Section::new(LineId(1), station(1), station(2), 0).unwrap_err();
        assert_eq!(err, TopologyError::InvalidDistance(0));
        assert!(Section::new(LineId(1), station(1), station(2), -1).is_err());
    }

    #[test]
    fn connected_distance_sums() {
        let a = section(1, 2, 4);
        let b = section(2, 3, 6);
        assert_eq!(a.connected_distance(&b).unwrap().get(), 10);
    }

    #[test]
    fn remainder_distance_requires_strictly_shorter_inner() {
        let outer = section(1, 3, 10);
        assert_eq!(
            outer.remainder_distance(&section(1, 2, 4)).unwrap().get(),
            6
        );
        assert_eq!(
            outer.remainder_distance(&section(1, 2, 10)),
            Err(TopologyError::InvalidDistance(0))
        );
        assert_eq!(
            outer.remainder_distance(&section(1, 2, 11)),
            Err(TopologyError::InvalidDistance(-1))
        );
    }

    #[test]
    fn membership_predicates() {
        let s = section(1, 2, 3);
        assert!(s.shares_up_station(&station(1)));
        assert!(!s.shares_up_station(&station(2)));
        assert!(s.shares_down_station(&station(2)));
        assert!(!s.shares_down_station(&station(1)));
        assert!(s.touches(&station(1)));
        assert!(s.touches(&station(2)));
        assert!(!s.touches(&station(3)));
    }

    #[test]
    fn equality_includes_distance_and_line() {
        assert_eq!(section(1, 2, 3), section(1, 2, 3));
        assert_ne!(section(1, 2, 3), section(1, 2, 4));
        assert_ne!(section(1, 2, 3), section(2, 1, 3));
        assert_ne!(section(1, 2, 3), section(1, 2, 3).on_line(LineId(2)));
    }

    #[test]
    fn serde_roundtrip_keeps_wire_names() {
        let s = section(1, 2, 3);
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["lineId"], 1);
        assert_eq!(json["upStation"]["id"], 1);
        assert_eq!(json["downStation"]["name"], "S2");
        assert_eq!(json["distance"], 3);
        let back: Section = serde_json::from_value(json).unwrap();
        assert_eq!(back, s);
    }
}
