//! Section chain: station order and edit planning for one line.
//!
//! Storage holds a line as an unordered set of sections. A [`SectionChain`]
//! is built from such a snapshot and keeps the sections in path order, from
//! the first station to the last. Planning an insertion or a removal is a
//! pure computation over that snapshot; the resulting edits are applied by
//! the caller.

use std::collections::{HashMap, HashSet};

use super::{Insertion, LineId, Removal, Section, Station, StationId, TopologyError};

/// The sections of one line, in path order.
///
/// Invariant: consecutive sections share a station (`sections[i].down ==
/// sections[i + 1].up`) and no station appears twice, so the sections form
/// a single simple path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionChain {
    line_id: LineId,
    sections: Vec<Section>,
}

impl SectionChain {
    /// Order an unordered snapshot of a line's sections.
    ///
    /// The first station is the one up station that is never a down station.
    /// From there each step follows the section leaving the current station,
    /// so the result depends only on the edges, never on input order or ids.
    ///
    /// An empty snapshot gives an empty chain. Anything that is not a single
    /// simple path fails with [`TopologyError::TopologyCorrupt`].
    pub fn from_unordered(
        line_id: LineId,
        sections: impl IntoIterator<Item = Section>,
    ) -> Result<Self, TopologyError> {
        let sections: Vec<Section> = sections.into_iter().collect();
        if sections.is_empty() {
            return Ok(SectionChain {
                line_id,
                sections,
            });
        }

        let mut by_up: HashMap<StationId, Section> = HashMap::with_capacity(sections.len());
        let mut downs: HashSet<StationId> = HashSet::with_capacity(sections.len());
        for section in &sections {
            if section.line_id() != line_id {
                return Err(TopologyError::TopologyCorrupt(
                    "section belongs to another line",
                ));
            }
            if !downs.insert(section.down_station().id()) {
                return Err(TopologyError::TopologyCorrupt(
                    "station has two incoming sections",
                ));
            }
            if by_up
                .insert(section.up_station().id(), section.clone())
                .is_some()
            {
                return Err(TopologyError::TopologyCorrupt(
                    "station has two outgoing sections",
                ));
            }
        }

        let start = sections
            .iter()
            .map(|s| s.up_station().id())
            .find(|up| !downs.contains(up))
            .ok_or(TopologyError::TopologyCorrupt("no start station"))?;

        let mut ordered = Vec::with_capacity(sections.len());
        let mut current = start;
        for _ in 0..sections.len() {
            let next = by_up
                .remove(&current)
                .ok_or(TopologyError::TopologyCorrupt("sections are disconnected"))?;
            current = next.down_station().id();
            ordered.push(next);
        }

        Ok(SectionChain {
            line_id,
            sections: ordered,
        })
    }

    pub fn line_id(&self) -> LineId {
        self.line_id
    }

    /// Sections in path order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Number of sections (one less than the number of stations).
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn first_station(&self) -> Option<&Station> {
        self.sections.first().map(Section::up_station)
    }

    pub fn last_station(&self) -> Option<&Station> {
        self.sections.last().map(Section::down_station)
    }

    /// Stations from first to last: `len() + 1` of them, or none for an
    /// empty chain.
    pub fn stations(&self) -> Vec<Station> {
        let mut stations = Vec::with_capacity(self.sections.len() + 1);
        if let Some(first) = self.first_station() {
            stations.push(first.clone());
        }
        stations.extend(self.sections.iter().map(|s| s.down_station().clone()));
        stations
    }

    /// Station ids from first to last.
    pub fn station_ids(&self) -> Vec<StationId> {
        self.stations().iter().map(Station::id).collect()
    }

    /// Look up a station of this line by id.
    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.first_station()
            .into_iter()
            .chain(self.sections.iter().map(Section::down_station))
            .find(|s| s.id() == id)
    }

    pub fn contains(&self, station: &Station) -> bool {
        self.sections.iter().any(|s| s.touches(station))
    }

    /// Sum of all section distances.
    pub fn total_distance(&self) -> u64 {
        self.sections
            .iter()
            .map(|s| u64::from(s.distance().get()))
            .sum()
    }

    /// Replace a two-section chain by one section spanning its outer stations.
    pub fn collapse_to_single_section(&self) -> Result<Section, TopologyError> {
        let [up, down] = self.sections.as_slice() else {
            return Err(TopologyError::TopologyCorrupt(
                "collapse needs exactly two sections",
            ));
        };
        Section::with_distance(
            self.line_id,
            up.up_station().clone(),
            down.down_station().clone(),
            up.connected_distance(down)?,
        )
    }

    /// Work out how `section` joins this line.
    ///
    /// In order: a section into the first station or out of the last one
    /// extends the line; a section sharing its up (or down) station with an
    /// existing section splits that section; anything else is rejected.
    /// An empty chain accepts any section as its first.
    pub fn plan_insertion(&self, section: Section) -> Result<Insertion, TopologyError> {
        if self.is_empty() {
            return Ok(Insertion::EndExtension(section));
        }

        let up = section.up_station();
        let down = section.down_station();
        match (self.contains(up), self.contains(down)) {
            (true, true) => {
                return Err(TopologyError::DuplicateStation {
                    up: up.id(),
                    down: down.id(),
                });
            }
            (false, false) => {
                return Err(TopologyError::SectionConnection {
                    up: up.id(),
                    down: down.id(),
                });
            }
            _ => {}
        }

        if self.first_station() == Some(down) || self.last_station() == Some(up) {
            return Ok(Insertion::EndExtension(section));
        }

        if let Some(covering) = self.sections.iter().find(|s| s.shares_up_station(up)) {
            let remainder = covering.remainder_distance(&section)?;
            let tail = Section::with_distance(
                self.line_id,
                down.clone(),
                covering.down_station().clone(),
                remainder,
            )?;
            return Ok(Insertion::InteriorSplit {
                covering: covering.clone(),
                parts: [section, tail],
            });
        }

        if let Some(covering) = self.sections.iter().find(|s| s.shares_down_station(down)) {
            let remainder = covering.remainder_distance(&section)?;
            let head = Section::with_distance(
                self.line_id,
                covering.up_station().clone(),
                up.clone(),
                remainder,
            )?;
            return Ok(Insertion::InteriorSplit {
                covering: covering.clone(),
                parts: [head, section],
            });
        }

        // The station on the line is neither an end nor the shared end of
        // any section, which the path invariant rules out.
        Err(TopologyError::SectionConnection {
            up: up.id(),
            down: down.id(),
        })
    }

    /// Work out how `station` leaves this line.
    ///
    /// An end station takes its only section with it. An interior station's
    /// two sections are merged into one spanning both.
    pub fn plan_removal(&self, station: &Station) -> Result<Removal, TopologyError> {
        let Some(idx) = self.sections.iter().position(|s| s.touches(station)) else {
            return Err(TopologyError::StationNotFound(station.id()));
        };

        // `idx` is the first section touching the station: it either starts
        // at the station (first station of the line) or ends at it.
        let first = &self.sections[idx];
        if first.shares_up_station(station) {
            return Ok(Removal::DropSection(first.clone()));
        }
        let Some(next) = self.sections.get(idx + 1) else {
            return Ok(Removal::DropSection(first.clone()));
        };

        let merged = if self.len() == 2 {
            self.collapse_to_single_section()?
        } else {
            Section::with_distance(
                self.line_id,
                first.up_station().clone(),
                next.down_station().clone(),
                first.connected_distance(next)?,
            )?
        };
        Ok(Removal::Merge {
            up: first.clone(),
            down: next.clone(),
            merged,
        })
    }
}
