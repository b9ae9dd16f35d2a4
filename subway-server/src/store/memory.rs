//! In-memory line store with optional JSON snapshot persistence.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::domain::{
    Line, LineId, Section, SectionChain, SectionEdits, Station, StationId, TopologyError,
};

use super::error::StoreError;
use super::snapshot::{Snapshot, SnapshotFile};
use super::LineStore;

/// Everything the store holds.
#[derive(Debug, Clone)]
struct State {
    next_station_id: u64,
    next_line_id: u64,
    stations: BTreeMap<StationId, Station>,
    lines: BTreeMap<LineId, Line>,
    sections: HashMap<LineId, Vec<Section>>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            next_station_id: 1,
            next_line_id: 1,
            stations: BTreeMap::new(),
            lines: BTreeMap::new(),
            sections: HashMap::new(),
        }
    }
}

impl State {
    /// Rebuild state from a snapshot, refusing anything a running store
    /// could never have produced.
    fn from_snapshot(snapshot: Snapshot) -> Result<Self, StoreError> {
        let stations: BTreeMap<_, _> = snapshot
            .stations
            .into_iter()
            .map(|s| (s.id(), s))
            .collect();
        let lines: BTreeMap<_, _> = snapshot.lines.into_iter().map(|l| (l.id(), l)).collect();

        let mut sections: HashMap<LineId, Vec<Section>> = HashMap::new();
        for section in snapshot.sections {
            if !lines.contains_key(&section.line_id()) {
                return Err(invalid_snapshot(format!(
                    "section {:?} belongs to unknown line {}",
                    section,
                    section.line_id()
                )));
            }
            for station in [section.up_station(), section.down_station()] {
                if !stations.contains_key(&station.id()) {
                    return Err(invalid_snapshot(format!(
                        "section {:?} uses unknown station {}",
                        section,
                        station.id()
                    )));
                }
            }
            sections.entry(section.line_id()).or_default().push(section);
        }

        for (line_id, line_sections) in &sections {
            SectionChain::from_unordered(*line_id, line_sections.iter().cloned()).map_err(|e| {
                invalid_snapshot(format!("sections of line {}: {}", line_id, e))
            })?;
        }

        // Never hand out an id that is already taken, whatever the counters say.
        let max_station = stations.keys().next_back().map_or(0, |id| id.0);
        let max_line = lines.keys().next_back().map_or(0, |id| id.0);

        Ok(Self {
            next_station_id: snapshot.next_station_id.max(max_station + 1),
            next_line_id: snapshot.next_line_id.max(max_line + 1),
            stations,
            lines,
            sections,
        })
    }

    fn to_snapshot(&self) -> Snapshot {
        let mut line_ids: Vec<_> = self.sections.keys().copied().collect();
        line_ids.sort();
        Snapshot {
            next_station_id: self.next_station_id,
            next_line_id: self.next_line_id,
            stations: self.stations.values().cloned().collect(),
            lines: self.lines.values().cloned().collect(),
            sections: line_ids
                .iter()
                .flat_map(|id| self.sections[id].iter().cloned())
                .collect(),
        }
    }

    fn require_line(&self, line_id: LineId) -> Result<(), StoreError> {
        if self.lines.contains_key(&line_id) {
            Ok(())
        } else {
            Err(StoreError::LineNotFound(line_id))
        }
    }

    fn require_station(&self, station: &Station) -> Result<(), StoreError> {
        if self.stations.contains_key(&station.id()) {
            Ok(())
        } else {
            Err(StoreError::StationNotFound(station.id()))
        }
    }

    /// Name and color must not be used by any line other than `except`.
    fn check_unique_line(
        &self,
        name: &str,
        color: &str,
        except: Option<LineId>,
    ) -> Result<(), StoreError> {
        for line in self.lines.values() {
            if Some(line.id()) == except {
                continue;
            }
            if line.name() == name {
                return Err(StoreError::DuplicateLineName(name.to_string()));
            }
            if line.color() == color {
                return Err(StoreError::DuplicateLineColor(color.to_string()));
            }
        }
        Ok(())
    }
}

fn invalid_snapshot(reason: String) -> StoreError {
    StoreError::Snapshot {
        message: format!("invalid snapshot: {}", reason),
    }
}

/// Line store keeping all data in memory.
///
/// Every mutation runs against a copy of the state under the write lock.
/// The copy replaces the live state only once the mutation has fully
/// succeeded and, if a snapshot file is configured, been written to disk.
/// A failed call therefore leaves nothing behind.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLineStore {
    state: Arc<RwLock<State>>,
    snapshot: Option<SnapshotFile>,
}

impl InMemoryLineStore {
    /// Create an empty store without persistence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store backed by a snapshot file.
    ///
    /// Loads the file if it exists; a missing file starts an empty store.
    pub fn with_snapshot(file: SnapshotFile) -> Result<Self, StoreError> {
        let state = match file.load()? {
            Some(snapshot) => {
                info!(
                    path = %file.path().display(),
                    stations = snapshot.stations.len(),
                    lines = snapshot.lines.len(),
                    "loaded snapshot"
                );
                State::from_snapshot(snapshot)?
            }
            None => {
                info!(path = %file.path().display(), "no snapshot yet, starting empty");
                State::default()
            }
        };

        Ok(Self {
            state: Arc::new(RwLock::new(state)),
            snapshot: Some(file),
        })
    }

    /// Run `f` against a copy of the state and commit it if `f` succeeds.
    async fn mutate<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut State) -> Result<T, StoreError> + Send,
        T: Send,
    {
        let mut guard = self.state.write().await;
        let mut next = guard.clone();
        let out = f(&mut next)?;

        if let Some(file) = &self.snapshot {
            file.save(&next.to_snapshot())?;
        }

        *guard = next;
        Ok(out)
    }
}

impl LineStore for InMemoryLineStore {
    async fn sections_for_line(&self, line_id: LineId) -> Result<Vec<Section>, StoreError> {
        let state = self.state.read().await;
        state.require_line(line_id)?;
        Ok(state.sections.get(&line_id).cloned().unwrap_or_default())
    }

    async fn apply_edits(&self, line_id: LineId, edits: &SectionEdits) -> Result<(), StoreError> {
        self.mutate(|state| {
            state.require_line(line_id)?;
            for insert in &edits.inserts {
                if insert.line_id() != line_id {
                    return Err(StoreError::Domain(TopologyError::TopologyCorrupt(
                        "section belongs to another line",
                    )));
                }
                state.require_station(insert.up_station())?;
                state.require_station(insert.down_station())?;
            }

            let current = state.sections.entry(line_id).or_default();
            let next = edits
                .apply_to(current.as_slice())
                .ok_or(StoreError::StaleSnapshot(line_id))?;
            *current = next;
            Ok(())
        })
        .await
    }

    async fn line_exists(&self, line_id: LineId) -> Result<bool, StoreError> {
        Ok(self.state.read().await.lines.contains_key(&line_id))
    }

    async fn station_exists(&self, id: StationId) -> Result<bool, StoreError> {
        Ok(self.state.read().await.stations.contains_key(&id))
    }

    async fn find_station(&self, id: StationId) -> Result<Option<Station>, StoreError> {
        Ok(self.state.read().await.stations.get(&id).cloned())
    }

    async fn stations(&self) -> Result<Vec<Station>, StoreError> {
        Ok(self.state.read().await.stations.values().cloned().collect())
    }

    async fn create_station(&self, name: &str) -> Result<Station, StoreError> {
        self.mutate(|state| {
            if state.stations.values().any(|s| s.name() == name) {
                return Err(StoreError::DuplicateStationName(name.to_string()));
            }
            let station = Station::new(StationId(state.next_station_id), name)?;
            state.next_station_id += 1;
            state.stations.insert(station.id(), station.clone());
            Ok(station)
        })
        .await
    }

    async fn delete_station(&self, id: StationId) -> Result<(), StoreError> {
        self.mutate(|state| {
            let station = state
                .stations
                .get(&id)
                .ok_or(StoreError::StationNotFound(id))?;
            let in_use = state
                .sections
                .values()
                .flatten()
                .any(|section| section.touches(station));
            if in_use {
                return Err(StoreError::StationInUse(id));
            }
            state.stations.remove(&id);
            Ok(())
        })
        .await
    }

    async fn find_line(&self, line_id: LineId) -> Result<Option<Line>, StoreError> {
        Ok(self.state.read().await.lines.get(&line_id).cloned())
    }

    async fn lines(&self) -> Result<Vec<Line>, StoreError> {
        Ok(self.state.read().await.lines.values().cloned().collect())
    }

    async fn create_line(
        &self,
        name: &str,
        color: &str,
        first_section: Section,
    ) -> Result<Line, StoreError> {
        self.mutate(|state| {
            state.check_unique_line(name, color, None)?;
            state.require_station(first_section.up_station())?;
            state.require_station(first_section.down_station())?;

            let line = Line::new(LineId(state.next_line_id), name, color)?;
            state.next_line_id += 1;
            state
                .sections
                .insert(line.id(), vec![first_section.on_line(line.id())]);
            state.lines.insert(line.id(), line.clone());
            Ok(line)
        })
        .await
    }

    async fn update_line(&self, line_id: LineId, name: &str, color: &str) -> Result<Line, StoreError> {
        self.mutate(|state| {
            state.require_line(line_id)?;
            state.check_unique_line(name, color, Some(line_id))?;
            let line = Line::new(line_id, name, color)?;
            state.lines.insert(line_id, line.clone());
            Ok(line)
        })
        .await
    }

    async fn delete_line(&self, line_id: LineId) -> Result<(), StoreError> {
        self.mutate(|state| {
            state
                .lines
                .remove(&line_id)
                .ok_or(StoreError::LineNotFound(line_id))?;
            state.sections.remove(&line_id);
            Ok(())
        })
        .await
    }
}
