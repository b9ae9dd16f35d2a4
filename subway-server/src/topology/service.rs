//! Line topology orchestration.
//!
//! Each mutating operation follows the same shape: take the line's lock,
//! load its sections, plan the change with [`SectionChain`], hand the
//! resulting [`SectionEdits`] to the store as one unit, then re-derive the
//! station order from what is now stored.

use tracing::{debug, error, info, warn};

use crate::domain::{
    Line, LineId, Section, SectionChain, SectionEdits, Station, StationId, TopologyError,
};
use crate::store::LineStore;

use super::error::TopologyServiceError;
use super::locks::LineLocks;

/// A line together with its stations in path order.
#[derive(Debug, Clone)]
pub struct LineView {
    pub line: Line,
    pub stations: Vec<Station>,
}

/// Runs topology operations against a [`LineStore`].
pub struct LineTopologyService<S> {
    store: S,
    locks: LineLocks,
}

impl<S: LineStore> LineTopologyService<S> {
    /// Create a new service over the given store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: LineLocks::new(),
        }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stations of a line from first to last.
    ///
    /// Empty for a line whose last section has been removed.
    pub async fn ordered_stations(
        &self,
        line_id: LineId,
    ) -> Result<Vec<Station>, TopologyServiceError> {
        self.require_line(line_id).await?;
        Ok(self.load_chain(line_id).await?.stations())
    }

    /// Attach a section `up -> down` to a line.
    ///
    /// One of the two stations must already be on the line. The section
    /// either extends the line at one end or splits the existing section it
    /// falls inside.
    pub async fn add_station(
        &self,
        line_id: LineId,
        up_id: StationId,
        down_id: StationId,
        distance: i64,
    ) -> Result<Vec<Station>, TopologyServiceError> {
        let _guard = self.locks.lock(line_id).await;
        self.require_line(line_id).await?;
        let up = self.station(up_id).await?;
        let down = self.station(down_id).await?;

        let section =
            Section::new(line_id, up, down, distance).map_err(|e| rejected(line_id, e))?;
        let chain = self.load_chain(line_id).await?;
        let insertion = chain
            .plan_insertion(section)
            .map_err(|e| rejected(line_id, e))?;
        debug!(line = %line_id, ?insertion, "planned insertion");

        self.apply(line_id, insertion.into()).await?;
        let stations = self.load_chain(line_id).await?.stations();
        info!(
            line = %line_id,
            up = %up_id,
            down = %down_id,
            stations = stations.len(),
            "section added"
        );
        Ok(stations)
    }

    /// Take a station off a line.
    ///
    /// An end station drops its only section; an interior station's two
    /// sections are merged. Removing a station from a one-section line
    /// leaves the line with no sections.
    pub async fn remove_station(
        &self,
        line_id: LineId,
        station_id: StationId,
    ) -> Result<Vec<Station>, TopologyServiceError> {
        let _guard = self.locks.lock(line_id).await;
        self.require_line(line_id).await?;
        if !self.store.station_exists(station_id).await? {
            return Err(TopologyServiceError::UnknownStation(station_id));
        }

        let chain = self.load_chain(line_id).await?;
        let station = chain
            .station(station_id)
            .ok_or_else(|| rejected(line_id, TopologyError::StationNotFound(station_id)))?;
        let removal = chain
            .plan_removal(station)
            .map_err(|e| rejected(line_id, e))?;
        debug!(line = %line_id, ?removal, "planned removal");

        self.apply(line_id, removal.into()).await?;
        let stations = self.load_chain(line_id).await?.stations();
        if stations.is_empty() {
            info!(line = %line_id, station = %station_id, "last section removed, line is empty");
        } else {
            info!(
                line = %line_id,
                station = %station_id,
                stations = stations.len(),
                "station removed"
            );
        }
        Ok(stations)
    }

    /// Create a line with its first section `up -> down`.
    pub async fn create_line(
        &self,
        name: &str,
        color: &str,
        up_id: StationId,
        down_id: StationId,
        distance: i64,
    ) -> Result<LineView, TopologyServiceError> {
        Line::validate(name, color)?;
        let up = self.station(up_id).await?;
        let down = self.station(down_id).await?;
        let first = Section::new(LineId::UNASSIGNED, up, down, distance)?;

        let line = self.store.create_line(name, color, first).await?;
        info!(line = %line.id(), name = line.name(), "line created");
        self.line_view(line.id()).await
    }

    /// A line's metadata, without its stations.
    pub async fn line(&self, line_id: LineId) -> Result<Line, TopologyServiceError> {
        self.store
            .find_line(line_id)
            .await?
            .ok_or(TopologyServiceError::LineNotFound(line_id))
    }

    /// A line with its ordered stations.
    pub async fn line_view(&self, line_id: LineId) -> Result<LineView, TopologyServiceError> {
        let line = self.line(line_id).await?;
        let stations = self.load_chain(line_id).await?.stations();
        Ok(LineView { line, stations })
    }

    /// All lines with their ordered stations, by line id.
    pub async fn line_views(&self) -> Result<Vec<LineView>, TopologyServiceError> {
        let lines = self.store.lines().await?;
        let mut views = Vec::with_capacity(lines.len());
        for line in lines {
            let stations = self.load_chain(line.id()).await?.stations();
            views.push(LineView { line, stations });
        }
        Ok(views)
    }

    /// Rename or recolor a line. Its sections are untouched.
    pub async fn update_line(
        &self,
        line_id: LineId,
        name: &str,
        color: &str,
    ) -> Result<Line, TopologyServiceError> {
        Line::validate(name, color)?;
        self.require_line(line_id).await?;
        let line = self.store.update_line(line_id, name, color).await?;
        info!(line = %line_id, name, color, "line updated");
        Ok(line)
    }

    /// Delete a line and all of its sections.
    pub async fn delete_line(&self, line_id: LineId) -> Result<(), TopologyServiceError> {
        {
            let _guard = self.locks.lock(line_id).await;
            self.require_line(line_id).await?;
            self.store.delete_line(line_id).await?;
        }
        self.locks.forget(line_id).await;
        info!(line = %line_id, "line deleted");
        Ok(())
    }

    pub async fn create_station(&self, name: &str) -> Result<Station, TopologyServiceError> {
        let station = self.store.create_station(name).await?;
        info!(station = %station.id(), name = station.name(), "station created");
        Ok(station)
    }

    pub async fn stations(&self) -> Result<Vec<Station>, TopologyServiceError> {
        Ok(self.store.stations().await?)
    }

    /// Delete a station that is not on any line.
    pub async fn delete_station(&self, id: StationId) -> Result<(), TopologyServiceError> {
        if !self.store.station_exists(id).await? {
            return Err(TopologyServiceError::UnknownStation(id));
        }
        self.store.delete_station(id).await?;
        info!(station = %id, "station deleted");
        Ok(())
    }

    async fn require_line(&self, line_id: LineId) -> Result<(), TopologyServiceError> {
        if self.store.line_exists(line_id).await? {
            Ok(())
        } else {
            Err(TopologyServiceError::LineNotFound(line_id))
        }
    }

    async fn station(&self, id: StationId) -> Result<Station, TopologyServiceError> {
        self.store
            .find_station(id)
            .await?
            .ok_or(TopologyServiceError::UnknownStation(id))
    }

    /// Load and order a line's sections.
    async fn load_chain(&self, line_id: LineId) -> Result<SectionChain, TopologyServiceError> {
        let sections = self.store.sections_for_line(line_id).await?;
        SectionChain::from_unordered(line_id, sections).map_err(|e| {
            error!(line = %line_id, error = %e, "stored sections do not form a single path");
            e.into()
        })
    }

    async fn apply(&self, line_id: LineId, edits: SectionEdits) -> Result<(), TopologyServiceError> {
        debug!(
            line = %line_id,
            deletes = edits.deletes.len(),
            inserts = edits.inserts.len(),
            "applying section edits"
        );
        self.store.apply_edits(line_id, &edits).await?;
        Ok(())
    }
}

/// Log a rejected request and wrap its error.
fn rejected(line_id: LineId, err: TopologyError) -> TopologyServiceError {
    warn!(line = %line_id, error = %err, "topology change rejected");
    err.into()
}
