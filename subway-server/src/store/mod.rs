//! Storage of stations, lines and their sections.
//!
//! The topology engine only reads a line's raw sections and writes back
//! delete/insert sets. [`LineStore`] is that boundary, plus the catalog
//! operations (create, list, rename, delete) that the HTTP layer needs.
//!
//! Implementations must apply [`SectionEdits`] all-or-nothing. Serializing
//! concurrent edits of the same line is done by the caller holding a line
//! lock (see [`crate::topology`]); a store additionally refuses edits whose
//! deletes no longer match what it holds.

mod error;
mod memory;
mod snapshot;

use std::future::Future;

use crate::domain::{Line, LineId, Section, SectionEdits, Station, StationId};

pub use error::StoreError;
pub use memory::InMemoryLineStore;
pub use snapshot::{Snapshot, SnapshotFile};

/// Persistence for lines, stations and sections.
pub trait LineStore: Send + Sync {
    /// All current sections of a line, in no particular order.
    fn sections_for_line(
        &self,
        line_id: LineId,
    ) -> impl Future<Output = Result<Vec<Section>, StoreError>> + Send;

    /// Atomically remove `edits.deletes` and add `edits.inserts`.
    ///
    /// Fails with [`StoreError::StaleSnapshot`] and changes nothing if any
    /// delete does not exactly match a stored section.
    fn apply_edits(
        &self,
        line_id: LineId,
        edits: &SectionEdits,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn line_exists(&self, line_id: LineId) -> impl Future<Output = Result<bool, StoreError>> + Send;

    fn station_exists(&self, id: StationId)
    -> impl Future<Output = Result<bool, StoreError>> + Send;

    fn find_station(
        &self,
        id: StationId,
    ) -> impl Future<Output = Result<Option<Station>, StoreError>> + Send;

    /// All stations, ordered by id.
    fn stations(&self) -> impl Future<Output = Result<Vec<Station>, StoreError>> + Send;

    /// Create a station with a fresh id. Names must be unique.
    fn create_station(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Station, StoreError>> + Send;

    /// Delete a station that no line uses.
    fn delete_station(&self, id: StationId)
    -> impl Future<Output = Result<(), StoreError>> + Send;

    fn find_line(
        &self,
        line_id: LineId,
    ) -> impl Future<Output = Result<Option<Line>, StoreError>> + Send;

    /// All lines, ordered by id.
    fn lines(&self) -> impl Future<Output = Result<Vec<Line>, StoreError>> + Send;

    /// Create a line together with its first section.
    ///
    /// `first_section` is re-assigned to the new line's id. Names and colors
    /// must be unique across lines.
    fn create_line(
        &self,
        name: &str,
        color: &str,
        first_section: Section,
    ) -> impl Future<Output = Result<Line, StoreError>> + Send;

    /// Change a line's name and color, keeping them unique.
    fn update_line(
        &self,
        line_id: LineId,
        name: &str,
        color: &str,
    ) -> impl Future<Output = Result<Line, StoreError>> + Send;

    /// Delete a line and all of its sections.
    fn delete_line(&self, line_id: LineId) -> impl Future<Output = Result<(), StoreError>> + Send;
}
