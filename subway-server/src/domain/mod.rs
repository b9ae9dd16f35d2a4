//! Domain types for subway line topology.
//!
//! This module contains the value types (stations, sections, lines) and the
//! section chain engine that orders a line's sections and plans insertions
//! and removals. Everything here is pure: no storage, no I/O. All types
//! enforce their invariants at construction time.

mod chain;
mod distance;
mod edits;
mod error;
mod ids;
mod line;
mod section;
mod station;

pub use chain::SectionChain;
pub use distance::Distance;
pub use edits::{Insertion, Removal, SectionEdits};
pub use error::TopologyError;
pub use ids::{LineId, StationId};
pub use line::Line;
pub use section::Section;
pub use station::Station;
