//! Line topology service.
//!
//! This module ties the pure section chain engine to storage: it loads a
//! line's sections, plans insertions and removals, writes the resulting
//! edits back as one unit and returns the freshly ordered stations.
//!
//! Edits of the same line are serialized with a per-line lock. Operations
//! on different lines run independently.

mod error;
mod locks;
mod service;


pub use error::TopologyServiceError;
pub use locks::LineLocks;
pub use service::{LineTopologyService, LineView};
