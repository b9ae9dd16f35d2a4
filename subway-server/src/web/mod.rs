//! Web layer for the subway line server.
//!
//! Provides JSON endpoints for managing stations, lines and the sections
//! that connect them.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
