//! Subway line server.
//!
//! Keeps each line's sections in a single connected path and exposes
//! operations to add or remove stations while preserving that shape.

pub mod config;
pub mod domain;
pub mod store;
pub mod topology;
pub mod web;
