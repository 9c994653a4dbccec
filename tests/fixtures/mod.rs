//! Test fixtures for route-directions.
//!
//! Provides:
//! - Real Las Vegas landmarks (from OpenStreetMap) to route between
//! - A scripted in-memory transport with per-origin gates
//! - A listener that records every callback

pub mod las_vegas_landmarks;
pub mod scripted;

pub use las_vegas_landmarks::*;
pub use scripted::*;
