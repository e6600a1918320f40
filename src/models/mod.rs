// src/models/mod.rs

//! Domain models for the flight board application.

mod config;
mod flight;

// Re-export all public types
pub use config::{CacheConfig, Config, SourceConfig};
pub use flight::{FlightRecord, FlightSet};
