//! Service layer for the flight board application.
//!
//! This module contains the business logic for:
//! - Table location (`TableLocator`, `MarkerTableLocator`)
//! - Flight record extraction (`FlightExtractor`)

mod extract;
mod locator;

pub use extract::FlightExtractor;
pub use locator::{MarkerTableLocator, TableLocator};
