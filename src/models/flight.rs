//! Flight record data structures.

use serde::{Deserialize, Serialize};

/// One scheduled arrival or departure, as shown on the airport board.
///
/// All fields are opaque text with outer whitespace trimmed. Date and time
/// keep whatever formatting the source site uses; it is not contractually
/// stable enough to parse.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlightRecord {
    /// Operating airline name
    pub airline: String,

    /// Flight number as displayed
    pub flight_number: String,

    /// Scheduled date (opaque text)
    pub date: String,

    /// Scheduled time (opaque text)
    pub time: String,

    /// Origin city for arrivals, destination city for departures
    pub origin_or_destination: String,

    /// Aircraft type
    pub aircraft: String,

    /// Baggage belt / gate number
    pub belt: String,

    /// Flight status (e.g. "Landed", "Delayed")
    pub status: String,
}

impl FlightRecord {
    /// Build a record from positional cell values.
    ///
    /// Returns `None` unless there are exactly 8 cells and the first
    /// (airline) is non-empty. Rows failing either check are decorative or
    /// placeholder rows and are dropped, not errors.
    pub fn from_cells(cells: Vec<String>) -> Option<Self> {
        if cells.len() != 8 || cells[0].is_empty() {
            return None;
        }
        let mut cells = cells.into_iter();
        Some(Self {
            airline: cells.next()?,
            flight_number: cells.next()?,
            date: cells.next()?,
            time: cells.next()?,
            origin_or_destination: cells.next()?,
            aircraft: cells.next()?,
            belt: cells.next()?,
            status: cells.next()?,
        })
    }
}

/// The extracted flight board: arrivals and departures, in source row order.
///
/// Row order on the source site reflects chronological schedule order, so
/// both lists preserve it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlightSet {
    pub arrivals: Vec<FlightRecord>,
    pub departures: Vec<FlightRecord>,
}
