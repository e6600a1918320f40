// src/services/extract.rs

//! Flight record extraction.
//!
//! Turns the raw flight-informations page into structured arrival and
//! departure records. Pure function of its input; no I/O, no state.

use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{FlightRecord, FlightSet};
use crate::services::{MarkerTableLocator, TableLocator};

/// Row filter for the arrivals table. The site mixes decorative rows into
/// the arrivals tbody; only rows carrying this exact style are data rows.
/// The departures table has no such marker, so all of its rows are taken
/// and left to the 8-cell filter.
const ARRIVAL_ROW_SELECTOR: &str = r#"tbody tr[style="border:none"]"#;
const DEPARTURE_ROW_SELECTOR: &str = "tbody tr";
const CELL_SELECTOR: &str = "td";

/// Extracts flight records from the airport's flight-informations page.
pub struct FlightExtractor<L = MarkerTableLocator> {
    locator: L,
}

impl FlightExtractor<MarkerTableLocator> {
    /// Create an extractor with the default marker-based table locator.
    pub fn new() -> Self {
        Self {
            locator: MarkerTableLocator::new(),
        }
    }
}

impl Default for FlightExtractor<MarkerTableLocator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: TableLocator> FlightExtractor<L> {
    /// Create an extractor with a custom table location strategy.
    pub fn with_locator(locator: L) -> Self {
        Self { locator }
    }

    /// Extract arrivals and departures from raw markup.
    ///
    /// The first located table is arrivals, the second departures. That
    /// ordering mirrors the source page and is not validated; if the site
    /// ever reorders the tables, the lists swap silently.
    ///
    /// Fails only when fewer than two flight tables are found. Tables with
    /// zero qualifying rows yield empty lists.
    pub fn extract(&self, markup: &str) -> Result<FlightSet> {
        let document = Html::parse_document(markup);
        let tables = self.locator.locate(&document)?;

        if tables.len() < 2 {
            return Err(AppError::extraction(format!(
                "expected 2 flight tables, found {}",
                tables.len()
            )));
        }

        let arrival_rows = parse_selector(ARRIVAL_ROW_SELECTOR)?;
        let departure_rows = parse_selector(DEPARTURE_ROW_SELECTOR)?;
        let cells = parse_selector(CELL_SELECTOR)?;

        let arrivals = collect_records(tables[0], &arrival_rows, &cells);
        let departures = collect_records(tables[1], &departure_rows, &cells);
        log::debug!(
            "Extracted {} arrivals and {} departures",
            arrivals.len(),
            departures.len()
        );

        Ok(FlightSet {
            arrivals,
            departures,
        })
    }
}

/// Walk the selected rows of one table, keeping qualifying rows in order.
fn collect_records(
    table: ElementRef<'_>,
    row_selector: &Selector,
    cell_selector: &Selector,
) -> Vec<FlightRecord> {
    let mut records = Vec::new();
    for row in table.select(row_selector) {
        let cells: Vec<String> = row
            .select(cell_selector)
            .map(|cell| cell.text().collect::<String>().trim().to_string())
            .collect();
        if let Some(record) = FlightRecord::from_cells(cells) {
            records.push(record);
        }
    }
    records
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    const TABLE_OPEN: &str = r#"<table id="mytable" style="white-space:nowrap;width:100%;">"#;

    fn arrival_row(cells: &[&str]) -> String {
        let tds: String = cells.iter().map(|c| format!("<td>{c}</td>")).collect();
        format!(r#"<tr style="border:none">{tds}</tr>"#)
    }

    fn departure_row(cells: &[&str]) -> String {
        let tds: String = cells.iter().map(|c| format!("<td>{c}</td>")).collect();
        format!("<tr>{tds}</tr>")
    }

    fn page(arrival_rows: &[String], departure_rows: &[String]) -> String {
        format!(
            "{TABLE_OPEN}<tbody>{}</tbody></table>{TABLE_OPEN}<tbody>{}</tbody></table>",
            arrival_rows.concat(),
            departure_rows.concat()
        )
    }

    #[test]
    fn test_extracts_single_arrival() {
        let markup = page(
            &[arrival_row(&[
                "Acme Air",
                "AC101",
                "2024-01-01",
                "10:00",
                "Colombo",
                "A320",
                "3",
                "Landed",
            ])],
            &[],
        );

        let set = FlightExtractor::new().extract(&markup).unwrap();
        assert_eq!(set.arrivals.len(), 1);
        assert!(set.departures.is_empty());
        assert_eq!(set.arrivals[0].airline, "Acme Air");
        assert_eq!(set.arrivals[0].status, "Landed");
    }

    #[test]
    fn test_preserves_row_order() {
        let markup = page(
            &[
                arrival_row(&["First Air", "F1", "d", "t", "o", "a", "1", "s"]),
                arrival_row(&["Second Air", "S2", "d", "t", "o", "a", "2", "s"]),
                arrival_row(&["Third Air", "T3", "d", "t", "o", "a", "3", "s"]),
            ],
            &[
                departure_row(&["Out One", "O1", "d", "t", "o", "a", "1", "s"]),
                departure_row(&["Out Two", "O2", "d", "t", "o", "a", "2", "s"]),
            ],
        );

        let set = FlightExtractor::new().extract(&markup).unwrap();
        let airlines: Vec<&str> = set.arrivals.iter().map(|r| r.airline.as_str()).collect();
        assert_eq!(airlines, ["First Air", "Second Air", "Third Air"]);
        let out: Vec<&str> = set.departures.iter().map(|r| r.airline.as_str()).collect();
        assert_eq!(out, ["Out One", "Out Two"]);
    }

    #[test]
    fn test_drops_rows_with_wrong_cell_count() {
        let markup = page(
            &[
                arrival_row(&["Short Air", "S1", "d", "t", "o", "a"]),
                arrival_row(&["Good Air", "G1", "d", "t", "o", "a", "1", "s"]),
                arrival_row(&["Long Air", "L1", "d", "t", "o", "a", "1", "s", "extra"]),
            ],
            &[],
        );

        let set = FlightExtractor::new().extract(&markup).unwrap();
        assert_eq!(set.arrivals.len(), 1);
        assert_eq!(set.arrivals[0].airline, "Good Air");
    }

    #[test]
    fn test_drops_rows_with_empty_first_cell() {
        let markup = page(
            &[],
            &[
                departure_row(&["", "X1", "d", "t", "o", "a", "1", "s"]),
                departure_row(&["   ", "X2", "d", "t", "o", "a", "1", "s"]),
                departure_row(&["Real Air", "R1", "d", "t", "o", "a", "1", "s"]),
            ],
        );

        let set = FlightExtractor::new().extract(&markup).unwrap();
        assert_eq!(set.departures.len(), 1);
        assert_eq!(set.departures[0].airline, "Real Air");
    }

    #[test]
    fn test_arrivals_require_borderless_marker() {
        // Decorative arrival rows (no style marker) are skipped even with
        // 8 cells; departures take every row.
        let markup = page(
            &[
                departure_row(&["Header Air", "H1", "d", "t", "o", "a", "1", "s"]),
                arrival_row(&["Data Air", "D1", "d", "t", "o", "a", "1", "s"]),
            ],
            &[departure_row(&["Plain Air", "P1", "d", "t", "o", "a", "1", "s"])],
        );

        let set = FlightExtractor::new().extract(&markup).unwrap();
        assert_eq!(set.arrivals.len(), 1);
        assert_eq!(set.arrivals[0].airline, "Data Air");
        assert_eq!(set.departures.len(), 1);
    }

    #[test]
    fn test_trims_outer_whitespace_only() {
        let markup = page(
            &[arrival_row(&[
                "  Acme   Air  ",
                "AC 101",
                "d",
                "t",
                "o",
                "a",
                "1",
                "s",
            ])],
            &[],
        );

        let set = FlightExtractor::new().extract(&markup).unwrap();
        assert_eq!(set.arrivals[0].airline, "Acme   Air");
        assert_eq!(set.arrivals[0].flight_number, "AC 101");
    }

    #[test]
    fn test_empty_tables_yield_empty_lists() {
        let markup = page(&[], &[]);
        let set = FlightExtractor::new().extract(&markup).unwrap();
        assert!(set.arrivals.is_empty());
        assert!(set.departures.is_empty());
    }

    #[test]
    fn test_missing_tables_is_an_error() {
        let markup = format!("{TABLE_OPEN}<tbody></tbody></table>");
        let err = FlightExtractor::new().extract(&markup).unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));

        let err = FlightExtractor::new().extract("<p>nothing here</p>").unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let markup = page(
            &[arrival_row(&["A", "1", "d", "t", "o", "a", "1", "s"])],
            &[departure_row(&["B", "2", "d", "t", "o", "a", "2", "s"])],
        );
        let extractor = FlightExtractor::new();
        assert_eq!(
            extractor.extract(&markup).unwrap(),
            extractor.extract(&markup).unwrap()
        );
    }
}
