// src/services/locator.rs

//! Table location strategies.
//!
//! The flight board page carries no semantic markup; the arrival and
//! departure tables are only recognizable by fixed structural markers.
//! That matching rule is fragile, so it lives behind a trait and can be
//! swapped without touching row/cell extraction.

use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};

/// Strategy for finding candidate flight tables in a parsed document.
///
/// Implementations return table handles in document order; the extractor
/// assigns meaning to their positions.
pub trait TableLocator: Send + Sync {
    /// Return all candidate flight tables, in document order.
    fn locate<'a>(&self, document: &'a Html) -> Result<Vec<ElementRef<'a>>>;
}

/// Locates tables by the markers the source site actually uses: the element
/// id `mytable` combined with an exact inline style signature.
///
/// Both tables on the page share the same id, so the id alone is not a
/// unique handle; the style string narrows the match to the flight tables.
pub struct MarkerTableLocator {
    selector: String,
}

impl MarkerTableLocator {
    pub fn new() -> Self {
        Self {
            selector: r#"table#mytable[style="white-space:nowrap;width:100%;"]"#.to_string(),
        }
    }

    /// Use a custom CSS selector as the table marker.
    pub fn with_selector(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
        }
    }
}

impl Default for MarkerTableLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl TableLocator for MarkerTableLocator {
    fn locate<'a>(&self, document: &'a Html) -> Result<Vec<ElementRef<'a>>> {
        let selector = Selector::parse(&self.selector)
            .map_err(|e| AppError::selector(&self.selector, format!("{e:?}")))?;
        Ok(document.select(&selector).collect())
    }
}
