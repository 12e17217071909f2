//! Row and column conventions of survey worksheets
//!
//! Layouts are plain JSON configuration files. The defaults describe the
//! monthly Consensus Economics country sheets.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::Range;
use std::path::Path;

/// A window of rows; `end` is exclusive and `None` means "to the last row"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRange {
    pub start: usize,
    #[serde(default)]
    pub end: Option<usize>,
}

impl RowRange {
    /// A bounded window `start..end`
    pub const fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    /// An open window `start..`
    pub const fn open(start: usize) -> Self {
        Self { start, end: None }
    }

    /// Concrete row indices for a grid of `height` rows
    pub fn clamp(&self, height: usize) -> Range<usize> {
        let end = self.end.map_or(height, |e| e.min(height));
        self.start.min(end)..end
    }
}

/// Layout of a country worksheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetLayout {
    /// Rows joined into one column label
    pub header_rows: RowRange,
    /// Row holding the unit text of each indicator ("real, % change")
    pub unit_row: usize,
    /// Rows holding summary statistics (mean, high, low, ...)
    pub summary_rows: RowRange,
    /// Rows holding individual forecasters' values
    pub respondent_rows: RowRange,
    /// Column holding row identifiers
    pub index_column: usize,
    /// First column that may carry indicator values
    pub first_data_column: usize,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            header_rows: RowRange::new(1, 4),
            unit_row: 4,
            summary_rows: RowRange::new(7, 13),
            respondent_rows: RowRange::open(25),
            index_column: 0,
            first_data_column: 1,
        }
    }
}

impl SheetLayout {
    /// Check that the layout can be applied to any grid
    pub fn validate(&self) -> Result<()> {
        match self.header_rows.end {
            Some(end) if end > self.header_rows.start => {}
            _ => {
                return Err(Error::InvalidLayout(
                    "header_rows must be a non-empty bounded window".to_string(),
                ))
            }
        }

        if self.first_data_column <= self.index_column {
            return Err(Error::InvalidLayout(format!(
                "first_data_column ({}) must lie right of index_column ({})",
                self.first_data_column, self.index_column
            )));
        }

        Ok(())
    }

    /// Minimum number of rows a grid needs for the header window
    pub fn required_rows(&self) -> usize {
        self.header_rows.end.unwrap_or(self.header_rows.start + 1)
    }

    /// Load a layout from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::FileRead {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        let layout: Self = serde_json::from_str(&content)?;
        layout.validate()?;
        Ok(layout)
    }

    /// Save the layout to JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
