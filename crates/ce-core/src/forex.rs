//! Exchange-rate forecasts from the `Forex` sheet
//!
//! The sheet holds two sections, rates quoted against USD and against EUR.
//! Each row names a currency, its current rate and forecasts at fixed
//! horizons.

use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::layout::RowRange;
use crate::period::Period;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the exchange-rate sheet in each monthly workbook
pub const FOREX_SHEET: &str = "Forex";

const CURRENCY_CODES: &[(&str, &str)] = &[
    ("Canadian Dollar", "CAD"),
    ("Egyptian Pound", "EGP"),
    ("European Euro", "EUR"),
    ("Israeli Shekel", "ILS"),
    ("Japanese Yen", "JPY"),
    ("Nigerian Naira", "NGN"),
    ("Saudi Arabian Riyal", "SAR"),
    ("South African Rand", "ZAR"),
    ("United Kingdom Pound", "GBP"),
    ("Danish Krone", "DKK"),
    ("Norwegian Krone", "NOK"),
    ("Swedish Krona", "SEK"),
    ("Swiss Franc", "CHF"),
];

/// ISO code for a currency name as printed in the sheet
pub fn currency_code(name: &str) -> Option<&'static str> {
    let name = name.trim();
    CURRENCY_CODES
        .iter()
        .find(|(full, _)| *full == name)
        .map(|(_, code)| *code)
}

/// A block of rows quoted against one reference currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForexSection {
    pub reference: String,
    pub rows: RowRange,
}

/// A forecast column and the horizon it covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Horizon {
    pub column: usize,
    pub months: u32,
}

/// Layout of the `Forex` sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForexLayout {
    pub sections: Vec<ForexSection>,
    /// Header rows at the top of each section
    pub section_header_rows: usize,
    pub currency_column: usize,
    pub current_column: usize,
    pub horizons: Vec<Horizon>,
}

impl Default for ForexLayout {
    fn default() -> Self {
        Self {
            sections: vec![
                ForexSection {
                    reference: "USD".to_string(),
                    rows: RowRange::new(8, 19),
                },
                ForexSection {
                    reference: "EUR".to_string(),
                    rows: RowRange::new(19, 25),
                },
            ],
            section_header_rows: 2,
            currency_column: 0,
            current_column: 3,
            horizons: vec![
                Horizon { column: 5, months: 3 },
                Horizon { column: 7, months: 12 },
                Horizon { column: 9, months: 24 },
            ],
        }
    }
}

impl ForexLayout {
    /// Check that the layout names at least one section and one horizon
    pub fn validate(&self) -> Result<()> {
        if self.sections.is_empty() {
            return Err(Error::InvalidLayout("sections must not be empty".to_string()));
        }
        if self.horizons.is_empty() {
            return Err(Error::InvalidLayout("horizons must not be empty".to_string()));
        }
        if let Some(section) = self.sections.iter().find(|s| s.reference.trim().is_empty()) {
            return Err(Error::InvalidLayout(format!(
                "section starting at row {} has no reference currency",
                section.rows.start
            )));
        }

        Ok(())
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
}

/// One currency forecast at one horizon
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForexRecord {
    pub currency: String,
    pub reference: String,
    pub current_value: f64,
    pub forecasted_value: f64,
    pub horizon: u32,
    #[serde(rename = "date")]
    pub period: String,
}

/// Extract every forecast of every section, without exact duplicates
pub fn extract_forex(grid: &Grid, layout: &ForexLayout, period: Period) -> Vec<ForexRecord> {
    let mut records: Vec<ForexRecord> = Vec::new();

    for section in &layout.sections {
        let rows = section.rows.clamp(grid.height());
        let data_rows = (rows.start + layout.section_header_rows).min(rows.end)..rows.end;

        for row in data_rows {
            let Some(name) = grid.cell(row, layout.currency_column).text() else {
                continue;
            };
            let Some(code) = currency_code(&name) else {
                continue;
            };
            let Some(current_value) = grid.cell(row, layout.current_column).as_number() else {
                continue;
            };

            for horizon in &layout.horizons {
                let Some(forecasted_value) = grid.cell(row, horizon.column).as_number() else {
                    continue;
                };
                let record = ForexRecord {
                    currency: code.to_string(),
                    reference: section.reference.clone(),
                    current_value,
                    forecasted_value,
                    horizon: horizon.months,
                    period: period.to_string(),
                };
                if !records.contains(&record) {
                    records.push(record);
                }
            }
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forex_grid() -> Grid {
        let mut rows = vec![vec![String::new(); 10]; 25];
        let mut set = |r: usize, values: &[&str]| {
            for (c, v) in values.iter().enumerate() {
                rows[r][c] = v.to_string();
            }
        };
        set(8, &["US Dollar per", "", "", "Spot"]);
        set(10, &["Japanese Yen", "", "", "145.2", "", "140.0", "", "135.5", "", "130.1"]);
        set(11, &["Klingon Darsek", "", "", "1.0", "", "1.0", "", "1.0", "", "1.0"]);
        set(12, &["Swiss Franc", "", "", "0.85", "", "NA", "", "0.84", "", ""]);
        set(21, &["United Kingdom Pound", "", "", "0.84", "", "0.85", "", "0.86", "", "0.87"]);
        Grid::from_rows(rows)
    }

    #[test]
    fn test_currency_codes() {
        assert_eq!(currency_code(" Japanese Yen "), Some("JPY"));
        assert_eq!(currency_code("Swiss Franc"), Some("CHF"));
        assert_eq!(currency_code("US Dollar"), None);
    }

    #[test]
    fn test_extract_forex_sections() {
        let period = Period::parse("202409").unwrap();
        let records = extract_forex(&forex_grid(), &ForexLayout::default(), period);

        let summary: Vec<_> = records
            .iter()
            .map(|r| (r.currency.as_str(), r.reference.as_str(), r.horizon, r.forecasted_value))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("JPY", "USD", 3, 140.0),
                ("JPY", "USD", 12, 135.5),
                ("JPY", "USD", 24, 130.1),
                ("CHF", "USD", 12, 0.84),
                ("GBP", "EUR", 3, 0.85),
                ("GBP", "EUR", 12, 0.86),
                ("GBP", "EUR", 24, 0.87),
            ]
        );
        assert!(records.iter().all(|r| r.period == "202409"));
        assert_eq!(records[0].current_value, 145.2);
    }

    #[test]
    fn test_duplicate_records_dropped() {
        let mut layout = ForexLayout::default();
        layout.sections.push(layout.sections[0].clone());

        let period = Period::parse("202409").unwrap();
        assert_eq!(extract_forex(&forex_grid(), &layout, period).len(), 7);
    }

    #[test]
    fn test_default_layout_is_valid() {
        assert!(ForexLayout::default().validate().is_ok());
    }

    #[test]
    fn test_load_rejects_empty_lists() {
        let dir = tempfile::tempdir().expect("tempdir");

        let path = dir.path().join("no_sections.json");
        fs::write(&path, r#"{"sections": []}"#).unwrap();
        assert!(matches!(ForexLayout::load(&path), Err(Error::InvalidLayout(_))));

        let path = dir.path().join("no_horizons.json");
        fs::write(&path, r#"{"horizons": []}"#).unwrap();
        assert!(matches!(ForexLayout::load(&path), Err(Error::InvalidLayout(_))));

        let path = dir.path().join("partial.json");
        fs::write(&path, r#"{"current_column": 4}"#).unwrap();
        let layout = ForexLayout::load(&path).unwrap();
        assert_eq!(layout.current_column, 4);
        assert_eq!(layout.horizons, ForexLayout::default().horizons);
    }
}
