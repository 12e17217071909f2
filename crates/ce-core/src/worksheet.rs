//! Worksheet pipeline: grid → labels → blocks → release date → records

use crate::blocks::segment_columns;
use crate::enrich::{enrich, Record, UnitLookup, WorksheetMetadata};
use crate::error::{Error, Result};
use crate::extract::extract_observations;
use crate::forex::{extract_forex, ForexLayout, ForexRecord, FOREX_SHEET};
use crate::grid::Grid;
use crate::header::column_labels;
use crate::layout::SheetLayout;
use crate::period::Period;
use crate::release::ReleaseDate;
use crate::source::GridSource;

/// Normalize one already-loaded country worksheet into sorted records.
///
/// An empty result means the sheet held no extractable values; errors are
/// structural only.
pub fn normalize_grid(
    grid: &Grid,
    period: Period,
    entity: &str,
    layout: &SheetLayout,
) -> Result<Vec<Record>> {
    let labels = column_labels(grid, layout)?;
    let blocks = segment_columns(grid, &labels, layout);
    let release_date = ReleaseDate::from_grid(grid);

    let observations = extract_observations(grid, &blocks, layout, period);
    let units = UnitLookup::from_grid(grid, &blocks, layout.unit_row);
    let metadata = WorksheetMetadata {
        release_date,
        month: period.month,
        entity: entity.to_string(),
    };

    Ok(enrich(observations, &units, &metadata))
}

/// Load `sheet_name` from `source_id` and normalize it.
///
/// The period is validated before the source is touched.
pub fn extract_worksheet<S: GridSource + ?Sized>(
    source: &mut S,
    source_id: &str,
    sheet_name: &str,
    period: &str,
    layout: &SheetLayout,
) -> Result<Vec<Record>> {
    let period = Period::parse(period)?;
    let sheet_name = sheet_name.trim();
    if sheet_name.is_empty() {
        return Err(Error::InvalidSheetName);
    }

    let grid = source.load(source_id, sheet_name)?;
    normalize_grid(&grid, period, sheet_name, layout)
}

/// Load the `Forex` sheet from `source_id` and extract its forecasts
pub fn extract_forex_sheet<S: GridSource + ?Sized>(
    source: &mut S,
    source_id: &str,
    period: &str,
    layout: &ForexLayout,
) -> Result<Vec<ForexRecord>> {
    let period = Period::parse(period)?;
    layout.validate()?;
    let grid = source.load(source_id, FOREX_SHEET)?;
    Ok(extract_forex(&grid, layout, period))
}
