//! Multi-row header resolution

use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::layout::SheetLayout;
use std::ops::Range;

/// Resolve the column labels of a worksheet using its layout's header window.
///
/// Fails with [`Error::GridTooSmall`] when the grid ends before the window does.
pub fn column_labels(grid: &Grid, layout: &SheetLayout) -> Result<Vec<String>> {
    layout.validate()?;

    let required = layout.required_rows();
    if grid.height() < required {
        return Err(Error::GridTooSmall {
            required,
            actual: grid.height(),
        });
    }

    Ok(resolve_labels(grid, layout.header_rows.clamp(required)))
}

/// Join the non-blank cells of each column across `header_rows`, top to bottom.
///
/// A column whose join is empty takes the label of the column to its left, so
/// a merged-looking header that only labels its first sub-column labels all of
/// them. The returned list always has one entry per grid column.
pub fn resolve_labels(grid: &Grid, header_rows: Range<usize>) -> Vec<String> {
    let mut labels: Vec<String> = Vec::with_capacity(grid.width());

    for col in 0..grid.width() {
        let joined = header_rows
            .clone()
            .filter_map(|row| grid.cell(row, col).text())
            .collect::<Vec<_>>()
            .join(" ");

        let label = match labels.last() {
            Some(previous) if joined.is_empty() => previous.clone(),
            _ => joined,
        };
        labels.push(label);
    }

    labels
}
