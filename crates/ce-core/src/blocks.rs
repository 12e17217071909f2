//! Column block segmentation
//!
//! Data columns are split into separator columns (blank across the whole
//! forecast region) and variable blocks. A block is either a two-column
//! (current year, next year) pair or a three-column categorical block such
//! as "rate increase / no change / decrease".

use crate::grid::Grid;
use crate::layout::SheetLayout;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Shape of a variable block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockShape {
    /// Current-period and next-period values of one indicator
    Paired,
    /// Three mutually exclusive categorical outcomes
    Triple,
}

impl BlockShape {
    /// Number of columns a complete block of this shape spans
    pub fn width(self) -> usize {
        match self {
            BlockShape::Paired => 2,
            BlockShape::Triple => 3,
        }
    }
}

/// A contiguous run of data columns holding one indicator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableBlock {
    /// First column (inclusive)
    pub start: usize,
    /// Last column (exclusive)
    pub end: usize,
    /// Resolved label of the first column
    pub label: String,
    pub shape: BlockShape,
}

impl VariableBlock {
    /// Columns covered by the block
    pub fn columns(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Number of columns covered by the block
    pub fn width(&self) -> usize {
        self.end - self.start
    }

    /// False for a trailing leftover column cut short by a separator or the
    /// edge of the sheet. Incomplete blocks yield no records.
    pub fn is_complete(&self) -> bool {
        self.width() == self.shape.width()
    }
}

/// Scanner state while walking columns left to right
#[derive(Debug, Clone, Copy)]
enum ScanState {
    /// Between blocks
    Separator,
    /// One column seen at `start`
    PairedCandidate { start: usize },
    /// Two same-labelled columns seen at `start`
    TripleCandidate { start: usize },
}

/// Which data columns are separators: blank in every summary and respondent row.
///
/// The returned mask has one entry per grid column; columns left of the
/// layout's first data column are always separators.
pub fn separator_mask(grid: &Grid, layout: &SheetLayout) -> Vec<bool> {
    let summary = layout.summary_rows.clamp(grid.height());
    let respondents = layout.respondent_rows.clamp(grid.height());

    (0..grid.width())
        .map(|col| {
            col < layout.first_data_column
                || (grid.column_is_blank(col, summary.clone())
                    && grid.column_is_blank(col, respondents.clone()))
        })
        .collect()
}

/// Segment the data columns of a worksheet into variable blocks
pub fn segment_columns(grid: &Grid, labels: &[String], layout: &SheetLayout) -> Vec<VariableBlock> {
    let separators = separator_mask(grid, layout);
    segment(labels, &separators, layout.first_data_column)
}

/// Segment columns `first..separators.len()` given their labels and separator mask.
///
/// Within a separator-free run, label repetition decides block boundaries:
/// three equal labels make a Triple, anything else a Paired block of two.
/// The scan advances by the block width, so several blocks may share a run.
/// A single column left at the end of a run becomes an incomplete block, which
/// keeps the result an exact partition of the non-separator columns.
pub fn segment(labels: &[String], separators: &[bool], first: usize) -> Vec<VariableBlock> {
    let n = separators.len();
    let label = |col: usize| labels.get(col).map(String::as_str).unwrap_or("");
    let block = |start: usize, end: usize, shape: BlockShape| VariableBlock {
        start,
        end,
        label: label(start).to_string(),
        shape,
    };

    let mut blocks = Vec::new();
    let mut state = ScanState::Separator;
    let mut col = first;

    // `col == n` acts as a trailing separator that flushes any open block
    while col <= n {
        let open = col < n && !separators[col];

        match state {
            ScanState::Separator => {
                if open {
                    state = ScanState::PairedCandidate { start: col };
                }
                col += 1;
            }
            ScanState::PairedCandidate { start } => {
                if !open {
                    blocks.push(block(start, start + 1, BlockShape::Paired));
                    state = ScanState::Separator;
                } else if label(col) == label(start) {
                    state = ScanState::TripleCandidate { start };
                } else {
                    blocks.push(block(start, col + 1, BlockShape::Paired));
                    state = ScanState::Separator;
                }
                col += 1;
            }
            ScanState::TripleCandidate { start } => {
                state = ScanState::Separator;
                if open && label(col) == label(start) {
                    blocks.push(block(start, col + 1, BlockShape::Triple));
                    col += 1;
                } else {
                    // Re-scan `col` as the possible start of the next block
                    blocks.push(block(start, start + 2, BlockShape::Paired));
                }
            }
        }
    }

    blocks
}
