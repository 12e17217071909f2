//! Record extraction from summary and respondent rows

use crate::blocks::{BlockShape, VariableBlock};
use crate::grid::Grid;
use crate::layout::SheetLayout;
use crate::period::Period;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Summary statistics published above the individual forecasts, in output order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Statistic {
    Mean,
    High,
    Low,
    StandardDeviation,
    Count,
}

impl Statistic {
    pub const ALL: [Statistic; 5] = [
        Statistic::Mean,
        Statistic::High,
        Statistic::Low,
        Statistic::StandardDeviation,
        Statistic::Count,
    ];

    /// Recognise a summary row label, ignoring case and surrounding whitespace
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        Self::ALL
            .into_iter()
            .find(|stat| stat.aliases().contains(&label.as_str()))
    }

    /// Position in the output ordering
    pub fn precedence(self) -> usize {
        self as usize
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Statistic::Mean => &["consensus (mean)", "consensus", "mean"],
            Statistic::High => &["high"],
            Statistic::Low => &["low"],
            Statistic::StandardDeviation => &["standard deviation", "std dev", "std. dev."],
            Statistic::Count => &["number of forecasters", "no. of forecasters", "count"],
        }
    }
}

/// The three columns of a Triple block, left to right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Increase,
    #[serde(rename = "No Change")]
    NoChange,
    Decrease,
}

impl Outcome {
    pub const ALL: [Outcome; 3] = [Outcome::Increase, Outcome::NoChange, Outcome::Decrease];
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::Increase => "Increase",
            Outcome::NoChange => "No Change",
            Outcome::Decrease => "Decrease",
        })
    }
}

/// Whether a row carries a summary statistic or one forecaster's values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKind {
    Statistic(Statistic),
    Forecaster,
}

impl RowKind {
    /// Sort rank: statistics by precedence, then every forecaster
    pub fn rank(self) -> usize {
        match self {
            RowKind::Statistic(stat) => stat.precedence(),
            RowKind::Forecaster => Statistic::ALL.len(),
        }
    }
}

/// One value pulled out of a worksheet, before metadata is attached
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Row identifier: the statistic label as written, or the forecaster's name
    pub record_type: String,
    pub kind: RowKind,
    /// Label of the block the value came from
    pub variable: String,
    /// Set for values from Triple blocks
    pub outcome: Option<Outcome>,
    pub value: f64,
    pub year: i32,
}

/// Extract every value of every complete block.
///
/// Blocks are visited in order; within a block summary rows come first, then
/// respondent rows with a non-blank identifier. Blank, `NA` and non-numeric
/// cells are skipped one at a time.
pub fn extract_observations(
    grid: &Grid,
    blocks: &[VariableBlock],
    layout: &SheetLayout,
    period: Period,
) -> Vec<Observation> {
    let rows = labelled_rows(grid, layout);
    let mut observations = Vec::new();

    for block in blocks.iter().filter(|b| b.is_complete()) {
        for (row, record_type, kind) in &rows {
            for (col, year, outcome) in block_cells(block, period) {
                if let Some(value) = grid.cell(*row, col).as_number() {
                    observations.push(Observation {
                        record_type: record_type.clone(),
                        kind: *kind,
                        variable: block.label.clone(),
                        outcome,
                        value,
                        year,
                    });
                }
            }
        }
    }

    observations
}

/// Summary rows with a recognised statistic, followed by named respondent rows
fn labelled_rows(grid: &Grid, layout: &SheetLayout) -> Vec<(usize, String, RowKind)> {
    let identifier = |row: usize| grid.cell(row, layout.index_column).text();
    let summary: Range<usize> = layout.summary_rows.clamp(grid.height());
    let respondents: Range<usize> = layout.respondent_rows.clamp(grid.height());

    let statistics = summary.filter_map(|row| {
        let label = identifier(row)?;
        let stat = Statistic::from_label(&label)?;
        Some((row, label, RowKind::Statistic(stat)))
    });
    let forecasters = respondents
        .filter_map(|row| identifier(row).map(|name| (row, name, RowKind::Forecaster)));

    statistics.chain(forecasters).collect()
}

/// (column, year, outcome) for each value-bearing column of a block
fn block_cells(block: &VariableBlock, period: Period) -> Vec<(usize, i32, Option<Outcome>)> {
    match block.shape {
        BlockShape::Paired => vec![
            (block.start, period.year, None),
            (block.start + 1, period.next_year(), None),
        ],
        BlockShape::Triple => Outcome::ALL
            .into_iter()
            .enumerate()
            .map(|(i, outcome)| (block.start + i, period.year, Some(outcome)))
            .collect(),
    }
}
