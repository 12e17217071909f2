//! ce-core: Core library for normalizing Consensus Economics survey worksheets
//!
//! This library provides functionality to:
//! - Load worksheets from monthly workbooks into in-memory grids
//! - Resolve multi-row headers into one label per column
//! - Segment data columns into paired (current/next year) and triple
//!   (increase/no change/decrease) indicator blocks
//! - Parse the survey's release date from its historical formats
//! - Extract summary statistics and individual forecasts as tidy records
//! - Extract exchange-rate forecasts from the `Forex` sheet

pub mod blocks;
pub mod enrich;
pub mod error;
pub mod export;
pub mod extract;
pub mod forex;
pub mod grid;
pub mod header;
pub mod layout;
pub mod period;
pub mod release;
pub mod source;
pub mod worksheet;

pub use blocks::{segment_columns, BlockShape, VariableBlock};
pub use enrich::{enrich, Record, UnitLookup, WorksheetMetadata};
pub use error::{Error, Result};
pub use export::Format;
pub use extract::{extract_observations, Observation, Outcome, RowKind, Statistic};
pub use forex::{extract_forex, ForexLayout, ForexRecord, FOREX_SHEET};
pub use grid::{Cell, Grid};
pub use header::{column_labels, resolve_labels};
pub use layout::{RowRange, SheetLayout};
pub use period::{Period, DEFAULT_ENTITIES};
pub use release::ReleaseDate;
pub use source::{GridSource, MemorySource, WorkbookDir};
pub use worksheet::{extract_forex_sheet, extract_worksheet, normalize_grid};
