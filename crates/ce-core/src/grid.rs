//! In-memory worksheet grid and cell values

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::ops::Range;
use std::path::{Path, PathBuf};

static BLANK: Cell = Cell::Blank;

/// A single worksheet cell
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    /// Text value, kept as written
    Text(String),
    /// Numeric value
    Number(f64),
    /// Empty/missing cell
    #[default]
    Blank,
}

impl Cell {
    /// Parse raw text into a Cell, detecting numbers
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Cell::Blank;
        }

        match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() => Cell::Number(f),
            _ => Cell::Text(trimmed.to_string()),
        }
    }

    /// Blank cells and whitespace-only text
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Blank => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// True for the "NA" marker, ignoring case and whitespace
    pub fn is_na(&self) -> bool {
        match self {
            Cell::Text(s) => {
                let squeezed: String = s.split_whitespace().collect();
                squeezed.eq_ignore_ascii_case("na")
            }
            _ => false,
        }
    }

    /// Numeric value of the cell, if it has one.
    ///
    /// Text is accepted when its trimmed form parses as a finite float.
    /// Blank and `NA` cells never yield a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(f) if f.is_finite() => Some(*f),
            Cell::Number(_) | Cell::Blank => None,
            Cell::Text(_) if self.is_na() => None,
            Cell::Text(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        }
    }

    /// Trimmed display text, or None for blank cells
    pub fn text(&self) -> Option<String> {
        if self.is_blank() {
            None
        } else {
            Some(self.to_string().trim().to_string())
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{}", s),
            // Whole numbers print without a fraction so "2024" headers stay "2024"
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Blank => write!(f, ""),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::parse(s)
    }
}

impl From<f64> for Cell {
    fn from(f: f64) -> Self {
        Cell::Number(f)
    }
}

/// A rectangular, read-only 2-D array of cells (0-based rows and columns)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
    width: usize,
}

impl Grid {
    /// Build a grid, padding short rows with blanks
    pub fn new(mut rows: Vec<Vec<Cell>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, Cell::Blank);
        }
        Self { rows, width }
    }

    /// Build a grid from raw text rows, parsing each cell with [`Cell::parse`]
    pub fn from_rows<R, C, S>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(|s| Cell::parse(s.as_ref())).collect())
            .collect();
        Self::new(rows)
    }

    /// Load a CSV export of a worksheet (no header record)
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        read_csv(BufReader::new(file), path.to_path_buf())
    }

    /// Parse a CSV worksheet from a string (useful for testing)
    pub fn from_csv_str(content: &str, source_name: &str) -> Result<Self> {
        read_csv(content.as_bytes(), PathBuf::from(source_name))
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.width
    }

    /// Cell at (row, col); out-of-range reads are blank
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&BLANK)
    }

    /// A whole row; out-of-range rows are empty
    pub fn row(&self, row: usize) -> &[Cell] {
        self.rows.get(row).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate over the rows of the grid
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// True if every cell of `col` within `rows` is blank
    pub fn column_is_blank(&self, col: usize, rows: Range<usize>) -> bool {
        rows.into_iter().all(|r| self.cell(r, col).is_blank())
    }
}

fn read_csv<R: Read>(reader: R, path: PathBuf) -> Result<Grid> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // Worksheet rows have ragged widths
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result.map_err(|e| Error::Csv {
            path: path.clone(),
            source: e,
        })?;
        rows.push(record.iter().map(Cell::parse).collect());
    }

    Ok(Grid::new(rows))
}
