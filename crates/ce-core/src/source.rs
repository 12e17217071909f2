//! Grid accessors: where worksheets come from

use crate::error::{Error, Result};
use crate::grid::{Cell, Grid};
use calamine::{open_workbook_auto, Data, DataType, Reader};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Something that can hand out worksheets as grids
pub trait GridSource {
    /// Load `sheet_name` from the source identified by `source_id`
    fn load(&mut self, source_id: &str, sheet_name: &str) -> Result<Grid>;

    /// Names of all sheets in a source
    fn sheet_names(&mut self, source_id: &str) -> Result<Vec<String>>;
}

/// A directory of monthly workbooks named `<source_id>.xlsx`
#[derive(Debug, Clone)]
pub struct WorkbookDir {
    root: PathBuf,
    extension: String,
}

impl WorkbookDir {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            extension: "xlsx".to_string(),
        }
    }

    /// Use another spreadsheet extension (anything calamine reads)
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Path of the workbook for a source id
    pub fn path_for(&self, source_id: &str) -> PathBuf {
        self.root.join(format!("{}.{}", source_id, self.extension))
    }

    fn open(&self, source_id: &str) -> Result<(PathBuf, calamine::Sheets<std::io::BufReader<std::fs::File>>)> {
        let path = self.path_for(source_id);
        if !path.is_file() {
            return Err(Error::SourceNotFound {
                source_id: source_id.to_string(),
                message: format!("no file at {}", path.display()),
            });
        }

        let workbook = open_workbook_auto(&path).map_err(|e| Error::SourceNotFound {
            source_id: source_id.to_string(),
            message: e.to_string(),
        })?;
        Ok((path, workbook))
    }
}

impl GridSource for WorkbookDir {
    fn load(&mut self, source_id: &str, sheet_name: &str) -> Result<Grid> {
        let (path, mut workbook) = self.open(source_id)?;

        if !workbook.sheet_names().iter().any(|name| name == sheet_name) {
            return Err(Error::SheetNotFound {
                source_id: source_id.to_string(),
                sheet: sheet_name.to_string(),
            });
        }

        let range = workbook
            .worksheet_range(sheet_name)
            .map_err(|e| Error::Workbook {
                path,
                sheet: sheet_name.to_string(),
                message: e.to_string(),
            })?;

        // Place cells at absolute sheet positions so A1 is (0, 0)
        let (row_offset, col_offset) = range.start().unwrap_or((0, 0));
        let (height, width) = range.get_size();
        let mut rows = vec![vec![Cell::Blank; col_offset as usize + width]; row_offset as usize + height];

        for (row, col, data) in range.cells() {
            rows[row_offset as usize + row][col_offset as usize + col] = data_to_cell(data);
        }

        Ok(Grid::new(rows))
    }

    fn sheet_names(&mut self, source_id: &str) -> Result<Vec<String>> {
        let (_, workbook) = self.open(source_id)?;
        Ok(workbook.sheet_names())
    }
}

fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Blank,
        Data::String(s) if s.trim().is_empty() => Cell::Blank,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::DateTime(_) => match data.as_datetime() {
            Some(dt) => Cell::Text(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => Cell::Blank,
        },
        other => Cell::Text(other.to_string()),
    }
}

/// Grids held in memory, keyed by source id and sheet name
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    sources: HashMap<String, Vec<(String, Grid)>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a sheet
    pub fn insert(&mut self, source_id: impl Into<String>, sheet_name: impl Into<String>, grid: Grid) {
        let sheets = self.sources.entry(source_id.into()).or_default();
        let sheet_name = sheet_name.into();
        match sheets.iter_mut().find(|(name, _)| *name == sheet_name) {
            Some((_, existing)) => *existing = grid,
            None => sheets.push((sheet_name, grid)),
        }
    }

    fn sheets(&self, source_id: &str) -> Result<&[(String, Grid)]> {
        self.sources
            .get(source_id)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::SourceNotFound {
                source_id: source_id.to_string(),
                message: "not loaded".to_string(),
            })
    }
}

impl GridSource for MemorySource {
    fn load(&mut self, source_id: &str, sheet_name: &str) -> Result<Grid> {
        self.sheets(source_id)?
            .iter()
            .find(|(name, _)| name == sheet_name)
            .map(|(_, grid)| grid.clone())
            .ok_or_else(|| Error::SheetNotFound {
                source_id: source_id.to_string(),
                sheet: sheet_name.to_string(),
            })
    }

    fn sheet_names(&mut self, source_id: &str) -> Result<Vec<String>> {
        Ok(self
            .sheets(source_id)?
            .iter()
            .map(|(name, _)| name.clone())
            .collect())
    }
}
