//! CSV and JSON output of record sets

use crate::error::{Error, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Output format for record sets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Json,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Format::Csv),
            "json" => Ok(Format::Json),
            other => Err(format!("unknown format '{other}', supported formats: csv, json")),
        }
    }
}

/// Write rows as CSV with a header record taken from the field names
pub fn write_csv<T: Serialize, W: Write>(rows: &[T], writer: W, name: &str) -> Result<()> {
    let csv_error = |source| Error::Csv {
        path: PathBuf::from(name),
        source,
    };

    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer.serialize(row).map_err(csv_error)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write rows as a pretty-printed JSON array
pub fn write_json<T: Serialize, W: Write>(rows: &[T], mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, rows)?;
    writeln!(writer)?;
    Ok(())
}

/// Write rows to a file in the given format
pub fn save<T: Serialize, P: AsRef<Path>>(rows: &[T], path: P, format: Format) -> Result<()> {
    let path = path.as_ref();
    let writer = BufWriter::new(File::create(path)?);

    match format {
        Format::Csv => write_csv(rows, writer, &path.to_string_lossy()),
        Format::Json => write_json(rows, writer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::Record;
    use crate::extract::{Outcome, RowKind, Statistic};
    use crate::release::ReleaseDate;
    use chrono::NaiveDate;

    fn records() -> Vec<Record> {
        vec![
            Record {
                record_type: "Consensus (Mean)".to_string(),
                kind: RowKind::Statistic(Statistic::Mean),
                variable: "Inflation".to_string(),
                outcome: None,
                value: 2.5,
                year: 2024,
                unit: Some("% change".to_string()),
                release_date: ReleaseDate::Date(NaiveDate::from_ymd_opt(2024, 9, 9).unwrap()),
                month: 9,
                entity: "Germany".to_string(),
            },
            Record {
                record_type: "Bank A".to_string(),
                kind: RowKind::Forecaster,
                variable: "Rates".to_string(),
                outcome: Some(Outcome::NoChange),
                value: 1.0,
                year: 2024,
                unit: None,
                release_date: ReleaseDate::Survey,
                month: 9,
                entity: "Germany".to_string(),
            },
        ]
    }

    #[test]
    fn test_write_csv() {
        let mut out = Vec::new();
        write_csv(&records(), &mut out, "memory").unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "type,variable,outcome,value,year,unit,release_date,month,entity"
        );
        assert_eq!(
            lines[1],
            "Consensus (Mean),Inflation,,2.5,2024,% change,20240909,9,Germany"
        );
        assert_eq!(lines[2], "Bank A,Rates,No Change,1.0,2024,,Survey,9,Germany");
    }

    #[test]
    fn test_write_json() {
        let mut out = Vec::new();
        write_json(&records(), &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value[0]["type"], "Consensus (Mean)");
        assert_eq!(value[0]["release_date"], "20240909");
        assert_eq!(value[1]["outcome"], "No Change");
        assert!(value[1]["unit"].is_null());
        assert!(value[0].get("kind").is_none());
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("CSV".parse::<Format>(), Ok(Format::Csv));
        assert_eq!("json".parse::<Format>(), Ok(Format::Json));
        assert!("parquet".parse::<Format>().is_err());
    }
}
