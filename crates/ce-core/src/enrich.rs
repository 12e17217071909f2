//! Metadata enrichment and output ordering

use crate::blocks::VariableBlock;
use crate::extract::{Observation, Outcome, RowKind};
use crate::grid::Grid;
use crate::release::ReleaseDate;
use serde::Serialize;
use std::collections::HashMap;

/// One tidy output row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// Statistic label or forecaster identifier
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(skip)]
    pub kind: RowKind,
    pub variable: String,
    pub outcome: Option<Outcome>,
    pub value: f64,
    pub year: i32,
    pub unit: Option<String>,
    pub release_date: ReleaseDate,
    pub month: u32,
    pub entity: String,
}

/// Worksheet-wide values attached to every record
#[derive(Debug, Clone, PartialEq)]
pub struct WorksheetMetadata {
    pub release_date: ReleaseDate,
    pub month: u32,
    pub entity: String,
}

/// Unit text per block label
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitLookup {
    units: HashMap<String, String>,
}

impl UnitLookup {
    /// Read units from `unit_row`: the first non-blank cell across each
    /// block's columns. When labels repeat, the first block wins.
    pub fn from_grid(grid: &Grid, blocks: &[VariableBlock], unit_row: usize) -> Self {
        let mut lookup = Self::default();
        for block in blocks {
            if let Some(unit) = block.columns().find_map(|col| grid.cell(unit_row, col).text()) {
                lookup.units.entry(block.label.clone()).or_insert(unit);
            }
        }
        lookup
    }

    pub fn get(&self, variable: &str) -> Option<&str> {
        self.units.get(variable).map(String::as_str)
    }

    pub fn insert(&mut self, variable: impl Into<String>, unit: impl Into<String>) {
        self.units.insert(variable.into(), unit.into());
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for UnitLookup {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            units: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Attach metadata to every observation and sort the result.
///
/// Never drops an observation; variables without a unit get `None`.
pub fn enrich(
    observations: Vec<Observation>,
    units: &UnitLookup,
    metadata: &WorksheetMetadata,
) -> Vec<Record> {
    let mut records: Vec<Record> = observations
        .into_iter()
        .map(|obs| Record {
            unit: units.get(&obs.variable).map(str::to_string),
            record_type: obs.record_type,
            kind: obs.kind,
            variable: obs.variable,
            outcome: obs.outcome,
            value: obs.value,
            year: obs.year,
            release_date: metadata.release_date,
            month: metadata.month,
            entity: metadata.entity.clone(),
        })
        .collect();

    sort_records(&mut records);
    records
}

/// Order by variable (first appearance), then statistics by precedence, then
/// forecasters in encounter order.
pub fn sort_records(records: &mut [Record]) {
    let mut first_seen: HashMap<String, usize> = HashMap::new();
    for record in records.iter() {
        let next = first_seen.len();
        first_seen.entry(record.variable.clone()).or_insert(next);
    }

    // Stable sort keeps encounter order inside each (variable, rank) group
    records.sort_by_key(|r| (first_seen[&r.variable], r.kind.rank()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Statistic;

    fn obs(record_type: &str, kind: RowKind, variable: &str, year: i32) -> Observation {
        Observation {
            record_type: record_type.to_string(),
            kind,
            variable: variable.to_string(),
            outcome: None,
            value: 1.0,
            year,
        }
    }

    fn metadata() -> WorksheetMetadata {
        WorksheetMetadata {
            release_date: ReleaseDate::Survey,
            month: 9,
            entity: "Germany".to_string(),
        }
    }

    #[test]
    fn test_enrich_keeps_every_record() {
        let observations = vec![
            obs("Bank A", RowKind::Forecaster, "GDP", 2024),
            obs("High", RowKind::Statistic(Statistic::High), "CPI", 2024),
            obs("Bank B", RowKind::Forecaster, "Unmapped", 2025),
        ];
        let units: UnitLookup = [("GDP", "real, % change")].into_iter().collect();

        let records = enrich(observations, &units, &metadata());

        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.entity == "Germany" && r.month == 9));
        let gdp = records.iter().find(|r| r.variable == "GDP").unwrap();
        assert_eq!(gdp.unit.as_deref(), Some("real, % change"));
        let unmapped = records.iter().find(|r| r.variable == "Unmapped").unwrap();
        assert_eq!(unmapped.unit, None);
    }

    #[test]
    fn test_sort_order() {
        let observations = vec![
            obs("Bank A", RowKind::Forecaster, "GDP", 2024),
            obs("Low", RowKind::Statistic(Statistic::Low), "GDP", 2024),
            obs("Bank B", RowKind::Forecaster, "CPI", 2024),
            obs("Consensus (Mean)", RowKind::Statistic(Statistic::Mean), "GDP", 2024),
            obs("Consensus (Mean)", RowKind::Statistic(Statistic::Mean), "GDP", 2025),
            obs("Bank C", RowKind::Forecaster, "GDP", 2024),
        ];

        let records = enrich(observations, &UnitLookup::default(), &metadata());
        let order: Vec<_> = records
            .iter()
            .map(|r| (r.variable.as_str(), r.record_type.as_str(), r.year))
            .collect();

        assert_eq!(
            order,
            vec![
                ("GDP", "Consensus (Mean)", 2024),
                ("GDP", "Consensus (Mean)", 2025),
                ("GDP", "Low", 2024),
                ("GDP", "Bank A", 2024),
                ("GDP", "Bank C", 2024),
                ("CPI", "Bank B", 2024),
            ]
        );
    }

    #[test]
    fn test_units_from_grid() {
        let grid = Grid::from_rows(vec![
            vec!["", "GDP", "GDP", "CPI", "CPI"],
            vec!["", "", "real, % change", "% change", ""],
        ]);
        let blocks = vec![
            VariableBlock {
                start: 1,
                end: 3,
                label: "GDP".to_string(),
                shape: crate::blocks::BlockShape::Paired,
            },
            VariableBlock {
                start: 3,
                end: 5,
                label: "CPI".to_string(),
                shape: crate::blocks::BlockShape::Paired,
            },
        ];

        let units = UnitLookup::from_grid(&grid, &blocks, 1);
        assert_eq!(units.len(), 2);
        assert_eq!(units.get("GDP"), Some("real, % change"));
        assert_eq!(units.get("CPI"), Some("% change"));
        assert_eq!(units.get("Rates"), None);
    }

    #[test]
    fn test_unit_lookup_insert_replaces() {
        let mut units = UnitLookup::default();
        assert!(units.is_empty());

        units.insert("GDP", "real, % change");
        units.insert("GDP", "% change");
        units.insert("CPI", "% yoy");

        assert_eq!(units.len(), 2);
        assert_eq!(units.get("GDP"), Some("% change"));
        assert_eq!(units.get("Rates"), None);
    }
}
