//! Release date parsing
//!
//! Survey sheets record their publication date in one of several historical
//! formats. Each format has a parser strategy; strategies are tried in order
//! and the first date found wins. When none succeeds the date degrades to the
//! `"Survey"` sentinel instead of failing the worksheet.

use crate::grid::{Cell, Grid};
use chrono::{Datelike, Days, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;

/// Marker preceding the date in newer sheets
pub const SURVEY_DATE_MARKER: &str = "Survey Date:";

/// Text used when no release date can be determined
pub const SENTINEL: &str = "Survey";

static MONTH_DAY_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b([a-z]+)\.?\s+(\d{1,2})(?:\s*,\s*|\s+)(\d{4})\b")
        .expect("month-day-year pattern is valid")
});

const MONTHS: [(&str, &str); 12] = [
    ("jan", "january"),
    ("feb", "february"),
    ("mar", "march"),
    ("apr", "april"),
    ("may", "may"),
    ("jun", "june"),
    ("jul", "july"),
    ("aug", "august"),
    ("sep", "september"),
    ("oct", "october"),
    ("nov", "november"),
    ("dec", "december"),
];

/// A parser strategy over a whole worksheet
type Strategy = fn(&Grid) -> Option<NaiveDate>;

const STRATEGIES: [Strategy; 2] = [from_label_row, from_header_text];

/// Publication date of a worksheet, or the sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReleaseDate {
    Date(NaiveDate),
    Survey,
}

impl ReleaseDate {
    /// Run every strategy against the grid
    pub fn from_grid(grid: &Grid) -> Self {
        STRATEGIES
            .iter()
            .find_map(|strategy| strategy(grid))
            .map_or(ReleaseDate::Survey, ReleaseDate::Date)
    }

    /// Parse free text in any supported shape
    pub fn parse_text(text: &str) -> Self {
        parse_date_text(text)
            .or_else(|| parse_header_tokens(text))
            .map_or(ReleaseDate::Survey, ReleaseDate::Date)
    }

    pub fn is_sentinel(&self) -> bool {
        matches!(self, ReleaseDate::Survey)
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            ReleaseDate::Date(d) => Some(*d),
            ReleaseDate::Survey => None,
        }
    }
}

impl fmt::Display for ReleaseDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseDate::Date(d) => write!(f, "{:04}{:02}{:02}", d.year(), d.month(), d.day()),
            ReleaseDate::Survey => f.write_str(SENTINEL),
        }
    }
}

impl Serialize for ReleaseDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Month number for a full or abbreviated English month name, ignoring case
pub fn month_number(name: &str) -> Option<u32> {
    let name = name.trim().trim_end_matches('.').to_ascii_lowercase();
    MONTHS
        .iter()
        .position(|(abbr, full)| name == *abbr || name == *full)
        .map(|i| i as u32 + 1)
}

/// Find the "Survey Date:" row and parse the date next to the marker
pub fn from_label_row(grid: &Grid) -> Option<NaiveDate> {
    grid.rows().find_map(|row| {
        let (pos, text) = row
            .iter()
            .enumerate()
            .find_map(|(i, cell)| cell.text().map(|t| (i, t)))?;
        let marker = find_marker(&text)?;

        let rest = text[marker + SURVEY_DATE_MARKER.len()..].trim();
        if !rest.is_empty() {
            return parse_date_text(rest);
        }

        match row[pos + 1..].iter().find(|cell| !cell.is_blank())? {
            Cell::Number(serial) => from_excel_serial(*serial),
            cell => parse_date_text(&cell.text()?),
        }
    })
}

/// Parse the trailing "<Month> <Day>, <Year>" tokens of the top-left header cell
pub fn from_header_text(grid: &Grid) -> Option<NaiveDate> {
    parse_header_tokens(&grid.cell(0, 0).text()?)
}

/// Parse `YYYY-MM-DD[ HH:MM:SS]` or `Month D, YYYY`
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    parse_iso(text).or_else(|| parse_month_day_year(text))
}

fn find_marker(text: &str) -> Option<usize> {
    text.to_ascii_lowercase()
        .find(&SURVEY_DATE_MARKER.to_ascii_lowercase())
}

fn parse_iso(text: &str) -> Option<NaiveDate> {
    let mut fields = text.trim().splitn(3, '-');
    let year = fields.next()?.trim();
    let month = fields.next()?.trim();
    let day: String = fields
        .next()?
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();

    if year.len() != 4 {
        return None;
    }

    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn parse_month_day_year(text: &str) -> Option<NaiveDate> {
    MONTH_DAY_YEAR.captures_iter(text).find_map(|caps| {
        let month = month_number(&caps[1])?;
        NaiveDate::from_ymd_opt(caps[3].parse().ok()?, month, caps[2].parse().ok()?)
    })
}

fn parse_header_tokens(text: &str) -> Option<NaiveDate> {
    let tokens: Vec<String> = text
        .split_whitespace()
        .map(|t| t.replace(',', ""))
        .filter(|t| !t.is_empty())
        .collect();
    let last = tokens.get(tokens.len().checked_sub(3)?..)?;

    let month = last.iter().find_map(|t| month_number(t))?;
    let is_number = |t: &&String, len: std::ops::RangeInclusive<usize>| {
        len.contains(&t.len()) && t.chars().all(|c| c.is_ascii_digit())
    };
    let day: u32 = last.iter().find(|t| is_number(t, 1..=2))?.parse().ok()?;
    let year: i32 = last.iter().find(|t| is_number(t, 4..=4))?.parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

fn from_excel_serial(serial: f64) -> Option<NaiveDate> {
    if !(1.0..2_958_466.0).contains(&serial) {
        return None;
    }
    // Serial day 0 is 1899-12-30 once the 1900 leap-year bug is accounted for
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial.trunc() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> String {
        ReleaseDate::parse_text(s).to_string()
    }

    #[test]
    fn test_month_number() {
        assert_eq!(month_number("Jan"), Some(1));
        assert_eq!(month_number("september"), Some(9));
        assert_eq!(month_number("SEP"), Some(9));
        assert_eq!(month_number("Dec."), Some(12));
        assert_eq!(month_number("Foo"), None);
    }

    #[test]
    fn test_parse_text_shapes() {
        assert_eq!(text("March 5, 1990"), "19900305");
        assert_eq!(text("1998-07-15 00:00:00"), "19980715");
        assert_eq!(text("2024-09-09"), "20240909");
        assert_eq!(text("mar  5 ,1990"), "19900305");
        assert_eq!(text("Sep 9 2024"), "20240909");
    }

    #[test]
    fn test_parse_text_failures_give_sentinel() {
        assert_eq!(text("Foo 5, 1990"), "Survey");
        assert_eq!(text("February 30, 2024"), "Survey");
        assert_eq!(text(""), "Survey");
        assert!(ReleaseDate::parse_text("no date here").is_sentinel());
    }

    #[test]
    fn test_label_row_adjacent_cell() {
        let grid = Grid::from_rows(vec![
            vec!["Consensus Forecasts", "", ""],
            vec!["Survey Date:", "", "September 9, 2024"],
        ]);

        assert_eq!(ReleaseDate::from_grid(&grid).to_string(), "20240909");
    }

    #[test]
    fn test_label_row_same_cell_and_iso() {
        let grid = Grid::from_rows(vec![vec!["Survey Date: 2015-01-12 00:00:00"]]);
        assert_eq!(from_label_row(&grid), NaiveDate::from_ymd_opt(2015, 1, 12));
    }

    #[test]
    fn test_label_row_excel_serial() {
        let grid = Grid::new(vec![vec![
            Cell::Text("Survey Date:".to_string()),
            Cell::Number(45544.0),
        ]]);
        assert_eq!(from_label_row(&grid), NaiveDate::from_ymd_opt(2024, 9, 9));
    }

    #[test]
    fn test_header_text_fallback() {
        let grid = Grid::from_rows(vec![vec!["Consensus Forecasts March 5, 1990"]]);
        assert_eq!(ReleaseDate::from_grid(&grid).to_string(), "19900305");

        let grid = Grid::from_rows(vec![vec!["Consensus Forecasts 5 March 1990"]]);
        assert_eq!(ReleaseDate::from_grid(&grid).to_string(), "19900305");
    }

    #[test]
    fn test_unparseable_label_row_falls_back_to_header() {
        let grid = Grid::from_rows(vec![
            vec!["Consensus Forecasts June 12, 2000"],
            vec!["Survey Date:", "sometime"],
        ]);
        assert_eq!(ReleaseDate::from_grid(&grid).to_string(), "20000612");
    }

    #[test]
    fn test_no_date_is_sentinel() {
        let grid = Grid::from_rows(vec![vec!["Consensus Forecasts Foo 5, 1990"]]);
        assert_eq!(ReleaseDate::from_grid(&grid), ReleaseDate::Survey);
        assert_eq!(ReleaseDate::from_grid(&Grid::default()), ReleaseDate::Survey);
    }

    #[test]
    fn test_serializes_as_string() {
        let date = ReleaseDate::Date(NaiveDate::from_ymd_opt(1990, 3, 5).unwrap());
        assert_eq!(serde_json::to_string(&date).unwrap(), "\"19900305\"");
        assert_eq!(serde_json::to_string(&ReleaseDate::Survey).unwrap(), "\"Survey\"");
    }

    #[test]
    fn test_date_accessor() {
        let grid = Grid::from_rows(vec![vec!["Survey Date:", "March 5, 1990"]]);
        assert_eq!(ReleaseDate::from_grid(&grid).date(), NaiveDate::from_ymd_opt(1990, 3, 5));
        assert_eq!(ReleaseDate::Survey.date(), None);
    }
}
