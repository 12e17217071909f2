//! Survey periods (`YYYYMM`) and the default set of surveyed entities

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Country sheets published in every monthly survey
pub const DEFAULT_ENTITIES: &[&str] = &[
    "USA",
    "Japan",
    "Germany",
    "France",
    "UK",
    "Italy",
    "Canada",
    "Euro Zone",
    "Netherlands",
    "Norway",
    "Spain",
    "Sweden",
    "Switzerland",
    "Austria",
    "Belgium",
    "Denmark",
    "Egypt",
    "Finland",
    "Greece",
    "Ireland",
    "Israel",
    "Nigeria",
    "Portugal",
    "Saudi Arabia",
    "South Africa",
];

/// A survey period: year and month of publication
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    /// Create a period, rejecting months outside 1..=12
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) || !(0..=9999).contains(&year) {
            return Err(Error::InvalidPeriod(format!("{year}{month:02}")));
        }
        Ok(Self { year, month })
    }

    /// Parse a 6-digit `YYYYMM` identifier
    pub fn parse(s: &str) -> Result<Self> {
        if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidPeriod(s.to_string()));
        }

        let year: i32 = s[..4]
            .parse()
            .map_err(|_| Error::InvalidPeriod(s.to_string()))?;
        let month: u32 = s[4..]
            .parse()
            .map_err(|_| Error::InvalidPeriod(s.to_string()))?;

        Self::new(year, month).map_err(|_| Error::InvalidPeriod(s.to_string()))
    }

    /// The year following this period's year
    pub fn next_year(&self) -> i32 {
        self.year + 1
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_period() {
        let period = Period::parse("202409").unwrap();
        assert_eq!(period.year, 2024);
        assert_eq!(period.month, 9);
        assert_eq!(period.next_year(), 2025);
        assert_eq!(period.to_string(), "202409");
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        for bad in ["20249", "2024090", "2024-9", "abcdef", "", "２０２４０９"] {
            assert!(
                matches!(Period::parse(bad), Err(Error::InvalidPeriod(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_rejects_bad_month() {
        assert!(Period::parse("202400").is_err());
        assert!(Period::parse("202413").is_err());
    }

    #[test]
    fn test_new_formats_zero_padded() {
        assert_eq!(Period::new(1990, 1).unwrap().to_string(), "199001");
    }

    #[test]
    fn test_default_entities() {
        assert_eq!(DEFAULT_ENTITIES.len(), 25);
        assert!(DEFAULT_ENTITIES.contains(&"Germany"));
    }
}
