use chrono::{Datelike, Months, NaiveDate};
use std::str::FromStr;

use crate::error::LedgerError;

/// A calendar month, the bucket every aggregation and rollover works on.
///
/// Field order gives chronological `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        Self::of(date) == *self
    }

    pub fn first_day(&self) -> NaiveDate {
        // `of` only builds valid year/month pairs.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn next(&self) -> Option<Self> {
        self.first_day()
            .checked_add_months(Months::new(1))
            .map(Self::of)
    }
}

impl FromStr for Period {
    type Err = LedgerError;

    /// Parses `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
            .ok()
            .filter(|_| s.len() == 7)
            .map(Self::of)
            .ok_or_else(|| LedgerError::validation(format!("invalid month '{s}', expected YYYY-MM")))
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
