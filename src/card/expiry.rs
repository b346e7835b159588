use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpiryError {
    #[error("expiry date must be 4 digits (YYMM), got {0} characters")]
    Length(usize),
    #[error("expiry date must contain only digits")]
    NotNumeric,
    #[error("month {0} is out of range 1..=12")]
    Month(u32),
    #[error("year {0} is out of range 2000..=2099")]
    Year(i32),
}

/// Card expiration as carried on the stripe: year and month, no day.
///
/// The wire form is `YYMM`; two-digit years are read as 20YY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExpiryDate {
    year: i32,
    month: u32,
}

impl ExpiryDate {
    pub fn new(year: i32, month: u32) -> Result<Self, ExpiryError> {
        if !(2000..=2099).contains(&year) {
            return Err(ExpiryError::Year(year));
        }
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(ExpiryError::Month(month));
        }
        Ok(Self { year, month })
    }

    /// Expiry month containing `date`.
    pub fn from_date(date: NaiveDate) -> Result<Self, ExpiryError> {
        Self::new(date.year(), date.month())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Last calendar day on which the card is still valid.
    pub fn last_day(&self) -> NaiveDate {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|first| first.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }
}

impl FromStr for ExpiryDate {
    type Err = ExpiryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 4 {
            return Err(ExpiryError::Length(s.chars().count()));
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ExpiryError::NotNumeric);
        }
        let yy: i32 = s[..2].parse().map_err(|_| ExpiryError::NotNumeric)?;
        let mm: u32 = s[2..].parse().map_err(|_| ExpiryError::NotNumeric)?;
        Self::new(2000 + yy, mm)
    }
}

impl fmt::Display for ExpiryDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}{:02}", self.year % 100, self.month)
    }
}

impl TryFrom<String> for ExpiryDate {
    type Error = ExpiryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ExpiryDate> for String {
    fn from(value: ExpiryDate) -> String {
        value.to_string()
    }
}
