//! Date window for movement queries

use std::fmt;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Serialize, Serializer};

use super::result::{Error, Result};

/// Day format the provider expects in query strings
pub const PROVIDER_DATE_FORMAT: &str = "%d/%m/%Y";

/// Inclusive range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    #[serde(serialize_with = "serialize_day")]
    start: NaiveDate,
    #[serde(serialize_with = "serialize_day")]
    end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::validation(format!(
                "date window starts after it ends ({} > {})",
                format_day(start),
                format_day(end)
            )));
        }
        Ok(Self { start, end })
    }

    /// From 1 May through `today`; 1 May of the previous year if `today`
    /// falls before May.
    pub fn since_may(today: NaiveDate) -> Self {
        let may_first = |year| NaiveDate::from_ymd_opt(year, 5, 1);
        let start = may_first(today.year())
            .filter(|d| *d <= today)
            .or_else(|| may_first(today.year() - 1))
            .unwrap_or(today);
        Self { start, end: today }
    }

    /// Default window relative to the local clock
    pub fn current() -> Self {
        Self::since_may(Local::now().date_naive())
    }

    /// Parse a `DD/MM/YYYY` day
    pub fn parse_day(s: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(s.trim(), PROVIDER_DATE_FORMAT).map_err(|_| {
            Error::validation(format!("invalid date '{}', expected DD/MM/YYYY", s))
        })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn start_param(&self) -> String {
        format_day(self.start)
    }

    pub fn end_param(&self) -> String {
        format_day(self.end)
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start_param(), self.end_param())
    }
}

fn format_day(day: NaiveDate) -> String {
    day.format(PROVIDER_DATE_FORMAT).to_string()
}

fn serialize_day<S: Serializer>(day: &NaiveDate, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_day(*day))
}
