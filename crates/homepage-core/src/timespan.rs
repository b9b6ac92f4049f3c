//! Human-readable date ranges, e.g. `2&ndash;8 April, 2018`.

use std::fmt;

use chrono::{Datelike, NaiveDate};

use crate::{
    error::{CoreError, Result},
    markup::Markup,
};

/// Input format of the dates, ISO `YYYY-MM-DD`.
pub const INPUT_FORMAT: &str = "%Y-%m-%d";

/// A closed range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timespan {
    begin: NaiveDate,
    end: NaiveDate,
}

impl Timespan {
    /// Create a time span; a missing end means a single day.
    pub fn new(begin: NaiveDate, end: Option<NaiveDate>) -> Result<Self> {
        let end = end.unwrap_or(begin);
        if end < begin {
            return Err(CoreError::date(format!(
                "time span ends ({end}) before it begins ({begin})"
            )));
        }
        Ok(Self { begin, end })
    }

    /// Parse a time span from ISO date strings.
    pub fn parse(begin: &str, end: Option<&str>) -> Result<Self> {
        let end = end.map(parse_date).transpose()?;
        Self::new(parse_date(begin)?, end)
    }

    /// First day.
    pub fn begin(&self) -> NaiveDate {
        self.begin
    }

    /// Last day.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether the span covers a single day.
    pub fn is_single_day(&self) -> bool {
        self.begin == self.end
    }

    /// Format with an arbitrary separator, dropping the parts of the begin
    /// date shared with the end date.
    pub fn format_with(&self, separator: &str) -> String {
        let end = self.end.format("%d %B, %Y").to_string();
        if self.is_single_day() {
            return end;
        }
        let begin_format = if self.begin.year() != self.end.year() {
            "%d %B, %Y"
        } else if self.begin.month() != self.end.month() {
            "%d %B"
        } else {
            "%d"
        };
        format!("{}{separator}{end}", self.begin.format(begin_format))
    }

    /// Format for a given markup language.
    pub fn render<M: Markup>(&self) -> String {
        self.format_with(M::RANGE_SEPARATOR)
    }
}

impl fmt::Display for Timespan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with("--"))
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), INPUT_FORMAT)
        .map_err(|e| CoreError::date(format!("invalid date '{s}': {e}")))
}
