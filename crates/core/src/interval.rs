use chrono::{Months, NaiveDate};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntervalError {
    #[error("Interval end {end} is before its start {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    #[error("Invalid month: {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
    #[error("Interval is out of the supported date range")]
    OutOfRange,
}

/// A half-open date interval `[start, end)`: the start day is included, the
/// end day is not. `start == end` is the empty interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Interval {
    start: NaiveDate,
    end: NaiveDate,
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl Interval {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, IntervalError> {
        if end < start {
            return Err(IntervalError::EndBeforeStart { start, end });
        }
        Ok(Interval { start, end })
    }

    /// The calendar month `year-month`.
    pub fn month(year: i32, month: u32) -> Result<Self, IntervalError> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or(IntervalError::InvalidMonth { year, month })?;
        let end = start
            .checked_add_months(Months::new(1))
            .ok_or(IntervalError::OutOfRange)?;
        Ok(Interval { start, end })
    }

    /// January 1 of `year` up to (excluding) January 1 of the next year.
    pub fn year(year: i32) -> Result<Self, IntervalError> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(IntervalError::OutOfRange)?;
        let end = NaiveDate::from_ymd_opt(year + 1, 1, 1).ok_or(IntervalError::OutOfRange)?;
        Ok(Interval { start, end })
    }

    /// The `months` calendar months that end at `end` (exclusive).
    pub fn months_before(end: NaiveDate, months: u32) -> Result<Self, IntervalError> {
        let start = end
            .checked_sub_months(Months::new(months))
            .ok_or(IntervalError::OutOfRange)?;
        Ok(Interval { start, end })
    }

    pub fn start(self) -> NaiveDate {
        self.start
    }

    pub fn end(self) -> NaiveDate {
        self.end
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}
