//! Inclusive calendar-day range used to filter roster rows.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};

use crate::constants::DATE_FORMAT;
use crate::error::{ParkingError, ParkingResult};

/// Date range for filtering assignments. Both ends are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> ParkingResult<Self> {
        if start > end {
            return Err(ParkingError::InvalidRange(format!(
                "start {} is after end {}",
                start, end
            )));
        }
        Ok(DateRange { start, end })
    }

    /// Parse both bounds from YYYY-MM-DD strings.
    pub fn from_args(start: &str, end: &str) -> ParkingResult<Self> {
        Self::new(parse_bound(start)?, parse_bound(end)?)
    }

    /// Monday to Friday of the week following `today`.
    ///
    /// On a Monday this is the Monday seven days later, never `today` itself.
    pub fn next_work_week(today: NaiveDate) -> Self {
        let days_into_week = i64::from(today.weekday().num_days_from_monday());
        let monday = today + Duration::days(7 - days_into_week);
        DateRange {
            start: monday,
            end: monday + Duration::days(4),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

fn parse_bound(s: &str) -> ParkingResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| {
        ParkingError::InvalidRange(format!("invalid date format '{}'. Expected YYYY-MM-DD", s))
    })
}
