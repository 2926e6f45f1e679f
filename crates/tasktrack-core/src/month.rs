use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::TasktrackError;

/// A calendar month, as used by the monthly expense summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, TasktrackError> {
        if !(1..=12).contains(&month) {
            return Err(TasktrackError::InvalidInput(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        Ok(Self { year, month })
    }

    /// The month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The current month according to the server's local clock.
    pub fn current() -> Self {
        Self::containing(Local::now().date_naive())
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn first_day(&self) -> Result<NaiveDate, TasktrackError> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).ok_or_else(|| {
            TasktrackError::InvalidInput(format!("year out of range: {}", self.year))
        })
    }

    /// Half-open interval `[first of this month, first of next month)` with
    /// both ends taken at local midnight in `tz`.
    pub fn range_in<Tz: TimeZone>(
        &self,
        tz: &Tz,
    ) -> Result<(DateTime<Utc>, DateTime<Utc>), TasktrackError> {
        Ok((
            start_of_day(tz, self.first_day()?)?,
            start_of_day(tz, self.next().first_day()?)?,
        ))
    }

    /// [`YearMonth::range_in`] for the server's local time zone.
    pub fn range(&self) -> Result<(DateTime<Utc>, DateTime<Utc>), TasktrackError> {
        self.range_in(&Local)
    }
}

/// The instant `day` begins in `tz`, as UTC.
pub fn start_of_day<Tz: TimeZone>(
    tz: &Tz,
    day: NaiveDate,
) -> Result<DateTime<Utc>, TasktrackError> {
    // A DST jump can swallow midnight; 01:00 stands in for it then.
    [0, 1]
        .into_iter()
        .filter_map(|hour| day.and_hms_opt(hour, 0, 0))
        .find_map(|local| tz.from_local_datetime(&local).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| TasktrackError::InvalidInput(format!("no local midnight on {day}")))
}

impl FromStr for YearMonth {
    type Err = TasktrackError;

    /// Parse `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TasktrackError::InvalidInput(format!("expected YYYY-MM, got {s:?}"));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.is_empty() || month.is_empty() {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
