use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, SubsecRound, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::TasktrackError;

pub const DEFAULT_CATEGORY: &str = "Other";

/// Years a stored date may fall in. Stores keep dates as fixed-width text
/// with a four-digit year.
pub const DATE_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub date: DateTime<Utc>,
}

/// An amount as it may arrive over the wire: a JSON number or numeric text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

impl AmountInput {
    fn value(&self) -> Result<Option<f64>, TasktrackError> {
        let value = match self {
            AmountInput::Number(n) => *n,
            AmountInput::Text(s) if s.trim().is_empty() => return Ok(None),
            AmountInput::Text(s) => s.trim().parse::<f64>().map_err(|_| {
                TasktrackError::InvalidInput(format!("amount must be a number, got {s:?}"))
            })?,
        };
        if !value.is_finite() {
            return Err(TasktrackError::InvalidInput("amount must be finite".into()));
        }
        Ok(Some(value))
    }
}

impl From<f64> for AmountInput {
    fn from(n: f64) -> Self {
        AmountInput::Number(n)
    }
}

/// A date as it may arrive over the wire.
///
/// Text is read as RFC 3339, then as a zone-less `YYYY-MM-DDTHH:MM[:SS]` in
/// server local time, then as a bare `YYYY-MM-DD` at UTC midnight. Numbers
/// are epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateInput {
    Millis(i64),
    Text(String),
}

impl DateInput {
    pub fn to_utc(&self) -> Result<DateTime<Utc>, TasktrackError> {
        let date = match self {
            DateInput::Millis(ms) => Utc
                .timestamp_millis_opt(*ms)
                .single()
                .ok_or_else(|| TasktrackError::InvalidInput(format!("date out of range: {ms}"))),
            DateInput::Text(s) => parse_date_text(s.trim()),
        }?;
        if !DATE_YEARS.contains(&date.year()) {
            return Err(TasktrackError::InvalidInput(format!(
                "date year must be between 0 and 9999, got {}",
                date.year()
            )));
        }
        Ok(date)
    }
}

impl From<DateTime<Utc>> for DateInput {
    fn from(dt: DateTime<Utc>) -> Self {
        DateInput::Text(dt.to_rfc3339())
    }
}

fn parse_date_text(s: &str) -> Result<DateTime<Utc>, TasktrackError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .ok_or_else(|| TasktrackError::InvalidInput(format!("no such local time: {s}")));
        }
    }
    if let Ok(day) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(midnight) = day.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    Err(TasktrackError::InvalidInput(format!("invalid date: {s:?}")))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateExpense {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub amount: Option<AmountInput>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub date: Option<DateInput>,
}

/// A validated expense with `category` and `date` filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub date: DateTime<Utc>,
}

impl CreateExpense {
    pub fn new(title: impl Into<String>, amount: f64) -> Self {
        Self {
            title: Some(title.into()),
            amount: Some(amount.into()),
            category: None,
            date: None,
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn date_input(mut self, date: DateInput) -> Self {
        self.date = Some(date);
        self
    }

    /// Validate required fields and fill defaults. `now` becomes the date
    /// when none was supplied.
    pub fn resolve(&self, now: DateTime<Utc>) -> Result<NewExpense, TasktrackError> {
        let title = match self.title.as_deref() {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => return Err(TasktrackError::InvalidInput("title is required".into())),
        };
        let amount = match &self.amount {
            Some(a) => a.value()?,
            None => None,
        }
        .ok_or_else(|| TasktrackError::InvalidInput("amount is required".into()))?;
        let category = self
            .category
            .clone()
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
        let date = match &self.date {
            Some(d) => d.to_utc()?,
            None => now,
        };
        Ok(NewExpense {
            title,
            amount,
            category,
            date: date.trunc_subsecs(3),
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub total: f64,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
    pub count: i64,
}
