use std::sync::RwLock;

use chrono::{DateTime, Duration, FixedOffset, Months, NaiveDate, NaiveTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};

/// Source of the current instant
///
/// All timestamps are stored as UTC; the reporting calendar decides where a day starts.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock used in production
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests and replays
#[derive(Debug)]
pub struct FixedClock {
    now: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        let mut guard = self.now.write().unwrap_or_else(|e| e.into_inner());
        *guard = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut guard = self.now.write().unwrap_or_else(|e| e.into_inner());
        *guard += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read().unwrap_or_else(|e| e.into_inner())
    }
}

/// Named period used by reports and earnings queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    Biweekly,
    #[default]
    Monthly,
}

impl Period {
    pub fn label(&self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Biweekly => "biweekly",
            Period::Monthly => "monthly",
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Period::Daily),
            "weekly" => Ok(Period::Weekly),
            "biweekly" => Ok(Period::Biweekly),
            "monthly" => Ok(Period::Monthly),
            _ => Err(format!("Invalid period: {}", s)),
        }
    }
}

/// Inclusive `[start, end]` time range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start > end {
            return Err(AppError::invalid_input(format!(
                "Window start ({}) must be before or equal to end ({})",
                start.to_rfc3339(),
                end.to_rfc3339()
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at <= self.end
    }
}

/// Day boundaries of the business's reporting clock
#[derive(Debug, Clone, Copy)]
pub struct ReportingCalendar {
    offset: FixedOffset,
}

impl Default for ReportingCalendar {
    fn default() -> Self {
        Self::utc()
    }
}

impl ReportingCalendar {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    /// Parses `+HH:MM`, `-HH:MM` or `Z`
    pub fn parse_offset(value: &str) -> std::result::Result<FixedOffset, String> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("z") || value.is_empty() {
            return Ok(Utc.fix());
        }

        value
            .parse::<FixedOffset>()
            .map_err(|e| format!("Invalid offset {}: {}", value, e))
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Calendar date of an instant on the reporting clock
    pub fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }

    pub fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        let local_midnight = date.and_time(NaiveTime::MIN);
        let utc = local_midnight - Duration::seconds(i64::from(self.offset.local_minus_utc()));
        Utc.from_utc_datetime(&utc)
    }

    /// Last millisecond of the day
    pub fn end_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        self.start_of_day(date + Duration::days(1)) - Duration::milliseconds(1)
    }

    pub fn day_window(&self, date: NaiveDate) -> TimeWindow {
        TimeWindow {
            start: self.start_of_day(date),
            end: self.end_of_day(date),
        }
    }

    /// Whole-day window for a named report period ending on `end_date`
    pub fn report_window(&self, period: Period, end_date: NaiveDate) -> TimeWindow {
        let start_date = match period {
            Period::Daily => end_date,
            Period::Weekly => end_date - Duration::days(6),
            Period::Biweekly => end_date - Duration::days(13),
            Period::Monthly => end_date
                .checked_sub_months(Months::new(1))
                .unwrap_or(end_date - Duration::days(30)),
        };

        TimeWindow {
            start: self.start_of_day(start_date),
            end: self.end_of_day(end_date),
        }
    }

    /// Trailing window ending at `now`, used for earnings and withdrawal balances
    pub fn trailing_window(&self, period: Period, now: DateTime<Utc>) -> TimeWindow {
        let start = match period {
            Period::Daily => self.start_of_day(self.local_date(now)),
            Period::Weekly => now - Duration::days(7),
            Period::Biweekly => now - Duration::days(14),
            Period::Monthly => now
                .with_timezone(&self.offset)
                .checked_sub_months(Months::new(1))
                .map(|local| local.with_timezone(&Utc))
                .unwrap_or(now - Duration::days(30)),
        };

        TimeWindow { start, end: now }
    }
}
