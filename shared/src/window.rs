//! Reporting periods and the time windows they cover

use crate::errors::ReportError;
use chrono::{
    DateTime, Datelike, Days, FixedOffset, Months, NaiveDate, NaiveDateTime, NaiveTime,
};
use serde::{Deserialize, Serialize};

/// Length of a weekly reporting window, in days
pub const DAYS_PER_WEEK: f64 = 7.0;
/// Approximate month length used for monthly daily-rate estimates
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Kind of report being produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    Weekly,
    Monthly,
}

impl std::fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportPeriod::Weekly => write!(f, "weekly"),
            ReportPeriod::Monthly => write!(f, "monthly"),
        }
    }
}

/// Interpret a wall-clock time as local time in `offset`.
///
/// `None` when the instant falls outside chrono's representable range.
pub fn localize(naive: NaiveDateTime, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    naive.and_local_timezone(offset).single()
}

fn out_of_range(date: NaiveDate) -> ReportError {
    ReportError::InvalidWindow(format!("{date} is outside the supported date range"))
}

fn start_of_day(date: NaiveDate, offset: FixedOffset) -> Result<DateTime<FixedOffset>, ReportError> {
    localize(date.and_time(NaiveTime::MIN), offset).ok_or_else(|| out_of_range(date))
}

/// 23:59:59.999999 on `date`
fn end_of_day(date: NaiveDate, offset: FixedOffset) -> Result<DateTime<FixedOffset>, ReportError> {
    date.and_hms_micro_opt(23, 59, 59, 999_999)
        .and_then(|naive| localize(naive, offset))
        .ok_or_else(|| out_of_range(date))
}

/// An inclusive time range that records are aggregated over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWindow {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl ReportWindow {
    /// Create a window, rejecting one that ends before it starts
    pub fn new(
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Result<Self, ReportError> {
        if end < start {
            return Err(ReportError::InvalidWindow(format!(
                "window ends ({end}) before it starts ({start})"
            )));
        }
        Ok(Self { start, end })
    }

    /// Whole days from `first` 00:00 through `last` 23:59:59.999999
    pub fn from_dates(
        first: NaiveDate,
        last: NaiveDate,
        offset: FixedOffset,
    ) -> Result<Self, ReportError> {
        if last < first {
            return Err(ReportError::InvalidWindow(format!(
                "end date {last} is before start date {first}"
            )));
        }
        Ok(Self {
            start: start_of_day(first, offset)?,
            end: end_of_day(last, offset)?,
        })
    }

    /// Monday through Sunday of the week before the one containing `now`
    pub fn previous_week(now: DateTime<FixedOffset>) -> Result<Self, ReportError> {
        Self::previous_week_of(now.date_naive(), *now.offset())
    }

    /// Monday through Sunday of the week before the one containing `date`
    pub fn previous_week_of(date: NaiveDate, offset: FixedOffset) -> Result<Self, ReportError> {
        let days_back = u64::from(date.weekday().num_days_from_monday()) + 7;
        let monday = date
            .checked_sub_days(Days::new(days_back))
            .ok_or_else(|| out_of_range(date))?;
        let sunday = monday
            .checked_add_days(Days::new(6))
            .ok_or_else(|| out_of_range(date))?;
        Ok(Self {
            start: start_of_day(monday, offset)?,
            end: end_of_day(sunday, offset)?,
        })
    }

    /// The full calendar month `year`/`month`
    pub fn month(year: i32, month: u32, offset: FixedOffset) -> Result<Self, ReportError> {
        let invalid = || ReportError::InvalidWindow(format!("no such month: {year}-{month:02}"));
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let last = first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .ok_or_else(|| out_of_range(first))?;
        Ok(Self {
            start: start_of_day(first, offset)?,
            end: end_of_day(last, offset)?,
        })
    }

    /// The calendar month containing `now`
    pub fn containing_month(now: DateTime<FixedOffset>) -> Result<Self, ReportError> {
        Self::month(now.year(), now.month(), *now.offset())
    }

    /// Inclusive on both ends
    pub fn contains(&self, timestamp: &DateTime<FixedOffset>) -> bool {
        self.start <= *timestamp && *timestamp <= self.end
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date_naive()
    }

    pub fn offset(&self) -> FixedOffset {
        *self.start.offset()
    }

    /// `YYYY/MM/DD - YYYY/MM/DD`
    pub fn date_range_label(&self) -> String {
        format!(
            "{} - {}",
            self.start_date().format("%Y/%m/%d"),
            self.end_date().format("%Y/%m/%d")
        )
    }

    /// `YYYY/MM` of the window start
    pub fn month_label(&self) -> String {
        self.start_date().format("%Y/%m").to_string()
    }
}
