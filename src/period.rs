// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Statement windows.
//!
//! Monthly windows run from the first to the last calendar day of a month.
//! Weekly windows follow the Friday-to-Thursday fiscal week: a reference
//! instant on a Friday opens a new week on that same day.

use crate::errors::PeriodError;
use chrono::{Datelike, Days, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const FRIDAY: u32 = 5; // days from Sunday

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Weekly,
    Monthly,
    Custom,
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReportKind::Weekly => "weekly",
            ReportKind::Monthly => "monthly",
            ReportKind::Custom => "custom",
        })
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" | "week" => Ok(ReportKind::Weekly),
            "monthly" | "month" => Ok(ReportKind::Monthly),
            "custom" => Ok(ReportKind::Custom),
            other => Err(format!("Unknown report kind '{}' (use weekly|monthly|custom)", other)),
        }
    }
}

/// Where an instant falls relative to a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Before,
    Within,
    After,
}

/// A resolved statement window. Both `start` and `end` are inclusive;
/// `end` is the last millisecond of the final day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub kind: ReportKind,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub title: String,
    pub opening_label: String,
    pub closing_label: String,
}

impl Period {
    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date()
    }

    /// First instant after the window. `None` only at the end of the calendar.
    fn end_exclusive(&self) -> Option<NaiveDateTime> {
        self.end.checked_add_signed(Duration::milliseconds(1))
    }

    pub fn classify(&self, instant: NaiveDateTime) -> Placement {
        if instant < self.start {
            return Placement::Before;
        }
        match self.end_exclusive() {
            Some(next) if instant >= next => Placement::After,
            _ => Placement::Within,
        }
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.classify(instant) == Placement::Within
    }

    /// The window of the same kind that starts right after this one.
    pub fn following(&self) -> Result<Period, PeriodError> {
        let next_start = self.end_exclusive().ok_or(PeriodError::OutOfRange)?;
        match self.kind {
            ReportKind::Weekly | ReportKind::Monthly => Ok(resolve_period(self.kind, next_start)),
            ReportKind::Custom => {
                let span = (self.end_date() - self.start_date()).num_days() as u64;
                let from = next_start.date();
                let to = from
                    .checked_add_days(Days::new(span))
                    .ok_or(PeriodError::OutOfRange)?;
                resolve_range(from, to)
            }
        }
    }
}

/// Resolve the weekly or monthly window containing `reference`.
///
/// `ReportKind::Custom` has no canonical window and resolves to the single
/// day containing `reference`.
pub fn resolve_period(kind: ReportKind, reference: NaiveDateTime) -> Period {
    let day = reference.date();
    match kind {
        ReportKind::Monthly => monthly(day),
        ReportKind::Weekly => weekly(day),
        ReportKind::Custom => custom(day, day),
    }
}

/// An ad-hoc window covering `from` through `to`, both whole days.
pub fn resolve_range(from: NaiveDate, to: NaiveDate) -> Result<Period, PeriodError> {
    if from > to {
        return Err(PeriodError::InvertedRange { from, to });
    }
    Ok(custom(from, to))
}

fn monthly(day: NaiveDate) -> Period {
    let first = day.with_day(1).unwrap_or(day);
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .unwrap_or(NaiveDate::MAX);
    let prev_month_end = previous_day(first);
    Period {
        kind: ReportKind::Monthly,
        start: start_of_day(first),
        end: end_of_day(last),
        title: format!("Report for {}", first.format("%B %Y")),
        opening_label: format!("Balance as of {}", long_date(prev_month_end)),
        closing_label: closing_label(last),
    }
}

fn weekly(day: NaiveDate) -> Period {
    let dow = day.weekday().num_days_from_sunday();
    let since_friday = (dow + 7 - FRIDAY) % 7;
    let friday = day
        .checked_sub_days(Days::new(since_friday as u64))
        .unwrap_or(NaiveDate::MIN);
    let thursday = friday
        .checked_add_days(Days::new(6))
        .unwrap_or(NaiveDate::MAX);
    Period {
        kind: ReportKind::Weekly,
        start: start_of_day(friday),
        end: end_of_day(thursday),
        title: format!(
            "Weekly report ({} \u{2013} {})",
            friday.format("%-d %b"),
            thursday.format("%-d %b %Y")
        ),
        opening_label: format!(
            "Balance through Thursday, {}",
            long_date(previous_day(friday))
        ),
        closing_label: closing_label(thursday),
    }
}

fn custom(from: NaiveDate, to: NaiveDate) -> Period {
    Period {
        kind: ReportKind::Custom,
        start: start_of_day(from),
        end: end_of_day(to),
        title: format!(
            "Report ({} \u{2013} {})",
            from.format("%-d %b %Y"),
            to.format("%-d %b %Y")
        ),
        opening_label: format!("Balance as of {}", long_date(previous_day(from))),
        closing_label: closing_label(to),
    }
}

fn closing_label(last: NaiveDate) -> String {
    format!("Closing balance as of {}", long_date(last))
}

fn long_date(d: NaiveDate) -> String {
    d.format("%-d %B %Y").to_string()
}

fn previous_day(d: NaiveDate) -> NaiveDate {
    d.pred_opt().unwrap_or(d)
}

fn start_of_day(d: NaiveDate) -> NaiveDateTime {
    d.and_time(NaiveTime::MIN)
}

fn end_of_day(d: NaiveDate) -> NaiveDateTime {
    d.and_hms_milli_opt(23, 59, 59, 999)
        .unwrap_or_else(|| start_of_day(d))
}
