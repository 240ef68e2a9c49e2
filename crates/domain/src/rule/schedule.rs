//! Schedule: when a rule fires.
//!
//! Calendar schedules (`daily`, `weekly`, `monthly`) match on the exact
//! minute, evaluated in a fixed UTC offset. `custom` schedules fire every
//! `interval_minutes` since the last execution, and immediately when the
//! rule has never run.

use std::fmt;

use chrono::{Datelike, Days, Duration, FixedOffset, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::time::Timestamp;

/// How far ahead the next calendar slot is searched for.
const MAX_LOOKAHEAD_DAYS: u64 = 400;

/// The recurrence pattern of a [`Schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleKind {
    Daily,
    Weekly,
    Monthly,
    Custom,
}

impl ScheduleKind {
    /// Return the snake-case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for ScheduleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wall-clock time of day at minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
}

impl TimeOfDay {
    #[must_use]
    pub fn new(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }

    fn is_valid(self) -> bool {
        self.hour < 24 && self.minute < 60
    }

    fn matches<T: Timelike>(self, time: &T) -> bool {
        time.hour() == u32::from(self.hour) && time.minute() == u32::from(self.minute)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// When and how often a rule fires.
///
/// Which optional fields are required depends on [`kind`](Self::kind);
/// see [`Schedule::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub kind: ScheduleKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<TimeOfDay>,
    /// 0 = Sunday … 6 = Saturday.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_minutes: Option<u32>,
}

impl Schedule {
    /// Every day at `time`.
    #[must_use]
    pub fn daily(time: TimeOfDay) -> Self {
        Self {
            kind: ScheduleKind::Daily,
            time_of_day: Some(time),
            day_of_week: None,
            day_of_month: None,
            interval_minutes: None,
        }
    }

    /// Every week on `day_of_week` (0 = Sunday) at `time`.
    #[must_use]
    pub fn weekly(time: TimeOfDay, day_of_week: u8) -> Self {
        Self {
            kind: ScheduleKind::Weekly,
            day_of_week: Some(day_of_week),
            ..Self::daily(time)
        }
    }

    /// Every month on `day_of_month` at `time`.
    #[must_use]
    pub fn monthly(time: TimeOfDay, day_of_month: u8) -> Self {
        Self {
            kind: ScheduleKind::Monthly,
            day_of_month: Some(day_of_month),
            ..Self::daily(time)
        }
    }

    /// Every `interval_minutes` since the last execution.
    #[must_use]
    pub fn custom(interval_minutes: u32) -> Self {
        Self {
            kind: ScheduleKind::Custom,
            time_of_day: None,
            day_of_week: None,
            day_of_month: None,
            interval_minutes: Some(interval_minutes),
        }
    }

    /// Check that the fields required by [`kind`](Self::kind) are present
    /// and in range.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.kind == ScheduleKind::Custom {
            return match self.interval_minutes {
                Some(minutes) if minutes > 0 => Ok(()),
                _ => Err(ValidationError::InvalidInterval),
            };
        }

        let time = self.time_of_day.ok_or(ValidationError::MissingTimeOfDay {
            kind: self.kind.as_str(),
        })?;
        if !time.is_valid() {
            return Err(ValidationError::InvalidTimeOfDay {
                hour: time.hour,
                minute: time.minute,
            });
        }

        match self.kind {
            ScheduleKind::Weekly => match self.day_of_week {
                None => Err(ValidationError::MissingDayOfWeek),
                Some(day) if day > 6 => Err(ValidationError::InvalidDayOfWeek(day)),
                Some(_) => Ok(()),
            },
            ScheduleKind::Monthly => match self.day_of_month {
                None => Err(ValidationError::MissingDayOfMonth),
                Some(day) if !(1..=31).contains(&day) => {
                    Err(ValidationError::InvalidDayOfMonth(day))
                }
                Some(_) => Ok(()),
            },
            ScheduleKind::Daily | ScheduleKind::Custom => Ok(()),
        }
    }

    /// Decide whether the schedule is due at `now`.
    ///
    /// Calendar kinds compare hour, minute, weekday and day of month in
    /// `offset`, and are not due twice within the same minute. An incomplete
    /// schedule is never due.
    #[must_use]
    pub fn is_due(&self, now: Timestamp, last: Option<Timestamp>, offset: FixedOffset) -> bool {
        if self.kind == ScheduleKind::Custom {
            return match (self.interval_minutes, last) {
                (Some(0) | None, _) => false,
                (Some(_), None) => true,
                (Some(interval), Some(last)) => {
                    (now - last).num_minutes() >= i64::from(interval)
                }
            };
        }

        let Some(time) = self.time_of_day else {
            return false;
        };
        let local = now.with_timezone(&offset);
        if !time.matches(&local) {
            return false;
        }
        if last.is_some_and(|last| same_minute(last, now)) {
            return false;
        }
        self.matches_day(local.date_naive())
    }

    /// Compute the next execution instant strictly after `reference`.
    ///
    /// For `custom` schedules this is `last + interval`, or `reference`
    /// itself when the rule has never run. Returns `None` when the schedule
    /// is incomplete.
    #[must_use]
    pub fn next_after(
        &self,
        reference: Timestamp,
        last: Option<Timestamp>,
        offset: FixedOffset,
    ) -> Option<Timestamp> {
        if self.kind == ScheduleKind::Custom {
            let interval = self.interval_minutes.filter(|m| *m > 0)?;
            return Some(match last {
                Some(last) => last + Duration::minutes(i64::from(interval)),
                None => reference,
            });
        }

        let time = self.time_of_day.filter(|t| t.is_valid())?;
        let local = reference.with_timezone(&offset);
        let today = local.date_naive();

        (0..=MAX_LOOKAHEAD_DAYS)
            .filter_map(|n| today.checked_add_days(Days::new(n)))
            .filter(|date| self.matches_day(*date))
            .filter_map(|date| {
                let naive = date.and_hms_opt(u32::from(time.hour), u32::from(time.minute), 0)?;
                offset.from_local_datetime(&naive).single()
            })
            .find(|candidate| *candidate > local)
            .map(|candidate| candidate.with_timezone(&Utc))
    }

    fn matches_day(&self, date: chrono::NaiveDate) -> bool {
        match self.kind {
            ScheduleKind::Daily | ScheduleKind::Custom => true,
            ScheduleKind::Weekly => self
                .day_of_week
                .is_some_and(|day| date.weekday().num_days_from_sunday() == u32::from(day)),
            ScheduleKind::Monthly => self
                .day_of_month
                .is_some_and(|day| date.day() == u32::from(day)),
        }
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.time_of_day) {
            (ScheduleKind::Custom, _) => {
                write!(f, "custom(every {}m)", self.interval_minutes.unwrap_or(0))
            }
            (kind, Some(time)) => write!(f, "{kind}({time})"),
            (kind, None) => write!(f, "{kind}(?)"),
        }
    }
}

fn same_minute(a: Timestamp, b: Timestamp) -> bool {
    a.timestamp().div_euclid(60) == b.timestamp().div_euclid(60)
}
