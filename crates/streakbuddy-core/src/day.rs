//! Canonical local-day type.
//!
//! Every comparison, persisted key and arithmetic step goes through
//! [`LocalDay`]. The text form is always `YYYY-MM-DD`.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

const ISO_FORMAT: &str = "%Y-%m-%d";
const LEGACY_FORMAT: &str = "%d-%m-%Y";

/// A calendar day with no time component, in the user's local timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalDay(NaiveDate);

impl LocalDay {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Build from year, month (1-12) and day of month.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Today according to the system's local timezone.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// Parse the canonical `YYYY-MM-DD` form. Nothing else is accepted.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        // chrono accepts unpadded fields; the persisted form is always padded.
        if trimmed.len() != 10 {
            return Err(ValidationError::InvalidDay(input.to_string()));
        }
        NaiveDate::parse_from_str(trimmed, ISO_FORMAT)
            .map(Self)
            .map_err(|_| ValidationError::InvalidDay(input.to_string()))
    }

    /// Parse either the canonical form or the legacy `DD-MM-YYYY` form
    /// written by older browser builds. Only used when importing.
    pub fn parse_legacy(input: &str) -> Result<Self, ValidationError> {
        Self::parse(input).or_else(|_| {
            let trimmed = input.trim();
            if trimmed.len() != 10 {
                return Err(ValidationError::InvalidDay(input.to_string()));
            }
            NaiveDate::parse_from_str(trimmed, LEGACY_FORMAT)
                .map(Self)
                .map_err(|_| ValidationError::InvalidDay(input.to_string()))
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// The day before. Saturates at the minimum representable date.
    pub fn pred(&self) -> Self {
        self.0.pred_opt().map(Self).unwrap_or(*self)
    }

    /// The day after. Saturates at the maximum representable date.
    pub fn succ(&self) -> Self {
        self.0.succ_opt().map(Self).unwrap_or(*self)
    }

    /// Shift by a signed number of days, clamped to
    /// `NaiveDate::MIN..=NaiveDate::MAX`.
    pub fn add_days(&self, days: i64) -> Self {
        let step = chrono::Days::new(days.unsigned_abs());
        let shifted = if days >= 0 {
            self.0.checked_add_days(step).unwrap_or(NaiveDate::MAX)
        } else {
            self.0.checked_sub_days(step).unwrap_or(NaiveDate::MIN)
        };
        Self(shifted)
    }

    /// Signed day difference `self - other`.
    pub fn days_since(&self, other: LocalDay) -> i64 {
        (self.0 - other.0).num_days()
    }

    /// Weekday index with Sunday = 0.
    pub fn weekday_from_sunday(&self) -> u32 {
        self.0.weekday().num_days_from_sunday()
    }
}

impl From<NaiveDate> for LocalDay {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for LocalDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(ISO_FORMAT))
    }
}

impl FromStr for LocalDay {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for LocalDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LocalDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
