use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::day::LocalDay;
use crate::error::ValidationError;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A displayed calendar month. `month` is 1-12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, ValidationError> {
        if !(1..=12).contains(&month) || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(ValidationError::InvalidMonth(format!("{year}-{month:02}")));
        }
        Ok(Self { year, month })
    }

    pub fn of(day: LocalDay) -> Self {
        Self {
            year: day.year(),
            month: day.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn name(&self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }

    pub fn first_day(&self) -> LocalDay {
        // Constructors guarantee day 1 of this month exists.
        LocalDay::from_ymd(self.year, self.month, 1)
            .unwrap_or_else(|| LocalDay::new(NaiveDate::MIN))
    }

    pub fn last_day(&self) -> LocalDay {
        self.next().first_day().pred()
    }

    /// Number of days, from calendar arithmetic (leap years included).
    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    /// Blank cells before day 1 in a Sunday-first week grid.
    pub fn leading_blanks(&self) -> u32 {
        self.first_day().weekday_from_sunday()
    }

    pub fn contains(&self, day: LocalDay) -> bool {
        day.year() == self.year && day.month() == self.month
    }

    pub fn days(&self) -> impl Iterator<Item = LocalDay> {
        let first = self.first_day();
        (0..self.days_in_month()).map(move |i| first.add_days(i64::from(i)))
    }

    pub fn next(&self) -> Self {
        self.shift(1)
    }

    pub fn previous(&self) -> Self {
        self.shift(-1)
    }

    /// Move by `months`, rolling the year over in either direction.
    pub fn shift(&self, months: i32) -> Self {
        let index = i64::from(self.year) * 12 + i64::from(self.month - 1) + i64::from(months);
        let year = index.div_euclid(12);
        let month = index.rem_euclid(12) as u32 + 1;
        match i32::try_from(year).ok().and_then(|y| Self::new(y, month).ok()) {
            Some(shifted) => shifted,
            None => *self,
        }
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidMonth(input.to_string());
        let (year, month) = input.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(s: &str) -> YearMonth {
        YearMonth::parse(s).unwrap()
    }

    #[test]
    fn days_in_month_follows_calendar() {
        assert_eq!(ym("2024-02").days_in_month(), 29);
        assert_eq!(ym("2023-02").days_in_month(), 28);
        assert_eq!(ym("1900-02").days_in_month(), 28);
        assert_eq!(ym("2000-02").days_in_month(), 29);
        assert_eq!(ym("2024-04").days_in_month(), 30);
        assert_eq!(ym("2024-12").days_in_month(), 31);
    }

    #[test]
    fn navigation_rolls_over_years() {
        assert_eq!(ym("2024-12").next(), ym("2025-01"));
        assert_eq!(ym("2024-01").previous(), ym("2023-12"));
        assert_eq!(ym("2024-03").shift(-15), ym("2022-12"));
        assert_eq!(ym("2024-03").shift(22), ym("2026-01"));
    }

    #[test]
    fn leading_blanks_match_weekday_of_first() {
        // 2024-03-01 was a Friday, 2024-09-01 a Sunday.
        assert_eq!(ym("2024-03").leading_blanks(), 5);
        assert_eq!(ym("2024-09").leading_blanks(), 0);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(YearMonth::parse("2024-13").is_err());
        assert!(YearMonth::parse("2024-3").is_err());
        assert!(YearMonth::parse("March 2024").is_err());
        assert_eq!(ym("2024-03").to_string(), "2024-03");
        assert_eq!(ym("2024-03").name(), "March");
    }
}
