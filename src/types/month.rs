//! Calendar months and the month-by-month walk used to paginate historical requests.
//!
//! The historical data service is queried one calendar month at a time. A [`Month`]
//! knows its own inclusive day span, and a [`MonthRange`] lazily yields consecutive
//! months between two bounds.

use chrono::{Datelike, Duration, NaiveDate};
use std::fmt;
use std::fmt::{Display, Formatter};

/// A single calendar month, ordered chronologically.
///
/// # Examples
///
/// ```
/// use airport_weather::Month;
/// use chrono::NaiveDate;
///
/// let feb = Month::new(2024, 2).unwrap();
/// assert_eq!(feb.first_day(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
/// assert_eq!(feb.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
/// assert_eq!(feb.to_string(), "2024-02");
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Creates a month, returning `None` if `month` is not in `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The month that contains `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    /// First day of the month.
    pub fn first_day(self) -> NaiveDate {
        // Only constructed through `new`/`containing`, so the month is always valid.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last day of the month (inclusive).
    pub fn last_day(self) -> NaiveDate {
        let days = days_in_month(self.year, self.month).unwrap_or(1);
        NaiveDate::from_ymd_opt(self.year, self.month, days).unwrap_or(NaiveDate::MAX)
    }

    /// The following calendar month.
    pub fn succ(self) -> Self {
        self.add_months(1)
    }

    /// The month `n` months earlier.
    pub fn sub_months(self, n: u32) -> Self {
        Self::from_index(self.index() - i64::from(n))
    }

    /// The month `n` months later.
    pub fn add_months(self, n: u32) -> Self {
        Self::from_index(self.index() + i64::from(n))
    }

    // Months since year 0, used for arithmetic across year boundaries.
    fn index(self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }

    fn from_index(index: i64) -> Self {
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

pub(crate) fn days_in_month(year: i32, month: u32) -> Option<u32> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let (next_month_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    let first_day_of_next_month = NaiveDate::from_ymd_opt(next_month_year, next_month, 1)?;
    let last_day_of_current_month = first_day_of_next_month - Duration::days(1);
    Some(last_day_of_current_month.day())
}

/// A lazy, chronological walk over consecutive calendar months, both ends inclusive.
///
/// # Examples
///
/// ```
/// use airport_weather::{Month, MonthRange};
///
/// let months: Vec<String> = MonthRange::new(Month::new(2023, 11).unwrap(), Month::new(2024, 2).unwrap())
///     .map(|m| m.to_string())
///     .collect();
/// assert_eq!(months, ["2023-11", "2023-12", "2024-01", "2024-02"]);
/// ```
#[derive(Debug, Clone)]
pub struct MonthRange {
    next: Option<Month>,
    last: Month,
}

impl MonthRange {
    /// Months from `first` through `last`. Empty when `first > last`.
    pub fn new(first: Month, last: Month) -> Self {
        Self {
            next: (first <= last).then_some(first),
            last,
        }
    }

    /// The lookback window ending in the month of `today` and starting in the month
    /// `years_back` years earlier. Always yields `12 * years_back + 1` months.
    pub fn lookback(today: NaiveDate, years_back: u32) -> Self {
        let last = Month::containing(today);
        let first = last.sub_months(years_back.saturating_mul(12));
        Self::new(first, last)
    }
}

impl Iterator for MonthRange {
    type Item = Month;

    fn next(&mut self) -> Option<Month> {
        let current = self.next?;
        self.next = (current < self.last).then(|| current.succ());
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.next {
            Some(next) => (self.last.index() - next.index() + 1) as usize,
            None => 0,
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MonthRange {}

impl std::iter::FusedIterator for MonthRange {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_bounds() {
        let jan = Month::new(2023, 1).unwrap();
        assert_eq!(jan.first_day(), date(2023, 1, 1));
        assert_eq!(jan.last_day(), date(2023, 1, 31));

        let feb_leap = Month::new(2024, 2).unwrap();
        assert_eq!(feb_leap.last_day(), date(2024, 2, 29));

        let feb = Month::new(2023, 2).unwrap();
        assert_eq!(feb.last_day(), date(2023, 2, 28));

        assert!(Month::new(2023, 0).is_none());
        assert!(Month::new(2023, 13).is_none());
    }

    #[test]
    fn test_month_arithmetic_crosses_years() {
        let dec = Month::new(2023, 12).unwrap();
        assert_eq!(dec.succ(), Month::new(2024, 1).unwrap());
        assert_eq!(dec.sub_months(12), Month::new(2022, 12).unwrap());
        assert_eq!(dec.sub_months(23), Month::new(2022, 1).unwrap());
        assert_eq!(dec.sub_months(24), Month::new(2021, 12).unwrap());
        assert_eq!(Month::new(2024, 1).unwrap().sub_months(1), dec);
    }

    #[test]
    fn test_lookback_month_count_matches_distinct_months() {
        let today = date(2024, 3, 15);
        for years_back in 0..=5u32 {
            let months: Vec<Month> = MonthRange::lookback(today, years_back).collect();

            // Distinct calendar months spanned by [today - years_back, today], walked day by day.
            let start = date(2024 - years_back as i32, 3, 15);
            let distinct: HashSet<Month> = start
                .iter_days()
                .take_while(|d| *d <= today)
                .map(Month::containing)
                .collect();

            assert_eq!(months.len(), distinct.len());
            assert_eq!(months.len(), 12 * years_back as usize + 1);
            assert!(months.windows(2).all(|w| w[0].succ() == w[1]));
            assert_eq!(*months.last().unwrap(), Month::containing(today));
        }
    }

    #[test]
    fn test_lookback_from_leap_day() {
        let months: Vec<Month> = MonthRange::lookback(date(2024, 2, 29), 1).collect();
        assert_eq!(months.first().copied(), Month::new(2023, 2));
        assert_eq!(months.last().copied(), Month::new(2024, 2));
        assert_eq!(months.len(), 13);
    }

    #[test]
    fn test_range_size_hint_and_empty() {
        let mut range = MonthRange::new(Month::new(2024, 1).unwrap(), Month::new(2024, 3).unwrap());
        assert_eq!(range.len(), 3);
        range.next();
        assert_eq!(range.len(), 2);

        let empty = MonthRange::new(Month::new(2024, 3).unwrap(), Month::new(2024, 1).unwrap());
        assert_eq!(empty.len(), 0);
        assert_eq!(empty.count(), 0);
    }
}
