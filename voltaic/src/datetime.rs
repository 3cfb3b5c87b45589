//! Calendar and duration values with 100 nanosecond resolution.
//!
//! All dates use the proleptic Gregorian calendar and range from `0001-01-01T00:00:00` to
//! `9999-12-31T23:59:59.9999999`.
use std::fmt;

use crate::RangeError;

/// Number of ticks in one second. A tick is 100 nanoseconds.
pub const TICKS_PER_SECOND: u64 = 10_000_000;
/// Number of ticks in one minute.
pub const TICKS_PER_MINUTE: u64 = 60 * TICKS_PER_SECOND;
/// Number of ticks in one hour.
pub const TICKS_PER_HOUR: u64 = 60 * TICKS_PER_MINUTE;
/// Number of ticks in one day.
pub const TICKS_PER_DAY: u64 = 24 * TICKS_PER_HOUR;

const DAYS_TO_10000: u64 = 3_652_059;

// Days from 0000-03-01 to 0001-01-01, the origin of the era based conversion below.
const ERA_OFFSET: u64 = 306;
const DAYS_PER_ERA: u64 = 146_097;

fn is_leap_year(year: u32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Days since 0001-01-01, for a validated date.
fn days_from_civil(year: u32, month: u32, day: u32) -> u64 {
    let year = u64::from(year) - u64::from(month <= 2);
    let era = year / 400;
    let year_of_era = year - era * 400;
    let shifted_month = u64::from(if month > 2 { month - 3 } else { month + 9 });
    let day_of_year = (153 * shifted_month + 2) / 5 + u64::from(day) - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * DAYS_PER_ERA + day_of_era - ERA_OFFSET
}

/// Inverse of [`days_from_civil`].
fn civil_from_days(days: u64) -> (u32, u32, u32) {
    let days = days + ERA_OFFSET;
    let era = days / DAYS_PER_ERA;
    let day_of_era = days - era * DAYS_PER_ERA;
    let year_of_era =
        (day_of_era - day_of_era / 1460 + day_of_era / 36524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let shifted_month = (5 * day_of_year + 2) / 153;
    let day = day_of_year - (153 * shifted_month + 2) / 5 + 1;
    let month = if shifted_month < 10 {
        shifted_month + 3
    } else {
        shifted_month - 9
    };
    let year = year_of_era + era * 400 + u64::from(month <= 2);
    (year as u32, month as u32, day as u32)
}

/// A point in time in UTC.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DateTime {
    ticks: u64,
}

impl DateTime {
    /// `0001-01-01T00:00:00`.
    pub const MIN: DateTime = DateTime { ticks: 0 };
    /// `9999-12-31T23:59:59.9999999`.
    pub const MAX: DateTime = DateTime {
        ticks: DAYS_TO_10000 * TICKS_PER_DAY - 1,
    };

    /// Creates a value from ticks elapsed since `0001-01-01T00:00:00`.
    pub fn from_ticks(ticks: u64) -> Result<Self, RangeError> {
        if ticks > Self::MAX.ticks {
            return Err(RangeError::new("date time ticks"));
        }
        Ok(DateTime { ticks })
    }

    /// Creates a value from calendar date and time of day.
    pub fn from_ymd_hms(
        year: u32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Result<Self, RangeError> {
        Self::new(year, month, day, hour, minute, second, 0)
    }

    /// Creates a value from calendar date, time of day, and sub-second ticks.
    pub fn new(
        year: u32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        fraction: u32,
    ) -> Result<Self, RangeError> {
        if !(1..=9999).contains(&year) {
            return Err(RangeError::new("year"));
        }
        if !(1..=12).contains(&month) {
            return Err(RangeError::new("month"));
        }
        if day < 1 || day > days_in_month(year, month) {
            return Err(RangeError::new("day"));
        }
        if hour > 23 {
            return Err(RangeError::new("hour"));
        }
        if minute > 59 {
            return Err(RangeError::new("minute"));
        }
        if second > 59 {
            return Err(RangeError::new("second"));
        }
        if u64::from(fraction) >= TICKS_PER_SECOND {
            return Err(RangeError::new("fraction"));
        }

        let ticks = days_from_civil(year, month, day) * TICKS_PER_DAY
            + u64::from(hour) * TICKS_PER_HOUR
            + u64::from(minute) * TICKS_PER_MINUTE
            + u64::from(second) * TICKS_PER_SECOND
            + u64::from(fraction);
        Ok(DateTime { ticks })
    }

    /// Ticks elapsed since `0001-01-01T00:00:00`.
    #[inline]
    pub fn ticks(self) -> u64 {
        self.ticks
    }

    /// The calendar date as `(year, month, day)`.
    pub fn date(self) -> (u32, u32, u32) {
        civil_from_days(self.ticks / TICKS_PER_DAY)
    }

    /// The year, `1..=9999`.
    pub fn year(self) -> u32 {
        self.date().0
    }

    /// The month, `1..=12`.
    pub fn month(self) -> u32 {
        self.date().1
    }

    /// The day of the month, `1..=31`.
    pub fn day(self) -> u32 {
        self.date().2
    }

    /// The hour, `0..=23`.
    pub fn hour(self) -> u32 {
        (self.ticks % TICKS_PER_DAY / TICKS_PER_HOUR) as u32
    }

    /// The minute, `0..=59`.
    pub fn minute(self) -> u32 {
        (self.ticks % TICKS_PER_HOUR / TICKS_PER_MINUTE) as u32
    }

    /// The second, `0..=59`.
    pub fn second(self) -> u32 {
        (self.ticks % TICKS_PER_MINUTE / TICKS_PER_SECOND) as u32
    }

    /// Ticks since the start of the current second.
    pub fn fraction(self) -> u32 {
        (self.ticks % TICKS_PER_SECOND) as u32
    }

    /// Day of the week, `0` is Sunday.
    pub fn day_of_week(self) -> u32 {
        // 0001-01-01 was a Monday.
        ((self.ticks / TICKS_PER_DAY + 1) % 7) as u32
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::write::text::display(*self, f)
    }
}

impl fmt::Debug for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::write::text::display_with(*self, crate::Format::from_symbol(b'O'), f)
    }
}

/// A local date and time together with its offset from UTC.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DateTimeOffset {
    local: DateTime,
    offset_minutes: i16,
}

impl DateTimeOffset {
    /// Largest supported offset from UTC in either direction, 14 hours.
    pub const MAX_OFFSET_MINUTES: i16 = 14 * 60;

    /// Creates a value from a local date and time and its offset from UTC in minutes.
    ///
    /// Both the offset and the corresponding UTC instant must be in range.
    pub fn new(local: DateTime, offset_minutes: i16) -> Result<Self, RangeError> {
        if offset_minutes.unsigned_abs() > Self::MAX_OFFSET_MINUTES as u16 {
            return Err(RangeError::new("utc offset"));
        }
        let value = DateTimeOffset {
            local,
            offset_minutes,
        };
        value.checked_utc().ok_or(RangeError::new("utc date time"))?;
        Ok(value)
    }

    /// A UTC instant with offset zero.
    pub fn from_utc(utc: DateTime) -> Self {
        DateTimeOffset {
            local: utc,
            offset_minutes: 0,
        }
    }

    fn checked_utc(self) -> Option<DateTime> {
        let offset = i64::from(self.offset_minutes) * TICKS_PER_MINUTE as i64;
        let ticks = (self.local.ticks as i64).checked_sub(offset)?;
        DateTime::from_ticks(u64::try_from(ticks).ok()?).ok()
    }

    /// The local date and time.
    #[inline]
    pub fn local(self) -> DateTime {
        self.local
    }

    /// Offset from UTC in minutes, positive east of Greenwich.
    #[inline]
    pub fn offset_minutes(self) -> i16 {
        self.offset_minutes
    }

    /// The same instant in UTC.
    pub fn utc(self) -> DateTime {
        // Checked on construction.
        self.checked_utc().unwrap_or(self.local)
    }
}

impl fmt::Display for DateTimeOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::write::text::display(*self, f)
    }
}

impl fmt::Debug for DateTimeOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::write::text::display_with(*self, crate::Format::from_symbol(b'O'), f)
    }
}

/// A signed duration.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeSpan {
    ticks: i64,
}

impl TimeSpan {
    /// The zero duration.
    pub const ZERO: TimeSpan = TimeSpan { ticks: 0 };
    /// The shortest representable duration, `-10675199.02:48:05.4775808`.
    pub const MIN: TimeSpan = TimeSpan { ticks: i64::MIN };
    /// The longest representable duration, `10675199.02:48:05.4775807`.
    pub const MAX: TimeSpan = TimeSpan { ticks: i64::MAX };

    /// Creates a duration of `ticks` times 100 nanoseconds.
    pub const fn from_ticks(ticks: i64) -> Self {
        TimeSpan { ticks }
    }

    /// Creates a duration from its components, which may individually be negative.
    pub fn new(
        days: i64,
        hours: i64,
        minutes: i64,
        seconds: i64,
        fraction: i64,
    ) -> Result<Self, RangeError> {
        let ticks = i128::from(days) * TICKS_PER_DAY as i128
            + i128::from(hours) * TICKS_PER_HOUR as i128
            + i128::from(minutes) * TICKS_PER_MINUTE as i128
            + i128::from(seconds) * TICKS_PER_SECOND as i128
            + i128::from(fraction);
        let ticks = i64::try_from(ticks).map_err(|_| RangeError::new("time span"))?;
        Ok(TimeSpan { ticks })
    }

    /// Length in ticks.
    #[inline]
    pub fn ticks(self) -> i64 {
        self.ticks
    }

    /// Returns `true` for durations shorter than zero.
    #[inline]
    pub fn is_negative(self) -> bool {
        self.ticks < 0
    }

    /// Whole days of the absolute duration.
    pub fn days(self) -> u64 {
        self.ticks.unsigned_abs() / TICKS_PER_DAY
    }

    /// Hours of the absolute duration, `0..=23`.
    pub fn hours(self) -> u32 {
        (self.ticks.unsigned_abs() % TICKS_PER_DAY / TICKS_PER_HOUR) as u32
    }

    /// Minutes of the absolute duration, `0..=59`.
    pub fn minutes(self) -> u32 {
        (self.ticks.unsigned_abs() % TICKS_PER_HOUR / TICKS_PER_MINUTE) as u32
    }

    /// Seconds of the absolute duration, `0..=59`.
    pub fn seconds(self) -> u32 {
        (self.ticks.unsigned_abs() % TICKS_PER_MINUTE / TICKS_PER_SECOND) as u32
    }

    /// Sub-second ticks of the absolute duration.
    pub fn fraction(self) -> u32 {
        (self.ticks.unsigned_abs() % TICKS_PER_SECOND) as u32
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::write::text::display(*self, f)
    }
}

impl fmt::Debug for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimeSpan({})", self)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn civil_round_trip() {
        for &(year, month, day) in &[
            (1, 1, 1),
            (1, 2, 28),
            (4, 2, 29),
            (1600, 2, 29),
            (1970, 1, 1),
            (2000, 3, 1),
            (2024, 12, 31),
            (9999, 12, 31),
        ] {
            let days = days_from_civil(year, month, day);
            assert_eq!(civil_from_days(days), (year, month, day));
        }
        assert_eq!(days_from_civil(1, 1, 1), 0);
        assert_eq!(days_from_civil(1970, 1, 1), 719_162);
        assert_eq!(days_from_civil(9999, 12, 31), DAYS_TO_10000 - 1);
    }

    #[test]
    fn components() -> Result<(), RangeError> {
        let value = DateTime::new(2017, 6, 12, 5, 30, 45, 7_680_000)?;
        assert_eq!(value.date(), (2017, 6, 12));
        assert_eq!(value.hour(), 5);
        assert_eq!(value.minute(), 30);
        assert_eq!(value.second(), 45);
        assert_eq!(value.fraction(), 7_680_000);
        assert_eq!(value.day_of_week(), 1);

        assert_eq!(DateTime::MAX.date(), (9999, 12, 31));
        assert_eq!(DateTime::MIN.day_of_week(), 1);
        Ok(())
    }

    #[test]
    fn invalid_components() {
        assert_matches!(
            DateTime::from_ymd_hms(2023, 2, 29, 0, 0, 0),
            Err(RangeError { component: "day" })
        );
        assert_matches!(
            DateTime::from_ymd_hms(0, 1, 1, 0, 0, 0),
            Err(RangeError { component: "year" })
        );
        assert_matches!(
            DateTime::from_ymd_hms(2000, 1, 1, 24, 0, 0),
            Err(RangeError { component: "hour" })
        );
        assert_matches!(DateTime::from_ticks(u64::MAX), Err(_));
    }

    #[test]
    fn offsets() -> Result<(), RangeError> {
        let local = DateTime::from_ymd_hms(2000, 1, 1, 1, 0, 0)?;
        let value = DateTimeOffset::new(local, 120)?;
        assert_eq!(value.utc(), DateTime::from_ymd_hms(1999, 12, 31, 23, 0, 0)?);

        assert_matches!(
            DateTimeOffset::new(local, 841),
            Err(RangeError {
                component: "utc offset"
            })
        );
        assert_matches!(
            DateTimeOffset::new(DateTime::MIN, 60),
            Err(RangeError {
                component: "utc date time"
            })
        );
        assert!(DateTimeOffset::new(DateTime::MAX, 60).is_ok());
        Ok(())
    }

    #[test]
    fn time_span_components() -> Result<(), RangeError> {
        let span = TimeSpan::new(-1, -2, -3, -4, -5)?;
        assert!(span.is_negative());
        assert_eq!(
            (span.days(), span.hours(), span.minutes(), span.seconds()),
            (1, 2, 3, 4)
        );
        assert_eq!(span.fraction(), 5);

        assert_eq!(TimeSpan::MIN.days(), 10_675_199);
        assert_matches!(TimeSpan::new(i64::MAX, 0, 0, 0, 0), Err(_));
        Ok(())
    }
}
