//! Calendar decomposition of virtual time.
//!
//! The simulation year is a fixed 365-day, non-leap calendar starting on a
//! Monday. Month lengths come from a cumulative table, so month and
//! day-of-month stay consistent at month boundaries.

use crate::sim::clock::Minutes;

/// Minutes in one simulated day.
pub const MINUTES_PER_DAY: f64 = 24.0 * 60.0;

/// Days per month for the fixed non-leap simulation year.
pub const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Sunrise hour per month (fractional hours, local time).
pub const SUNRISE_HOUR: [f64; 12] = [
    8.0, 7.5, 6.5, 6.5, 5.5, 5.0, 5.5, 6.0, 7.0, 7.5, 7.5, 8.0,
];

/// Sunset hour per month (fractional hours, local time).
pub const SUNSET_HOUR: [f64; 12] = [
    16.5, 17.5, 18.5, 20.0, 20.5, 21.5, 21.0, 20.5, 19.0, 18.5, 16.5, 16.0,
];

/// First day-of-year (0-based) of each month.
const MONTH_START_DAY: [u32; 12] = {
    let mut starts = [0u32; 12];
    let mut month = 1;
    while month < 12 {
        starts[month] = starts[month - 1] + DAYS_IN_MONTH[month - 1];
        month += 1;
    }
    starts
};

/// A point of virtual time broken down into calendar fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarTime {
    /// Fractional hour of day, `[0, 24)`.
    pub hour: f64,
    /// Day of year, 0-based, `[0, 365)`.
    pub day_of_year: u32,
    /// Month index, `[0, 12)`.
    pub month: usize,
    /// Day of month, 1-based.
    pub day_of_month: u32,
    /// Day of week, `[0, 7)`, 0 = Monday.
    pub weekday: u32,
    /// Total days elapsed since simulation start (fractional), for aging.
    pub elapsed_days: f64,
}

impl CalendarTime {
    /// Decomposes a virtual time into calendar fields.
    ///
    /// # Panics
    ///
    /// Panics if `now` is negative.
    pub fn at(now: Minutes) -> Self {
        assert!(now >= 0.0, "virtual time must be non-negative: {now}");

        let total_days = (now / MINUTES_PER_DAY) as u64;
        let minute_of_day = now - total_days as f64 * MINUTES_PER_DAY;
        let day_of_year = (total_days % 365) as u32;

        let month = match MONTH_START_DAY.iter().rposition(|&start| start <= day_of_year) {
            Some(m) => m,
            None => 0,
        };
        let day_of_month = day_of_year - MONTH_START_DAY[month] + 1;

        Self {
            hour: minute_of_day / 60.0,
            day_of_year,
            month,
            day_of_month,
            weekday: (total_days % 7) as u32,
            elapsed_days: now / MINUTES_PER_DAY,
        }
    }

    /// Hour-of-day index in `[0, 24)` for hourly table lookups.
    pub fn hour_index(&self) -> usize {
        (self.hour as usize).min(23)
    }

    /// Virtual time of this day's midnight.
    pub fn day_start(&self) -> Minutes {
        (self.elapsed_days as u64) as f64 * MINUTES_PER_DAY
    }
}

/// Daylight duration for the given month, in hours.
pub fn day_length_hours(month: usize) -> f64 {
    SUNSET_HOUR[month] - SUNRISE_HOUR[month]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_of_time_is_january_first() {
        let cal = CalendarTime::at(0.0);
        assert_eq!(cal.month, 0);
        assert_eq!(cal.day_of_month, 1);
        assert_eq!(cal.day_of_year, 0);
        assert_eq!(cal.weekday, 0);
        assert_eq!(cal.hour, 0.0);
    }

    #[test]
    fn hour_wraps_within_day() {
        let cal = CalendarTime::at(25.0 * 60.0); // 1:00 on day 2
        assert_eq!(cal.hour, 1.0);
        assert_eq!(cal.day_of_year, 1);
        assert_eq!(cal.weekday, 1);
    }

    #[test]
    fn month_boundary_is_exact() {
        // Day 30 (0-based) is January 31; day 31 is February 1.
        let jan31 = CalendarTime::at(30.0 * MINUTES_PER_DAY);
        assert_eq!(jan31.month, 0);
        assert_eq!(jan31.day_of_month, 31);

        let feb1 = CalendarTime::at(31.0 * MINUTES_PER_DAY);
        assert_eq!(feb1.month, 1);
        assert_eq!(feb1.day_of_month, 1);
    }

    #[test]
    fn last_day_of_year_is_december_31() {
        let cal = CalendarTime::at(364.0 * MINUTES_PER_DAY);
        assert_eq!(cal.month, 11);
        assert_eq!(cal.day_of_month, 31);
    }

    #[test]
    fn second_year_wraps_back_to_january() {
        let cal = CalendarTime::at(365.0 * MINUTES_PER_DAY + 60.0);
        assert_eq!(cal.month, 0);
        assert_eq!(cal.day_of_month, 1);
        assert_eq!(cal.hour, 1.0);
        assert!(cal.elapsed_days > 365.0);
    }

    #[test]
    fn month_lengths_sum_to_a_year() {
        let total: u32 = DAYS_IN_MONTH.iter().sum();
        assert_eq!(total, 365);
    }

    #[test]
    fn daylight_is_positive_every_month() {
        for month in 0..12 {
            assert!(day_length_hours(month) > 0.0);
        }
    }
}
