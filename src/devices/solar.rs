//! Weather- and time-of-day-driven solar generator process.

use crate::calendar::{CalendarTime, DAYS_IN_MONTH, SUNRISE_HOUR, SUNSET_HOUR, day_length_hours};
use crate::grid::Grid;
use crate::rng::{RandomSource, SimRng};
use crate::sim::clock::Minutes;
use crate::sim::process::{Command, Process};

/// Recompute interval for the solar readout.
const TICK_MINUTES: Minutes = 5.0;

/// Panel output derating from cell temperature, per month (cold is good).
const TEMP_DERATING: [f64; 12] = [
    1.00, 1.00, 0.98, 0.95, 0.92, 0.88, 0.86, 0.87, 0.92, 0.96, 0.99, 1.00,
];

/// Seasonal irradiance-quality coefficient, per month.
const SEASONAL_COEFF: [f64; 12] = [
    0.35, 0.45, 0.60, 0.75, 0.85, 0.92, 0.95, 0.90, 0.75, 0.55, 0.38, 0.30,
];

/// Average monthly sunshine hours (temperate-climate long-term averages).
const SUNSHINE_HOURS: [f64; 12] = [
    50.0, 72.0, 125.0, 168.0, 215.0, 220.0, 226.0, 212.0, 161.0, 112.0, 54.0, 46.0,
];

/// Output multiplier bounds for an overcast day.
const CLOUD_MULT_MIN: f64 = 0.05;
const CLOUD_MULT_MAX: f64 = 0.65;

/// A rooftop PV system recomputing its output every five minutes.
///
/// Clear-sky output is a cosine arc between the month's sunrise and
/// sunset, scaled by temperature derating, a seasonal coefficient
/// interpolated around mid-month, and panel aging. Weather enters as a
/// monthly cloudy-day calendar: the days a month lacks sunshine for are
/// drawn without replacement, and each cloudy day gets one smoothed
/// random output multiplier held constant through the day.
///
/// Sole writer of the `solar_kw` readout.
pub struct SolarPanel {
    installed_kw: f64,
    deterioration_rate: f64,
    rng: SimRng,
    /// `(year, month)` the current cloudy-day calendar was drawn for.
    calendar_key: Option<(u64, usize)>,
    cloudy: [bool; 31],
    /// `(absolute day, multiplier)` for the current cloudy day.
    cloud_day: Option<(u64, f64)>,
}

impl SolarPanel {
    /// Creates a panel.
    ///
    /// # Panics
    ///
    /// Panics if `installed_kw` is negative or `deterioration_rate` is
    /// outside `[0, 1]`.
    pub fn new(installed_kw: f64, deterioration_rate: f64, rng: SimRng) -> Self {
        assert!(installed_kw >= 0.0);
        assert!((0.0..=1.0).contains(&deterioration_rate));
        Self {
            installed_kw,
            deterioration_rate,
            rng,
            calendar_key: None,
            cloudy: [false; 31],
            cloud_day: None,
        }
    }

    /// Piecewise-linear seasonal coefficient: interpolates toward the
    /// previous month before mid-month and toward the next month after.
    fn seasonal_coefficient(month: usize, day_of_month: u32) -> f64 {
        let days = DAYS_IN_MONTH[month] as f64;
        let mid = days / 2.0;
        let day = day_of_month as f64;
        if day >= mid {
            let next = (month + 1) % 12;
            let frac = (day - mid) / days;
            SEASONAL_COEFF[month] * (1.0 - frac) + SEASONAL_COEFF[next] * frac
        } else {
            let prev = (month + 11) % 12;
            let frac = (mid - day) / days;
            SEASONAL_COEFF[month] * (1.0 - frac) + SEASONAL_COEFF[prev] * frac
        }
    }

    /// Number of cloudy days to draw for a month.
    fn cloudy_day_count(month: usize) -> usize {
        let days = DAYS_IN_MONTH[month] as f64;
        let expected_sunny = SUNSHINE_HOURS[month] / day_length_hours(month);
        (days - expected_sunny).round().clamp(0.0, days) as usize
    }

    /// Redraws the cloudy-day calendar when a new month begins.
    fn refresh_cloudy_calendar(&mut self, cal: &CalendarTime) {
        let year = (cal.elapsed_days / 365.0) as u64;
        let key = (year, cal.month);
        if self.calendar_key == Some(key) {
            return;
        }
        self.cloudy = [false; 31];
        let count = Self::cloudy_day_count(cal.month);
        for day in self.rng.distinct_days(DAYS_IN_MONTH[cal.month] as usize, count) {
            self.cloudy[day] = true;
        }
        self.calendar_key = Some(key);
    }

    /// Output multiplier for `cal`'s day: 1 on sunny days, the day's held
    /// smoothed draw on cloudy days.
    fn weather_multiplier(&mut self, cal: &CalendarTime) -> f64 {
        if !self.cloudy[(cal.day_of_month - 1) as usize] {
            return 1.0;
        }
        let absolute_day = cal.elapsed_days as u64;
        if let Some((day, mult)) = self.cloud_day
            && day == absolute_day
        {
            return mult;
        }
        // Mean of two uniform draws: smoothed toward the middle of the band.
        let a = self.rng.uniform(CLOUD_MULT_MIN, CLOUD_MULT_MAX);
        let b = self.rng.uniform(CLOUD_MULT_MIN, CLOUD_MULT_MAX);
        let mult = (a + b) / 2.0;
        self.cloud_day = Some((absolute_day, mult));
        mult
    }

    /// Current generation in kW at virtual time `now`.
    pub fn power_kw(&mut self, now: Minutes) -> f64 {
        let cal = CalendarTime::at(now);
        self.refresh_cloudy_calendar(&cal);

        let sunrise = SUNRISE_HOUR[cal.month];
        let sunset = SUNSET_HOUR[cal.month];
        if cal.hour < sunrise || cal.hour > sunset {
            return 0.0;
        }

        let midday = (sunrise + sunset) / 2.0;
        let arc = ((cal.hour - midday) * std::f64::consts::PI / (sunset - sunrise)).cos();

        let aging = 1.0 - self.deterioration_rate * cal.elapsed_days / 365.0;
        let efficiency = TEMP_DERATING[cal.month]
            * Self::seasonal_coefficient(cal.month, cal.day_of_month)
            * aging.max(0.0);

        let kw = efficiency * self.installed_kw * arc * self.weather_multiplier(&cal);
        kw.max(0.0)
    }
}

impl Process<Grid> for SolarPanel {
    fn resume(&mut self, now: Minutes, grid: &mut Grid) -> Command {
        let kw = self.power_kw(now);
        grid.readouts.publish_solar_kw(kw);
        Command::Wait(TICK_MINUTES)
    }

    fn name(&self) -> &'static str {
        "solar"
    }
}
