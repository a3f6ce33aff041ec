//! Deterministic-timer lighting load: dusk to bedtime, jittered daily.

use crate::calendar::{CalendarTime, MINUTES_PER_DAY, SUNSET_HOUR};
use crate::rng::RandomSource;
use crate::sim::clock::Minutes;

/// A light that switches on around dusk and off around bedtime.
///
/// Dusk follows the monthly sunset hour; both dusk and the configured
/// bedtime get a Gaussian jitter, redrawn for each day, so evenings are
/// never identical. The bulb is sampled minute-by-minute against a
/// precomputed next toggle time.
#[derive(Debug, Clone)]
pub struct LightBulb {
    rated_kw: f64,
    bedtime_hour: f64,
    jitter_std_hour: f64,
    lit: bool,
    next_toggle: Minutes,
}

impl LightBulb {
    /// Creates a bulb that is off and armed for the next dusk.
    ///
    /// # Panics
    ///
    /// Panics if `rated_kw` is negative or `bedtime_hour` is outside
    /// `[0, 24)`.
    pub fn new(
        rated_kw: f64,
        bedtime_hour: f64,
        jitter_std_hour: f64,
        start: Minutes,
        rng: &mut dyn RandomSource,
    ) -> Self {
        assert!(rated_kw >= 0.0);
        assert!((0.0..24.0).contains(&bedtime_hour));

        let mut bulb = Self {
            rated_kw,
            bedtime_hour,
            jitter_std_hour: jitter_std_hour.max(0.0),
            lit: false,
            next_toggle: 0.0,
        };
        bulb.next_toggle = bulb.next_dusk(start, rng);
        bulb
    }

    fn next_dusk(&self, now: Minutes, rng: &mut dyn RandomSource) -> Minutes {
        let cal = CalendarTime::at(now);
        let dusk_hour = SUNSET_HOUR[cal.month] + rng.normal(0.0, self.jitter_std_hour);
        let mut dusk = cal.day_start() + dusk_hour * 60.0;
        if dusk <= now {
            // Today's dusk already passed; use tomorrow's sunset table entry.
            let tomorrow = CalendarTime::at(cal.day_start() + MINUTES_PER_DAY);
            let dusk_hour = SUNSET_HOUR[tomorrow.month] + rng.normal(0.0, self.jitter_std_hour);
            dusk = tomorrow.day_start() + dusk_hour * 60.0;
        }
        dusk
    }

    fn next_bedtime(&self, now: Minutes, rng: &mut dyn RandomSource) -> Minutes {
        let cal = CalendarTime::at(now);
        let hour = self.bedtime_hour + rng.normal(0.0, self.jitter_std_hour);
        let mut bedtime = cal.day_start() + hour * 60.0;
        if bedtime <= now {
            bedtime += MINUTES_PER_DAY;
        }
        bedtime
    }

    /// Advances the bulb state to `now` (called once per minute).
    pub fn tick(&mut self, now: Minutes, rng: &mut dyn RandomSource) {
        if now < self.next_toggle {
            return;
        }
        if self.lit {
            self.lit = false;
            self.next_toggle = self.next_dusk(now, rng);
        } else {
            self.lit = true;
            self.next_toggle = self.next_bedtime(now, rng);
        }
    }

    /// Instantaneous power draw in kW.
    pub fn power_kw(&self) -> f64 {
        if self.lit { self.rated_kw } else { 0.0 }
    }

    /// Whether the bulb is currently lit.
    pub fn is_lit(&self) -> bool {
        self.lit
    }
}
