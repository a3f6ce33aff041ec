//! Stochastic appliance duty-cycle model.

use crate::rng::RandomSource;

/// A household appliance driven by a leaky-integrator duty-cycle model.
///
/// Every minute the integrator accumulates the hourly activation
/// probability and, while the appliance is on, leaks one unit. The
/// appliance switches on when the integrator exceeds a randomized upper
/// threshold and off when it falls below a randomized lower threshold;
/// each transition redraws the opposite threshold. The long-run fraction
/// of active minutes converges to the table probability while the
/// randomized thresholds damp rapid toggling.
#[derive(Debug, Clone)]
pub struct Appliance {
    name: String,
    rated_kw: f64,
    avg_on_min: f64,
    hourly_prob: [f64; 24],
    active: bool,
    integrator: f64,
    on_threshold: f64,
    off_threshold: f64,
}

impl Appliance {
    /// Creates an appliance with freshly drawn thresholds.
    ///
    /// # Panics
    ///
    /// Panics if `rated_kw` is negative, `avg_on_min` is not positive, or
    /// any probability lies outside `[0, 1]`.
    pub fn new(
        name: impl Into<String>,
        rated_kw: f64,
        avg_on_min: f64,
        hourly_prob: [f64; 24],
        rng: &mut dyn RandomSource,
    ) -> Self {
        assert!(rated_kw >= 0.0);
        assert!(avg_on_min > 0.0);
        assert!(hourly_prob.iter().all(|p| (0.0..=1.0).contains(p)));

        let on_threshold = rng.uniform(0.0, avg_on_min);
        let off_threshold = rng.uniform(-avg_on_min, 0.0);
        Self {
            name: name.into(),
            rated_kw,
            avg_on_min,
            hourly_prob,
            active: false,
            integrator: 0.0,
            on_threshold,
            off_threshold,
        }
    }

    /// Advances the duty-cycle state by one minute.
    pub fn tick(&mut self, hour_of_day: usize, rng: &mut dyn RandomSource) {
        self.integrator += self.hourly_prob[hour_of_day % 24];
        if self.active {
            self.integrator -= 1.0;
        }

        if !self.active && self.integrator > self.on_threshold {
            self.active = true;
            self.off_threshold = rng.uniform(-self.avg_on_min, 0.0);
        } else if self.active && self.integrator < self.off_threshold {
            self.active = false;
            self.on_threshold = rng.uniform(0.0, self.avg_on_min);
        }
    }

    /// Instantaneous power draw in kW.
    pub fn power_kw(&self) -> f64 {
        if self.active { self.rated_kw } else { 0.0 }
    }

    /// Whether the appliance is currently on.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Appliance name (for reporting).
    pub fn name(&self) -> &str {
        &self.name
    }
}
