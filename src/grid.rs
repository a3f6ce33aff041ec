//! Shared readouts and the simulation world passed to every process.

use crate::devices::ev::Ev;
use crate::devices::meter::SampleSeries;

/// Shared power readouts, one writer per field.
///
/// The solar process is the sole writer of `solar_kw`; the household
/// process is the sole writer of `load_kw`; the meter only reads. The
/// scheduler resumes one process at a time, so no further synchronization
/// is needed.
#[derive(Debug, Clone, Default)]
pub struct Readouts {
    solar_kw: f64,
    load_kw: f64,
}

impl Readouts {
    /// Publishes the current solar generation (solar process only).
    pub fn publish_solar_kw(&mut self, kw: f64) {
        self.solar_kw = kw;
    }

    /// Publishes the current household draw (household process only).
    pub fn publish_load_kw(&mut self, kw: f64) {
        self.load_kw = kw;
    }

    /// Current solar generation in kW.
    pub fn solar_kw(&self) -> f64 {
        self.solar_kw
    }

    /// Current household draw in kW.
    pub fn load_kw(&self) -> f64 {
        self.load_kw
    }
}

/// The world handed to domain processes: shared readouts, the EV, and
/// the recorded sample series.
///
/// The meter is the sole caller of the EV's state-mutating exchange
/// operations; the commute process only toggles availability and burns
/// trip energy.
pub struct Grid {
    /// Shared power readouts.
    pub readouts: Readouts,
    /// The EV battery and its exchange contract.
    pub ev: Ev,
    /// Recorded meter samples, pre-sized at start.
    pub series: SampleSeries,
}

impl Grid {
    /// Creates a world with an empty series of the given fixed capacity.
    pub fn new(ev: Ev, series_capacity: usize) -> Self {
        Self {
            readouts: Readouts::default(),
            ev,
            series: SampleSeries::new(series_capacity),
        }
    }
}
