//! Aggregate energy accounting derived from a recorded meter series.

use std::fmt;

use crate::devices::meter::MeterSample;

const KWH_PER_MWH: f64 = 1000.0;

/// Year-level energy totals computed from the recorded samples.
///
/// All figures are energies in kWh, integrated sample-by-sample over the
/// sampling interval. Grid flows are split by sign of the net column,
/// EV flows by sign of the exchange column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyReport {
    /// Energy imported from the grid.
    pub drawn_kwh: f64,
    /// Energy exported to the grid.
    pub supplied_kwh: f64,
    /// Total solar generation.
    pub generated_kwh: f64,
    /// Total household consumption.
    pub consumed_kwh: f64,
    /// Energy charged into the EV at the meter boundary.
    pub charged_kwh: f64,
    /// Energy recovered from the EV into the household.
    pub recovered_kwh: f64,
    /// Energy the EV consumed driving.
    pub driving_kwh: f64,
}

impl EnergyReport {
    /// Integrates the sample series into energy totals.
    ///
    /// `driving_kwh` comes from the EV's monotonic driving counter; it is
    /// not visible in the meter columns.
    pub fn from_samples(samples: &[MeterSample], interval_min: f64, driving_kwh: f64) -> Self {
        let hours = interval_min / 60.0;
        let mut report = Self {
            drawn_kwh: 0.0,
            supplied_kwh: 0.0,
            generated_kwh: 0.0,
            consumed_kwh: 0.0,
            charged_kwh: 0.0,
            recovered_kwh: 0.0,
            driving_kwh,
        };
        for s in samples {
            report.generated_kwh += s.solar_kw * hours;
            report.consumed_kwh += s.load_kw * hours;
            if s.net_kw >= 0.0 {
                report.supplied_kwh += s.net_kw * hours;
            } else {
                report.drawn_kwh += -s.net_kw * hours;
            }
            if s.exchange_kw >= 0.0 {
                report.charged_kwh += s.exchange_kw * hours;
            } else {
                report.recovered_kwh += -s.exchange_kw * hours;
            }
        }
        report
    }

    /// Fraction of household consumption covered without grid imports.
    /// Zero when nothing was consumed.
    pub fn self_sufficiency(&self) -> f64 {
        if self.consumed_kwh <= 0.0 {
            return 0.0;
        }
        (1.0 - self.drawn_kwh / self.consumed_kwh).clamp(0.0, 1.0)
    }
}

impl fmt::Display for EnergyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Energy Report ===")?;
        writeln!(
            f,
            "Drawn from grid:     {:>9.3} MWh",
            self.drawn_kwh / KWH_PER_MWH
        )?;
        writeln!(
            f,
            "Supplied to grid:    {:>9.3} MWh",
            self.supplied_kwh / KWH_PER_MWH
        )?;
        writeln!(
            f,
            "Solar generated:     {:>9.3} MWh",
            self.generated_kwh / KWH_PER_MWH
        )?;
        writeln!(
            f,
            "Household consumed:  {:>9.3} MWh",
            self.consumed_kwh / KWH_PER_MWH
        )?;
        writeln!(
            f,
            "Charged into EV:     {:>9.3} MWh",
            self.charged_kwh / KWH_PER_MWH
        )?;
        writeln!(
            f,
            "Recovered from EV:   {:>9.3} MWh",
            self.recovered_kwh / KWH_PER_MWH
        )?;
        writeln!(
            f,
            "Consumed driving:    {:>9.3} MWh",
            self.driving_kwh / KWH_PER_MWH
        )?;
        write!(
            f,
            "Self-sufficiency:    {:>8.1} %",
            self.self_sufficiency() * 100.0
        )
    }
}
