//! Periodic metering and accounting process.

use std::fmt;

use crate::grid::Grid;
use crate::sim::clock::Minutes;
use crate::sim::process::{Command, Process};

/// Battery column value recorded while the EV reading is unknown
/// (vehicle away or inert mode). Distinct from a genuine empty battery.
pub const UNKNOWN_BATTERY_KWH: f64 = -1.0;

/// One recorded metering sample. Powers in kW, battery energy in kWh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeterSample {
    /// Household draw at sampling time.
    pub load_kw: f64,
    /// Solar generation at sampling time.
    pub solar_kw: f64,
    /// EV exchange as average power over the interval; positive into the
    /// battery, negative out of it.
    pub exchange_kw: f64,
    /// EV battery snapshot, or [`UNKNOWN_BATTERY_KWH`].
    pub battery_kwh: f64,
    /// Net power crossing the grid boundary after the EV exchange;
    /// positive = surplus exported, negative = deficit imported.
    pub net_kw: f64,
}

impl fmt::Display for MeterSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "load={:>6.3} kW  solar={:>6.3} kW  exch={:>6.3} kW  batt={:>6.2} kWh  net={:>6.3} kW",
            self.load_kw, self.solar_kw, self.exchange_kw, self.battery_kwh, self.net_kw
        )
    }
}

/// Append-only, exactly-sized record of meter samples.
#[derive(Debug, Clone)]
pub struct SampleSeries {
    samples: Vec<MeterSample>,
    capacity: usize,
}

impl SampleSeries {
    /// Creates an empty series with a fixed capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends one sample.
    ///
    /// # Panics
    ///
    /// Panics when the series is already full; the meter halts before
    /// that can happen.
    pub fn record(&mut self, sample: MeterSample) {
        assert!(
            self.samples.len() < self.capacity,
            "sample series overflow: capacity {}",
            self.capacity
        );
        self.samples.push(sample);
    }

    /// Returns `true` once the series holds `capacity` samples.
    pub fn is_full(&self) -> bool {
        self.samples.len() >= self.capacity
    }

    /// Number of recorded samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Fixed capacity set at start.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The recorded samples.
    pub fn samples(&self) -> &[MeterSample] {
        &self.samples
    }

    /// Consumes the series into its sample vector.
    pub fn into_samples(self) -> Vec<MeterSample> {
        self.samples
    }
}

/// The metering/accounting loop.
///
/// Every sampling interval it reads the shared readouts, offers the net
/// energy balance to the EV, and records what crossed the grid boundary.
/// Halts once the pre-sized series is full, which ends the run.
pub struct Meter {
    interval_min: f64,
}

impl Meter {
    /// Creates a meter with the given sampling interval.
    ///
    /// # Panics
    ///
    /// Panics if the interval is not positive.
    pub fn new(interval_min: f64) -> Self {
        assert!(interval_min > 0.0, "sampling interval must be positive");
        Self { interval_min }
    }
}

impl Process<Grid> for Meter {
    fn resume(&mut self, _now: Minutes, grid: &mut Grid) -> Command {
        if grid.series.is_full() {
            return Command::Halt;
        }

        let load_kw = grid.readouts.load_kw();
        let solar_kw = grid.readouts.solar_kw();

        // Signed energy balance over this interval: positive = surplus.
        let mut net_kwh = (solar_kw - load_kw) * self.interval_min / 60.0;
        let exchanged_kwh = grid.ev.exchange_energy(net_kwh, self.interval_min);
        net_kwh -= exchanged_kwh;

        let battery_kwh = grid.ev.battery_reading().unwrap_or(UNKNOWN_BATTERY_KWH);
        let per_hour = 60.0 / self.interval_min;
        grid.series.record(MeterSample {
            load_kw,
            solar_kw,
            exchange_kw: exchanged_kwh * per_hour,
            battery_kwh,
            net_kw: net_kwh * per_hour,
        });

        if grid.series.is_full() {
            Command::Halt
        } else {
            Command::Wait(self.interval_min)
        }
    }

    fn name(&self) -> &'static str {
        "meter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EvConfig;
    use crate::devices::ev::Ev;

    fn grid_with_mode(mode: &str, capacity: usize) -> Grid {
        let cfg = EvConfig {
            mode: mode.to_string(),
            ..EvConfig::default()
        };
        Grid::new(Ev::new(&cfg), capacity)
    }

    #[test]
    fn worked_exchange_example() {
        // 5 kW solar, 1 kW load, V2G battery at 25/50 kWh, eta_c 0.85,
        // 6 kW charger, 2-minute interval: the full surplus is absorbed.
        let mut grid = grid_with_mode("v2g", 4);
        grid.readouts.publish_solar_kw(5.0);
        grid.readouts.publish_load_kw(1.0);

        let mut meter = Meter::new(2.0);
        let command = meter.resume(0.0, &mut grid);
        assert_eq!(command, Command::Wait(2.0));

        let sample = grid.series.samples()[0];
        assert!((sample.exchange_kw - 4.0).abs() < 1e-9);
        assert!((sample.net_kw - 0.0).abs() < 1e-9);
        let battery = grid.ev.battery_reading().unwrap();
        assert!((battery - (25.0 + 0.133_333 * 0.85)).abs() < 1e-4);
    }

    #[test]
    fn conservation_holds_per_sample() {
        let mut grid = grid_with_mode("v2g", 64);
        let mut meter = Meter::new(2.0);

        let profiles = [
            (0.0, 1.2),
            (4.8, 0.3),
            (2.0, 2.0),
            (0.5, 3.5),
            (6.0, 0.1),
        ];
        let mut now = 0.0;
        for &(solar, load) in profiles.iter().cycle().take(60) {
            grid.readouts.publish_solar_kw(solar);
            grid.readouts.publish_load_kw(load);
            meter.resume(now, &mut grid);
            now += 2.0;
        }

        for sample in grid.series.samples() {
            let balance = sample.solar_kw - sample.load_kw - sample.exchange_kw - sample.net_kw;
            assert!(balance.abs() < 1e-9, "conservation violated: {balance}");
        }
    }

    #[test]
    fn inert_ev_passes_net_through_unchanged() {
        let mut grid = grid_with_mode("none", 4);
        grid.readouts.publish_solar_kw(3.0);
        grid.readouts.publish_load_kw(1.0);

        let mut meter = Meter::new(2.0);
        meter.resume(0.0, &mut grid);

        let sample = grid.series.samples()[0];
        assert_eq!(sample.exchange_kw, 0.0);
        assert!((sample.net_kw - 2.0).abs() < 1e-9);
        assert_eq!(sample.battery_kwh, UNKNOWN_BATTERY_KWH);
    }

    #[test]
    fn deficit_discharges_v2g_battery() {
        let mut grid = grid_with_mode("v2g", 4);
        grid.readouts.publish_solar_kw(0.0);
        grid.readouts.publish_load_kw(3.0);

        let mut meter = Meter::new(2.0);
        meter.resume(0.0, &mut grid);

        let sample = grid.series.samples()[0];
        // Deficit 0.1 kWh fully covered by the battery (3 kW < 5 kW limit).
        assert!((sample.exchange_kw - (-3.0)).abs() < 1e-9);
        assert!(sample.net_kw.abs() < 1e-9);
    }

    #[test]
    fn halts_when_series_fills() {
        let mut grid = grid_with_mode("none", 3);
        let mut meter = Meter::new(2.0);

        assert_eq!(meter.resume(0.0, &mut grid), Command::Wait(2.0));
        assert_eq!(meter.resume(2.0, &mut grid), Command::Wait(2.0));
        assert_eq!(meter.resume(4.0, &mut grid), Command::Halt);
        assert_eq!(grid.series.len(), 3);
        // A spurious extra resume records nothing.
        assert_eq!(meter.resume(6.0, &mut grid), Command::Halt);
        assert_eq!(grid.series.len(), 3);
    }

    #[test]
    fn series_overflow_panics() {
        let mut series = SampleSeries::new(1);
        let sample = MeterSample {
            load_kw: 0.0,
            solar_kw: 0.0,
            exchange_kw: 0.0,
            battery_kwh: 0.0,
            net_kw: 0.0,
        };
        series.record(sample);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            series.record(sample);
        }));
        assert!(result.is_err());
    }
}
