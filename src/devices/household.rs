//! Aggregate household load process.

use crate::calendar::CalendarTime;
use crate::grid::Grid;
use crate::rng::SimRng;
use crate::sim::clock::Minutes;
use crate::sim::process::{Command, Process};

use super::appliance::Appliance;
use super::lightbulb::LightBulb;

/// How often the household republishes its total draw.
const TICK_MINUTES: Minutes = 1.0;

/// A load device variant. Closed set: the simulation has exactly two
/// kinds of loads, so an enum beats an open trait hierarchy here.
#[derive(Debug, Clone)]
pub enum LoadDevice {
    /// Stochastic duty-cycle appliance.
    Appliance(Appliance),
    /// Dusk-to-bedtime timer light.
    Bulb(LightBulb),
}

impl LoadDevice {
    fn tick(&mut self, now: Minutes, hour_of_day: usize, rng: &mut SimRng) {
        match self {
            Self::Appliance(appliance) => appliance.tick(hour_of_day, rng),
            Self::Bulb(bulb) => bulb.tick(now, rng),
        }
    }

    /// Instantaneous power draw in kW.
    pub fn power_kw(&self) -> f64 {
        match self {
            Self::Appliance(appliance) => appliance.power_kw(),
            Self::Bulb(bulb) => bulb.power_kw(),
        }
    }
}

/// Scales an hourly probability table for the occupant count.
///
/// Shared devices (one per household) scale as `p^occupants`; per-person
/// devices scale as `p * occupants`, capped at 1.
pub fn occupancy_scaled(table: &[f64; 24], occupants: u32, shared: bool) -> [f64; 24] {
    let mut scaled = [0.0; 24];
    for (out, &p) in scaled.iter_mut().zip(table.iter()) {
        *out = if shared {
            p.powi(occupants as i32)
        } else {
            (p * occupants as f64).min(1.0)
        };
    }
    scaled
}

/// The household aggregate: N load devices plus a constant baseline for
/// always-on standby draw (modems, clocks, devices in standby).
///
/// Ticks every minute, sums instantaneous device power, and publishes the
/// total as the shared load readout. Sole writer of `load_kw`.
pub struct Household {
    baseline_kw: f64,
    devices: Vec<LoadDevice>,
    rng: SimRng,
}

impl Household {
    /// Creates the aggregate load.
    ///
    /// # Panics
    ///
    /// Panics if `baseline_kw` is negative.
    pub fn new(baseline_kw: f64, devices: Vec<LoadDevice>, rng: SimRng) -> Self {
        assert!(baseline_kw >= 0.0);
        Self {
            baseline_kw,
            devices,
            rng,
        }
    }

    /// Current total draw in kW.
    pub fn total_power_kw(&self) -> f64 {
        self.baseline_kw + self.devices.iter().map(LoadDevice::power_kw).sum::<f64>()
    }
}

impl Process<Grid> for Household {
    fn resume(&mut self, now: Minutes, grid: &mut Grid) -> Command {
        let hour = CalendarTime::at(now).hour_index();
        for device in &mut self.devices {
            device.tick(now, hour, &mut self.rng);
        }
        grid.readouts.publish_load_kw(self.total_power_kw());
        Command::Wait(TICK_MINUTES)
    }

    fn name(&self) -> &'static str {
        "household"
    }
}
