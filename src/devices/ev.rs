//! Bidirectional EV battery with an energy-exchange contract and a
//! scheduled commute behavior.

use crate::calendar::{CalendarTime, MINUTES_PER_DAY};
use crate::config::EvConfig;
use crate::grid::Grid;
use crate::sim::clock::Minutes;
use crate::sim::process::{Command, Process};

/// EV charging strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvMode {
    /// Bidirectional: smart charge and discharge to the grid.
    V2g,
    /// Smart charge only, never discharges.
    V1g,
    /// Fixed-power forced charge whenever plugged in.
    Dumb,
    /// Inert: exchanges nothing.
    None,
}

impl EvMode {
    /// Parses a config-file mode string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "v2g" => Some(Self::V2g),
            "v1g" => Some(Self::V1g),
            "dumb" => Some(Self::Dumb),
            "none" => Some(Self::None),
            _ => Option::None,
        }
    }
}

/// Stateful EV battery exposing the energy-exchange contract.
///
/// All energy amounts are in kWh, powers in kW, durations in minutes.
/// Physical-limit violations are refusals: the operation returns `0.0`
/// and leaves the battery untouched, and the caller may retry on the
/// next sampling tick.
#[derive(Debug, Clone)]
pub struct Ev {
    capacity_kwh: f64,
    low_limit_kwh: f64,
    charge_eff: f64,
    discharge_eff: f64,
    max_charge_kw: f64,
    max_discharge_kw: f64,
    dumb_charger_kw: f64,
    mode: EvMode,
    available: bool,
    battery_kwh: f64,
    driving_kwh: f64,
}

impl Ev {
    /// Builds an EV from validated configuration.
    ///
    /// # Panics
    ///
    /// Panics on out-of-range parameters; [`crate::config::ScenarioConfig::validate`]
    /// rejects these before a run starts.
    pub fn new(cfg: &EvConfig) -> Self {
        assert!(cfg.capacity_kwh > 0.0);
        assert!((0.0..=cfg.capacity_kwh).contains(&cfg.initial_kwh));
        assert!((0.0..cfg.capacity_kwh).contains(&cfg.low_limit_kwh));
        assert!(cfg.charge_eff > 0.0 && cfg.charge_eff <= 1.0);
        assert!(cfg.discharge_eff > 0.0 && cfg.discharge_eff <= 1.0);
        assert!(cfg.max_charge_kw >= 0.0 && cfg.max_discharge_kw >= 0.0);
        assert!(cfg.dumb_charger_kw >= 0.0);
        let mode = EvMode::parse(&cfg.mode).expect("validated ev mode");

        Self {
            capacity_kwh: cfg.capacity_kwh,
            low_limit_kwh: cfg.low_limit_kwh,
            charge_eff: cfg.charge_eff,
            discharge_eff: cfg.discharge_eff,
            max_charge_kw: cfg.max_charge_kw,
            max_discharge_kw: cfg.max_discharge_kw,
            dumb_charger_kw: cfg.dumb_charger_kw,
            mode,
            available: true,
            battery_kwh: cfg.initial_kwh,
            driving_kwh: 0.0,
        }
    }

    /// Offers (positive) or requests (negative) energy over `duration_min`.
    ///
    /// Returns the signed amount actually honored at the meter boundary:
    /// positive energy flowed into the battery, negative flowed out to the
    /// grid. Committed charge amounts report the pre-efficiency energy
    /// drawn at the meter; the efficiency loss stays inside the battery.
    ///
    /// Paths, in priority order:
    /// 1. unavailable or inert mode: no-op, returns `0.0`;
    /// 2. `Dumb` mode, or battery under the low-energy limit: forced
    ///    charge at the normal charger power regardless of the request;
    /// 3. surplus offered: charge clamped to the smart charger limit,
    ///    refused outright if the battery would reach capacity;
    /// 4. deficit requested and `V2g`: discharge clamped to the
    ///    discharger limit, battery draw is `delivered / discharge_eff`,
    ///    refused outright if the battery would fall to the low limit.
    ///
    /// `V1g` and `None` never discharge.
    pub fn exchange_energy(&mut self, requested_kwh: f64, duration_min: f64) -> f64 {
        if !self.available || self.mode == EvMode::None {
            return 0.0;
        }

        // Forced-charge path has priority over the smart paths.
        if self.mode == EvMode::Dumb || self.battery_kwh < self.low_limit_kwh {
            let energy = self.dumb_charger_kw * duration_min / 60.0;
            let stored = energy * self.charge_eff;
            if self.battery_kwh + stored < self.capacity_kwh {
                self.battery_kwh += stored;
                return energy;
            }
            return 0.0;
        }

        if requested_kwh > 0.0 {
            let energy = requested_kwh.min(self.max_charge_kw * duration_min / 60.0);
            let stored = energy * self.charge_eff;
            if self.battery_kwh + stored < self.capacity_kwh {
                self.battery_kwh += stored;
                return energy;
            }
            return 0.0;
        }

        if requested_kwh < 0.0 && self.mode == EvMode::V2g {
            let delivered = (-requested_kwh).min(self.max_discharge_kw * duration_min / 60.0);
            let draw = delivered / self.discharge_eff;
            if self.battery_kwh - draw > self.low_limit_kwh {
                self.battery_kwh -= draw;
                return -delivered;
            }
            return 0.0;
        }

        0.0
    }

    /// Consumes up to `trip_kwh` from the battery for driving, crediting
    /// the consumed amount to the monotonic driving counter.
    pub fn drive_discharge(&mut self, trip_kwh: f64) {
        let consumed = trip_kwh.max(0.0).min(self.battery_kwh);
        self.battery_kwh -= consumed;
        self.driving_kwh += consumed;
    }

    /// Current battery energy, or `None` while the vehicle is away or the
    /// mode is inert. `None` must not be read as an empty battery.
    pub fn battery_reading(&self) -> Option<f64> {
        if !self.available || self.mode == EvMode::None {
            return None;
        }
        Some(self.battery_kwh)
    }

    /// Marks the vehicle present at (or absent from) the charger.
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Whether the vehicle is at the charger.
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Configured mode.
    pub fn mode(&self) -> EvMode {
        self.mode
    }

    /// Battery capacity in kWh.
    pub fn capacity_kwh(&self) -> f64 {
        self.capacity_kwh
    }

    /// Total energy consumed driving so far, in kWh.
    pub fn driving_kwh(&self) -> f64 {
        self.driving_kwh
    }

    #[cfg(test)]
    pub(crate) fn battery_kwh(&self) -> f64 {
        self.battery_kwh
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommutePhase {
    AwaitingDeparture,
    Away,
}

/// Scheduled commute: on each configured workday at the departure hour
/// the vehicle leaves for a fixed duration, burns the trip energy exactly
/// once on return, and plugs back in.
pub struct EvCommute {
    depart_hour: f64,
    away_min: f64,
    trip_kwh: f64,
    workdays: Vec<u32>,
    phase: CommutePhase,
}

impl EvCommute {
    /// Creates the commute behavior from validated configuration.
    pub fn new(cfg: &EvConfig) -> Self {
        Self {
            depart_hour: cfg.depart_hour,
            away_min: cfg.away_minutes,
            trip_kwh: cfg.trip_kwh,
            workdays: cfg.workdays.clone(),
            phase: CommutePhase::AwaitingDeparture,
        }
    }

    /// Minutes from `now` to the next workday departure, or `None` when
    /// no workdays are configured.
    fn until_next_departure(&self, now: Minutes) -> Option<Minutes> {
        if self.workdays.is_empty() {
            return None;
        }
        let cal = CalendarTime::at(now);
        for day_offset in 0..=7u32 {
            let day_start = cal.day_start() + day_offset as f64 * MINUTES_PER_DAY;
            let departure = day_start + self.depart_hour * 60.0;
            if departure <= now {
                continue;
            }
            let weekday = (cal.weekday + day_offset) % 7;
            if self.workdays.contains(&weekday) {
                return Some(departure - now);
            }
        }
        None
    }
}

impl Process<Grid> for EvCommute {
    fn resume(&mut self, now: Minutes, grid: &mut Grid) -> Command {
        match self.phase {
            CommutePhase::AwaitingDeparture => {
                // First resume happens at spawn time, not at a departure;
                // detect that by checking whether a departure is due now.
                let cal = CalendarTime::at(now);
                let at_departure = self.workdays.contains(&cal.weekday)
                    && (cal.hour - self.depart_hour).abs() * 60.0 < 0.5;
                if at_departure {
                    grid.ev.set_available(false);
                    self.phase = CommutePhase::Away;
                    return Command::Wait(self.away_min);
                }
                match self.until_next_departure(now) {
                    Some(delta) => Command::Wait(delta),
                    None => Command::Halt,
                }
            }
            CommutePhase::Away => {
                grid.ev.drive_discharge(self.trip_kwh);
                grid.ev.set_available(true);
                self.phase = CommutePhase::AwaitingDeparture;
                match self.until_next_departure(now) {
                    Some(delta) => Command::Wait(delta),
                    None => Command::Halt,
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "ev-commute"
    }
}
