//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Simulation timing and global parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Solar PV parameters.
    #[serde(default)]
    pub solar: SolarConfig,
    /// EV battery and commute parameters.
    #[serde(default)]
    pub ev: EvConfig,
    /// Household occupancy, baseline, and lighting parameters.
    #[serde(default)]
    pub household: HouseholdConfig,
    /// Appliance fleet; defaults to the baseline five-appliance set.
    #[serde(default = "baseline_appliances")]
    pub appliances: Vec<ApplianceConfig>,
}

/// Simulation timing and global parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of days to simulate (must be > 0).
    pub days: u32,
    /// Meter sampling interval in minutes (must be > 0).
    pub sample_interval_min: f64,
    /// Master random seed.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            days: 365,
            sample_interval_min: 2.0,
            seed: 42,
        }
    }
}

impl SimulationConfig {
    /// Simulated horizon in virtual minutes.
    pub fn horizon_min(&self) -> f64 {
        self.days as f64 * 24.0 * 60.0
    }

    /// Number of meter samples the horizon holds at the configured
    /// interval (first sample at t = 0).
    pub fn sample_count(&self) -> usize {
        (self.horizon_min() / self.sample_interval_min).ceil() as usize
    }
}

/// Solar PV parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolarConfig {
    /// Installed nameplate capacity (kW).
    pub installed_kw: f64,
    /// Fractional output loss per year of panel age (0.0–1.0).
    pub deterioration_rate: f64,
}

impl Default for SolarConfig {
    fn default() -> Self {
        Self {
            installed_kw: 5.0,
            deterioration_rate: 0.005,
        }
    }
}

/// EV battery and commute parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvConfig {
    /// Charging strategy: `"v2g"`, `"v1g"`, `"dumb"`, or `"none"`.
    pub mode: String,
    /// Battery capacity (kWh).
    pub capacity_kwh: f64,
    /// Initial battery energy (kWh, within `[0, capacity_kwh]`).
    pub initial_kwh: f64,
    /// Low-energy limit triggering forced charge (kWh).
    pub low_limit_kwh: f64,
    /// Charge efficiency (0.0–1.0].
    pub charge_eff: f64,
    /// Discharge efficiency (0.0–1.0].
    pub discharge_eff: f64,
    /// Smart charger power limit (kW).
    pub max_charge_kw: f64,
    /// V2G discharger power limit (kW).
    pub max_discharge_kw: f64,
    /// Fixed power of the dumb/forced charger (kW).
    pub dumb_charger_kw: f64,
    /// Commute departure hour `[0, 24)`.
    pub depart_hour: f64,
    /// Commute absence duration (minutes).
    pub away_minutes: f64,
    /// Energy one round trip consumes (kWh).
    pub trip_kwh: f64,
    /// Commuting weekdays, 0 = Monday .. 6 = Sunday.
    pub workdays: Vec<u32>,
}

impl Default for EvConfig {
    fn default() -> Self {
        Self {
            mode: "v2g".to_string(),
            capacity_kwh: 50.0,
            initial_kwh: 25.0,
            low_limit_kwh: 20.0,
            charge_eff: 0.85,
            discharge_eff: 0.9,
            max_charge_kw: 6.0,
            max_discharge_kw: 5.0,
            dumb_charger_kw: 3.6,
            depart_hour: 7.5,
            away_minutes: 540.0,
            trip_kwh: 8.0,
            workdays: vec![0, 1, 2, 3, 4],
        }
    }
}

/// Household occupancy, baseline, and lighting parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HouseholdConfig {
    /// Number of occupants (must be >= 1).
    pub occupants: u32,
    /// Constant standby draw (kW).
    pub baseline_kw: f64,
    /// Number of dusk-to-bedtime lights.
    pub bulb_count: u32,
    /// Per-bulb power (kW).
    pub bulb_kw: f64,
    /// Lights-out hour `[0, 24)`.
    pub bedtime_hour: f64,
    /// Gaussian jitter applied to dusk and bedtime (hours).
    pub bedtime_jitter_std_hour: f64,
}

impl Default for HouseholdConfig {
    fn default() -> Self {
        Self {
            occupants: 3,
            baseline_kw: 0.08,
            bulb_count: 4,
            bulb_kw: 0.06,
            bedtime_hour: 22.5,
            bedtime_jitter_std_hour: 0.5,
        }
    }
}

/// One stochastic appliance.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApplianceConfig {
    /// Display name.
    pub name: String,
    /// Power while on (kW).
    pub rated_kw: f64,
    /// Average on-run duration (minutes, must be > 0).
    pub avg_on_min: f64,
    /// Shared devices run once per household; per-person devices scale
    /// with the occupant count.
    pub shared: bool,
    /// 24 hourly activation probabilities, each in `[0, 1]`.
    pub hourly_prob: Vec<f64>,
}

/// The baseline five-appliance fleet: continuously cycling cold storage
/// plus evening-weighted kitchen, laundry, and entertainment loads.
fn baseline_appliances() -> Vec<ApplianceConfig> {
    vec![
        ApplianceConfig {
            name: "fridge".to_string(),
            rated_kw: 0.12,
            avg_on_min: 20.0,
            shared: true,
            hourly_prob: vec![0.35; 24],
        },
        ApplianceConfig {
            name: "dishwasher".to_string(),
            rated_kw: 1.2,
            avg_on_min: 75.0,
            shared: true,
            hourly_prob: vec![
                0.00, 0.00, 0.00, 0.00, 0.00, 0.00, 0.01, 0.02, 0.03, 0.02, 0.01, 0.01, //
                0.02, 0.02, 0.01, 0.01, 0.01, 0.02, 0.04, 0.08, 0.10, 0.06, 0.02, 0.00,
            ],
        },
        ApplianceConfig {
            name: "washing machine".to_string(),
            rated_kw: 0.9,
            avg_on_min: 90.0,
            shared: true,
            hourly_prob: vec![
                0.00, 0.00, 0.00, 0.00, 0.00, 0.00, 0.01, 0.02, 0.04, 0.05, 0.05, 0.04, //
                0.03, 0.03, 0.03, 0.03, 0.04, 0.05, 0.04, 0.02, 0.01, 0.00, 0.00, 0.00,
            ],
        },
        ApplianceConfig {
            name: "tv".to_string(),
            rated_kw: 0.15,
            avg_on_min: 110.0,
            shared: false,
            hourly_prob: vec![
                0.01, 0.00, 0.00, 0.00, 0.00, 0.00, 0.02, 0.05, 0.04, 0.03, 0.03, 0.04, //
                0.06, 0.05, 0.04, 0.05, 0.08, 0.15, 0.25, 0.35, 0.40, 0.30, 0.12, 0.04,
            ],
        },
        ApplianceConfig {
            name: "kettle".to_string(),
            rated_kw: 2.0,
            avg_on_min: 4.0,
            shared: false,
            hourly_prob: vec![
                0.00, 0.00, 0.00, 0.00, 0.00, 0.01, 0.05, 0.10, 0.08, 0.04, 0.03, 0.03, //
                0.04, 0.03, 0.03, 0.04, 0.04, 0.04, 0.04, 0.03, 0.02, 0.01, 0.00, 0.00,
            ],
        },
    ]
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.days"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario: a year-long run with a V2G EV.
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            solar: SolarConfig::default(),
            ev: EvConfig::default(),
            household: HouseholdConfig::default(),
            appliances: baseline_appliances(),
        }
    }

    /// Returns the no-EV preset: identical household and solar, no vehicle.
    pub fn no_ev() -> Self {
        Self {
            ev: EvConfig {
                mode: "none".to_string(),
                ..EvConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Returns the dumb-charger preset: the EV always charges at a fixed
    /// power while plugged in, ignoring the solar surplus.
    pub fn dumb_charger() -> Self {
        Self {
            ev: EvConfig {
                mode: "dumb".to_string(),
                ..EvConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "no_ev", "dumb_charger"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "no_ev" => Ok(Self::no_ev()),
            "dumb_charger" => Ok(Self::dumb_charger()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.simulation;

        if s.days == 0 {
            errors.push(ConfigError {
                field: "simulation.days".into(),
                message: "must be > 0".into(),
            });
        }
        if s.sample_interval_min <= 0.0 {
            errors.push(ConfigError {
                field: "simulation.sample_interval_min".into(),
                message: "must be > 0".into(),
            });
        }

        let sol = &self.solar;
        if sol.installed_kw < 0.0 {
            errors.push(ConfigError {
                field: "solar.installed_kw".into(),
                message: "must be >= 0".into(),
            });
        }
        if !(0.0..=1.0).contains(&sol.deterioration_rate) {
            errors.push(ConfigError {
                field: "solar.deterioration_rate".into(),
                message: "must be in [0.0, 1.0]".into(),
            });
        }

        let ev = &self.ev;
        if crate::devices::EvMode::parse(&ev.mode).is_none() {
            errors.push(ConfigError {
                field: "ev.mode".into(),
                message: format!(
                    "must be \"v2g\", \"v1g\", \"dumb\" or \"none\", got \"{}\"",
                    ev.mode
                ),
            });
        }
        if ev.capacity_kwh <= 0.0 {
            errors.push(ConfigError {
                field: "ev.capacity_kwh".into(),
                message: "must be > 0".into(),
            });
        }
        if !(0.0..=ev.capacity_kwh).contains(&ev.initial_kwh) {
            errors.push(ConfigError {
                field: "ev.initial_kwh".into(),
                message: "must be in [0, ev.capacity_kwh]".into(),
            });
        }
        if !(0.0..ev.capacity_kwh.max(0.0)).contains(&ev.low_limit_kwh) {
            errors.push(ConfigError {
                field: "ev.low_limit_kwh".into(),
                message: "must be in [0, ev.capacity_kwh)".into(),
            });
        }
        for (field, eff) in [
            ("ev.charge_eff", ev.charge_eff),
            ("ev.discharge_eff", ev.discharge_eff),
        ] {
            if !(eff > 0.0 && eff <= 1.0) {
                errors.push(ConfigError {
                    field: field.into(),
                    message: "must be in (0.0, 1.0]".into(),
                });
            }
        }
        for (field, kw) in [
            ("ev.max_charge_kw", ev.max_charge_kw),
            ("ev.max_discharge_kw", ev.max_discharge_kw),
            ("ev.dumb_charger_kw", ev.dumb_charger_kw),
        ] {
            if kw < 0.0 {
                errors.push(ConfigError {
                    field: field.into(),
                    message: "must be >= 0".into(),
                });
            }
        }
        if !(0.0..24.0).contains(&ev.depart_hour) {
            errors.push(ConfigError {
                field: "ev.depart_hour".into(),
                message: "must be in [0, 24)".into(),
            });
        }
        if ev.away_minutes < 0.0 {
            errors.push(ConfigError {
                field: "ev.away_minutes".into(),
                message: "must be >= 0".into(),
            });
        }
        if ev.trip_kwh < 0.0 {
            errors.push(ConfigError {
                field: "ev.trip_kwh".into(),
                message: "must be >= 0".into(),
            });
        }
        if ev.workdays.len() > 7 || ev.workdays.iter().any(|&d| d > 6) {
            errors.push(ConfigError {
                field: "ev.workdays".into(),
                message: "must list at most 7 weekdays in 0..=6".into(),
            });
        }

        let h = &self.household;
        if h.occupants == 0 {
            errors.push(ConfigError {
                field: "household.occupants".into(),
                message: "must be >= 1".into(),
            });
        }
        if h.baseline_kw < 0.0 {
            errors.push(ConfigError {
                field: "household.baseline_kw".into(),
                message: "must be >= 0".into(),
            });
        }
        if h.bulb_kw < 0.0 {
            errors.push(ConfigError {
                field: "household.bulb_kw".into(),
                message: "must be >= 0".into(),
            });
        }
        if !(0.0..24.0).contains(&h.bedtime_hour) {
            errors.push(ConfigError {
                field: "household.bedtime_hour".into(),
                message: "must be in [0, 24)".into(),
            });
        }
        if h.bedtime_jitter_std_hour < 0.0 {
            errors.push(ConfigError {
                field: "household.bedtime_jitter_std_hour".into(),
                message: "must be >= 0".into(),
            });
        }

        for (i, a) in self.appliances.iter().enumerate() {
            let prefix = format!("appliances[{i}]");
            if a.rated_kw < 0.0 {
                errors.push(ConfigError {
                    field: format!("{prefix}.rated_kw"),
                    message: "must be >= 0".into(),
                });
            }
            if a.avg_on_min <= 0.0 {
                errors.push(ConfigError {
                    field: format!("{prefix}.avg_on_min"),
                    message: "must be > 0".into(),
                });
            }
            if a.hourly_prob.len() != 24 {
                errors.push(ConfigError {
                    field: format!("{prefix}.hourly_prob"),
                    message: format!("must have 24 entries, got {}", a.hourly_prob.len()),
                });
            }
            if a.hourly_prob.iter().any(|p| !(0.0..=1.0).contains(p)) {
                errors.push(ConfigError {
                    field: format!("{prefix}.hourly_prob"),
                    message: "entries must be in [0.0, 1.0]".into(),
                });
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ScenarioConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn no_ev_preset_is_inert() {
        let cfg = ScenarioConfig::no_ev();
        assert_eq!(cfg.ev.mode, "none");
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[simulation]
days = 30
sample_interval_min = 5.0
seed = 99

[solar]
installed_kw = 8.0
deterioration_rate = 0.01

[ev]
mode = "v1g"
capacity_kwh = 60.0
initial_kwh = 30.0
low_limit_kwh = 12.0
charge_eff = 0.9
discharge_eff = 0.9
max_charge_kw = 11.0
max_discharge_kw = 7.0
dumb_charger_kw = 2.3
depart_hour = 8.0
away_minutes = 480.0
trip_kwh = 6.0
workdays = [0, 1, 2, 3]

[household]
occupants = 2
baseline_kw = 0.05
bulb_count = 6
bulb_kw = 0.04
bedtime_hour = 23.0
bedtime_jitter_std_hour = 0.25
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.simulation.days), Some(30));
        assert_eq!(cfg.as_ref().map(|c| &*c.ev.mode), Some("v1g"));
        // Appliance fleet falls back to the baseline set.
        assert_eq!(cfg.as_ref().map(|c| c.appliances.len()), Some(5));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[simulation]
days = 10
bogus_field = true
"#;
        let result = ScenarioConfig::from_toml_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[simulation]
seed = 99
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.simulation.seed), Some(99));
        assert_eq!(cfg.as_ref().map(|c| c.simulation.days), Some(365));
        assert_eq!(cfg.as_ref().map(|c| c.solar.installed_kw), Some(5.0));
    }

    #[test]
    fn validation_catches_zero_days() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.days = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "simulation.days"));
    }

    #[test]
    fn validation_catches_bad_ev_mode() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.ev.mode = "bogus".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "ev.mode"));
    }

    #[test]
    fn validation_catches_initial_above_capacity() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.ev.initial_kwh = cfg.ev.capacity_kwh + 1.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "ev.initial_kwh"));
    }

    #[test]
    fn validation_catches_bad_probability_table() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.appliances[0].hourly_prob = vec![0.5; 23];
        cfg.appliances[1].hourly_prob[3] = 1.5;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "appliances[0].hourly_prob"));
        assert!(errors.iter().any(|e| e.field == "appliances[1].hourly_prob"));
    }

    #[test]
    fn validation_catches_bad_workdays() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.ev.workdays = vec![0, 9];
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "ev.workdays"));
    }

    #[test]
    fn sample_count_covers_horizon() {
        let s = SimulationConfig {
            days: 1,
            sample_interval_min: 2.0,
            seed: 42,
        };
        assert_eq!(s.sample_count(), 720);
        assert_eq!(s.horizon_min(), 1440.0);
    }
}
