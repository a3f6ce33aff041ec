//! Simulated household devices: loads, generation, storage, metering.

/// Stochastic duty-cycle appliance model.
pub mod appliance;
/// EV battery, exchange contract, and commute behavior.
pub mod ev;
/// Aggregate household load process.
pub mod household;
/// Dusk-to-bedtime lighting load.
pub mod lightbulb;
/// Metering process and recorded sample series.
pub mod meter;
/// Weather-driven solar generator process.
pub mod solar;

// Re-export the main types for convenience
pub use appliance::Appliance;
pub use ev::{Ev, EvCommute, EvMode};
pub use household::{Household, LoadDevice};
pub use lightbulb::LightBulb;
pub use meter::{Meter, MeterSample, SampleSeries};
pub use solar::SolarPanel;
