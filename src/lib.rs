//! Household micro-grid energy-flow simulator.
//!
//! A discrete-event simulation of a single household: a stochastic
//! appliance load, a weather-driven solar generator, and a bidirectional
//! EV battery, metered at fixed intervals into grid import/export series.

pub mod calendar;
pub mod config;
pub mod devices;
pub mod grid;
pub mod io;
pub mod metrics;
pub mod rng;
pub mod scenario;
/// Discrete-event kernel: virtual clock, event queue, and cooperative scheduler.
pub mod sim;
