//! Input/output helpers.

/// CSV export of recorded meter series.
pub mod export;
