//! CSV export for recorded meter series.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::devices::meter::MeterSample;

/// Column header for the exported meter series.
const HEADER: &str = "loadPower,solarPower,exchangePower,batteryEnergy,netPower";

/// Exports the meter series to a CSV file at the given path.
///
/// Writes the fixed header row followed by one data row per sample.
/// Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(samples: &[MeterSample], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(samples, buf)
}

/// Writes the meter series as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(samples: &[MeterSample], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;
    for s in samples {
        wtr.write_record(&[
            format!("{:.4}", s.load_kw),
            format!("{:.4}", s.solar_kw),
            format!("{:.4}", s.exchange_kw),
            format!("{:.4}", s.battery_kwh),
            format!("{:.4}", s.net_kw),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
