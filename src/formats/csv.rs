//! Reader for two-column CSV exports in SI units.
//!
//! Column 1 is midpoint wavelength in nm, column 2 flux density in
//! W m-2 nm-1; both convert to the canonical Angstrom/cgs system on
//! ingest. Rows with non-finite flux are dropped after the bin edges
//! are reconstructed, so each dropped row becomes a wavelength gap.

use std::path::Path;

use crate::binmath::{self, EdgeMode};
use crate::instruments;
use crate::naming;
use crate::reader::ReadError;
use crate::spectbl::{SpecTable, SpecTableBuilder};

use super::basename;

/// nm to Angstrom.
const WAVE_SCALE: f64 = 10.0;

/// W m-2 nm-1 to erg s-1 cm-2 A-1.
const FLUX_SCALE: f64 = 100.0;

/// Read a CSV spectrum export as a single table.
pub fn read(path: &Path) -> Result<Vec<SpecTable>, ReadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| csv_error(path, e))?;

    let mut wmid = Vec::new();
    let mut flux = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| csv_error(path, e))?;
        let field = |idx: usize, what: &str| -> Result<f64, ReadError> {
            record
                .get(idx)
                .and_then(|f| f.parse::<f64>().ok())
                .ok_or_else(|| ReadError::Parse {
                    file: basename(path),
                    detail: format!("record {}: bad or missing {what}", row + 1),
                })
        };
        // Empty flux cells mean the exporter had no value there.
        let f = if record.get(1).is_some_and(str::is_empty) {
            f64::NAN
        } else {
            field(1, "flux")?
        };
        wmid.push(field(0, "wavelength")? * WAVE_SCALE);
        flux.push(f * FLUX_SCALE);
    }

    // Edges come from the full midpoint grid before any rows are masked,
    // so dropped rows leave a real wavelength gap behind rather than
    // widening their neighbors.
    let edges =
        binmath::mids2edges(&wmid, EdgeMode::Simple).ok_or_else(|| ReadError::Parse {
            file: basename(path),
            detail: "fewer than two samples".into(),
        })?;
    let mut w0 = Vec::with_capacity(wmid.len());
    let mut w1 = Vec::with_capacity(wmid.len());
    let mut kept = Vec::with_capacity(wmid.len());
    for (i, &f) in flux.iter().enumerate() {
        if f.is_finite() {
            w0.push(edges[i]);
            w1.push(edges[i + 1]);
            kept.push(f);
        }
    }
    let table = SpecTableBuilder::new(w0, w1, kept)
        .instrument(instruments::code_for_token(&naming::instrument_token(
            path,
        )?))
        .star(naming::parse_star(path)?)
        .name(naming::parse_name(path)?)
        .filename(path.display().to_string())
        .build()?;
    Ok(vec![table])
}

fn csv_error(path: &Path, e: csv::Error) -> ReadError {
    ReadError::Parse {
        file: basename(path),
        detail: e.to_string(),
    }
}
