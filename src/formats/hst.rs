//! Reader for HST COS and STIS extracted-spectrum (x1d/sx1) files.
//!
//! The science extension stores one row per spectral order or segment,
//! each row a vector of midpoint wavelengths, fluxes, errors, and data
//! quality flags. Exposure metadata lives in the extension header and is
//! broadcast to every bin.

use std::path::Path;

use crate::binmath::{self, EdgeMode};
use crate::fits::FitsFile;
use crate::instruments;
use crate::naming;
use crate::reader::ReadError;
use crate::spectbl::{SpecTable, SpecTableBuilder};

use super::basename;

/// Read every order/segment row of an HST x1d/sx1 file, one table per row,
/// in file order. Off-detector edges are trimmed per row.
pub fn read(path: &Path) -> Result<Vec<SpecTable>, ReadError> {
    let file = FitsFile::open(path)?;
    let sci = file
        .tables
        .first()
        .ok_or_else(|| ReadError::MissingCompanion {
            file: basename(path),
            detail: "no science extension".into(),
        })?;

    let (rw, wave) = sci.numeric_column_vec("wavelength")?;
    let (rf, flux) = sci.numeric_column_vec("flux")?;
    let (re, error) = sci.numeric_column_vec("error")?;
    let (rq, dq) = sci.int_column_vec("dq")?;
    if rw != rf || rw != re || rw != rq {
        return Err(ReadError::DataConsistency {
            file: basename(path),
            detail: format!("column repeats differ: wavelength {rw}, flux {rf}, error {re}, dq {rq}"),
        });
    }

    let exptime = sci.header.get_f64("EXPTIME")?;
    let start = sci.header.get_f64("EXPSTART")?;
    let end = sci.header.get_f64("EXPEND")?;
    let code = instruments::code_for_token(&naming::instrument_token(path)?);
    let star = naming::parse_star(path)?;
    let name = naming::parse_name(path)?;

    let mut tables = Vec::with_capacity(sci.nrows());
    for row in 0..sci.nrows() {
        let lo = row * rw;
        let hi = lo + rw;
        let edges =
            binmath::mids2edges(&wave[lo..hi], EdgeMode::Left).ok_or_else(|| {
                ReadError::DataConsistency {
                    file: basename(path),
                    detail: format!("row {row} has too few wavelength samples"),
                }
            })?;
        let table = SpecTableBuilder::new(
            edges[..rw].to_vec(),
            edges[1..].to_vec(),
            flux[lo..hi].to_vec(),
        )
        .error(error[lo..hi].to_vec())
        .flags(dq[lo..hi].to_vec())
        .exptime(exptime)
        .obs_window(start, end)
        .instrument(code)
        .star(&star)
        .name(&name)
        .filename(path.display().to_string())
        .build()?;
        tables.push(table.trim_off_detector());
    }
    Ok(tables)
}
