//! Reader for XMM-Newton fluxed-spectrum files.
//!
//! The science extension carries midpoint wavelengths on a uniform 5 A
//! grid with flux and error already in canonical units. Exposure and
//! observation timestamps live in the primary header under
//! detector-specific keywords.

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};

use crate::fits::{FitsFile, Header};
use crate::instruments;
use crate::naming;
use crate::reader::ReadError;
use crate::spectbl::{SpecTable, SpecTableBuilder};

use super::basename;

/// Uniform bin width of XMM fluxed spectra, Angstroms.
const DW: f64 = 5.0;

/// Largest tolerated disagreement between the grid spacing implied by
/// successive midpoints and the nominal bin width, Angstroms.
const GRID_TOLERANCE: f64 = 0.01;

/// Read an XMM pn or MOS fluxed spectrum as a single table.
pub fn read(path: &Path) -> Result<Vec<SpecTable>, ReadError> {
    let file = FitsFile::open(path)?;
    let sci = file
        .tables
        .first()
        .ok_or_else(|| ReadError::MissingCompanion {
            file: basename(path),
            detail: "no spectrum extension".into(),
        })?;

    let wmid = sci.numeric_column("Wave")?;
    let flux = sci.numeric_column("CFlux")?;
    let error = sci.numeric_column("CFlux_err")?;

    let (&first, &last) = match (wmid.first(), wmid.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => {
            return Err(ReadError::DataConsistency {
                file: basename(path),
                detail: "empty wavelength column".into(),
            })
        }
    };

    // The grid must be uniform. Each shared interior edge is the mean of
    // the reconstructions from both neighbors so that spacing slightly
    // off the nominal bin width never opens gaps between bins; the outer
    // edges extrapolate a full bin past the first and last midpoints.
    let mut interior = Vec::with_capacity(wmid.len().saturating_sub(1));
    for pair in wmid.windows(2) {
        let above = pair[0] + DW / 2.0;
        let below = pair[1] - DW / 2.0;
        if (above - below).abs() > GRID_TOLERANCE {
            return Err(ReadError::DataConsistency {
                file: basename(path),
                detail: format!(
                    "wavelength spacing {} departs from the {DW} A grid",
                    pair[1] - pair[0]
                ),
            });
        }
        interior.push((above + below) / 2.0);
    }
    let mut w0 = Vec::with_capacity(wmid.len());
    let mut w1 = Vec::with_capacity(wmid.len());
    w0.push(first - DW);
    w0.extend_from_slice(&interior);
    w1.extend_from_slice(&interior);
    w1.push(last + DW);

    let (exptime, start, end) = exposure_keys(path, &file.primary)?;
    let table = SpecTableBuilder::new(w0, w1, flux)
        .error(error)
        .exptime(exptime)
        .obs_window(start, end)
        .instrument(instruments::code_for_token(&naming::instrument_token(
            path,
        )?))
        .star(naming::parse_star(path)?)
        .name(naming::parse_name(path)?)
        .filename(path.display().to_string())
        .build()?;
    Ok(vec![table])
}

/// Exposure time and MJD observation window, keyed by detector.
///
/// MOS products combine both cameras: the exposure is the camera average
/// and the window spans the earliest start to the latest end.
fn exposure_keys(path: &Path, primary: &Header) -> Result<(f64, f64, f64), ReadError> {
    match naming::parse_spectrograph(path)?.as_str() {
        "pn-" => Ok((
            primary.get_f64("SPEC_EXPTIME_PN")?,
            mjd(path, primary.get_str("PN_DATE-OBS")?)?,
            mjd(path, primary.get_str("PN_DATE-END")?)?,
        )),
        "mos" => {
            let exptime = (primary.get_f64("SPEC_EXPTIME_MOS1")?
                + primary.get_f64("SPEC_EXPTIME_MOS2")?)
                / 2.0;
            let start = f64::min(
                mjd(path, primary.get_str("MOS1_DATE-OBS")?)?,
                mjd(path, primary.get_str("MOS2_DATE-OBS")?)?,
            );
            let end = f64::max(
                mjd(path, primary.get_str("MOS1_DATE-END")?)?,
                mjd(path, primary.get_str("MOS2_DATE-END")?)?,
            );
            Ok((exptime, start, end))
        }
        other => Err(ReadError::UnsupportedFormat {
            file: format!("{} (detector {other})", basename(path)),
        }),
    }
}

/// Convert an ISO-8601 timestamp to Modified Julian Date.
fn mjd(path: &Path, iso: &str) -> Result<f64, ReadError> {
    let parsed = NaiveDateTime::parse_from_str(iso.trim(), "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| {
            NaiveDate::parse_from_str(iso.trim(), "%Y-%m-%d")
                .map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_default())
        })
        .map_err(|e| ReadError::Parse {
            file: basename(path),
            detail: format!("bad timestamp {iso:?}: {e}"),
        })?;
    let epoch = NaiveDate::from_ymd_opt(1858, 11, 17)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ReadError::Parse {
            file: basename(path),
            detail: "MJD epoch out of range".into(),
        })?;
    Ok((parsed - epoch).num_milliseconds() as f64 / 86_400_000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn mjd_epoch_is_zero() {
        let p = PathBuf::from("x.fits");
        assert_eq!(mjd(&p, "1858-11-17T00:00:00").unwrap(), 0.0);
    }

    #[test]
    fn mjd_matches_known_date() {
        let p = PathBuf::from("x.fits");
        // 2000-01-01 00:00 UT is MJD 51544.
        assert_eq!(mjd(&p, "2000-01-01T00:00:00").unwrap(), 51544.0);
        assert_eq!(mjd(&p, "2000-01-01").unwrap(), 51544.0);
    }

    #[test]
    fn mjd_fractional_day() {
        let p = PathBuf::from("x.fits");
        let v = mjd(&p, "2000-01-01T12:00:00").unwrap();
        assert!((v - 51544.5).abs() < 1e-9);
    }

    #[test]
    fn garbage_timestamp_is_an_error() {
        let p = PathBuf::from("x.fits");
        assert!(mjd(&p, "not-a-date").is_err());
    }
}
