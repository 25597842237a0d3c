//! Reader for whitespace-delimited text exports.
//!
//! Three columns per line: midpoint wavelength (A), flux, and error,
//! already in canonical units. Lines starting with `#` are comments.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::binmath::{self, EdgeMode};
use crate::instruments;
use crate::naming;
use crate::reader::ReadError;
use crate::spectbl::{SpecTable, SpecTableBuilder};

use super::basename;

/// Read a three-column text spectrum as a single table.
pub fn read(path: &Path) -> Result<Vec<SpecTable>, ReadError> {
    let reader = BufReader::new(File::open(path)?);
    let mut wmid = Vec::new();
    let mut flux = Vec::new();
    let mut error = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split_whitespace();
        let mut next = |what: &str| -> Result<f64, ReadError> {
            fields
                .next()
                .and_then(|f| f.parse::<f64>().ok())
                .ok_or_else(|| ReadError::Parse {
                    file: basename(path),
                    detail: format!("line {}: bad or missing {what}", lineno + 1),
                })
        };
        wmid.push(next("wavelength")?);
        flux.push(next("flux")?);
        error.push(next("error")?);
    }

    let edges =
        binmath::mids2edges(&wmid, EdgeMode::Simple).ok_or_else(|| ReadError::Parse {
            file: basename(path),
            detail: "fewer than two samples".into(),
        })?;
    let n = wmid.len();
    let table = SpecTableBuilder::new(edges[..n].to_vec(), edges[1..].to_vec(), flux)
        .error(error)
        .instrument(instruments::code_for_token(&naming::instrument_token(
            path,
        )?))
        .star(naming::parse_star(path)?)
        .name(naming::parse_name(path)?)
        .filename(path.display().to_string())
        .build()?;
    Ok(vec![table])
}
