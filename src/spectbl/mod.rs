//! # Canonical Spectrum Table
//!
//! The normalized record every format reader produces: an ordered sequence
//! of wavelength bins with flux, uncertainty, exposure, data-quality flags,
//! per-bin instrument provenance and a renormalization factor, plus
//! table-level metadata. Bin order is ascending wavelength and is
//! semantically meaningful and readers must preserve it.

mod builder;


pub use builder::SpecTableBuilder;

use std::ops::Range;
use std::path::Path;

use crate::schema::columns::{DQ_OFF_DETECTOR, DQ_STIS_BAD};
use crate::{binmath, instruments};

/// Violations of the canonical-table contract.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// A column's length differs from the wavelength columns.
    #[error("column {column} has {got} rows, expected {expected}")]
    LengthMismatch {
        /// Offending column name.
        column: &'static str,
        /// Row count of the wavelength columns.
        expected: usize,
        /// Row count found.
        got: usize,
    },

    /// A bin's upper edge does not exceed its lower edge.
    #[error("bin {index} has w0 {w0} >= w1 {w1}")]
    InvertedBin {
        /// Row index of the offending bin.
        index: usize,
        /// Lower edge.
        w0: f64,
        /// Upper edge.
        w1: f64,
    },

    /// Two bins overlap (upper edge of one exceeds the next lower edge).
    #[error("bins {index} and {} overlap: w1 {w1} > next w0 {next_w0}", index + 1)]
    OverlappingBins {
        /// Row index of the first of the two bins.
        index: usize,
        /// Upper edge of the first bin.
        w1: f64,
        /// Lower edge of the following bin.
        next_w0: f64,
    },
}

/// Table-level metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableMeta {
    /// Path or name of the file the table came from or was written to.
    pub filename: String,
    /// Derived star/instrument display identifier.
    pub name: String,
    /// Target star.
    pub star: String,
    /// Files combined to produce this table; empty for raw instrument reads.
    pub sourcespecs: Vec<String>,
    /// Free-text comment lines.
    pub comments: Vec<String>,
}

/// The Canonical Spectrum Table: struct-of-arrays, one entry per bin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecTable {
    /// Lower wavelength bin edges (Angstroms).
    pub w0: Vec<f64>,
    /// Upper wavelength bin edges (Angstroms).
    pub w1: Vec<f64>,
    /// Flux density (erg s-1 cm-2 Angstrom-1).
    pub flux: Vec<f64>,
    /// 1-sigma flux uncertainty.
    pub error: Vec<f64>,
    /// Effective exposure time per bin (seconds).
    pub exptime: Vec<f64>,
    /// Bitwise data-quality flags.
    pub flags: Vec<i32>,
    /// Bitwise OR of contributing instrument codes.
    pub instrument: Vec<i32>,
    /// Multiplicative renormalization per bin.
    pub normfac: Vec<f64>,
    /// Observation start per bin (MJD).
    pub start: Vec<f64>,
    /// Observation end per bin (MJD).
    pub end: Vec<f64>,
    /// Table-level metadata.
    pub meta: TableMeta,
}

impl SpecTable {
    /// Number of wavelength bins.
    pub fn len(&self) -> usize {
        self.w0.len()
    }

    /// Whether the table has no bins.
    pub fn is_empty(&self) -> bool {
        self.w0.is_empty()
    }

    /// Bin midpoints, `(w0 + w1) / 2`.
    pub fn midpoints(&self) -> Vec<f64> {
        self.w0
            .iter()
            .zip(&self.w1)
            .map(|(a, b)| (a + b) / 2.0)
            .collect()
    }

    /// OR of every instrument code appearing in the table.
    pub fn instrument_union(&self) -> i32 {
        self.instrument.iter().fold(0, |acc, &c| acc | c)
    }

    /// Check the canonical-table contract: equal column lengths, `w0 < w1`
    /// per bin, and non-overlapping bins in ascending order.
    pub fn validate(&self) -> Result<(), TableError> {
        let n = self.w0.len();
        let check = |column: &'static str, got: usize| -> Result<(), TableError> {
            if got != n {
                return Err(TableError::LengthMismatch {
                    column,
                    expected: n,
                    got,
                });
            }
            Ok(())
        };
        check("w1", self.w1.len())?;
        check("flux", self.flux.len())?;
        check("error", self.error.len())?;
        check("exptime", self.exptime.len())?;
        check("flags", self.flags.len())?;
        check("instrument", self.instrument.len())?;
        check("normfac", self.normfac.len())?;
        check("start", self.start.len())?;
        check("end", self.end.len())?;

        for i in 0..n {
            if self.w0[i] >= self.w1[i] {
                return Err(TableError::InvertedBin {
                    index: i,
                    w0: self.w0[i],
                    w1: self.w1[i],
                });
            }
            if i + 1 < n && self.w1[i] > self.w0[i + 1] {
                return Err(TableError::OverlappingBins {
                    index: i,
                    w1: self.w1[i],
                    next_w0: self.w0[i + 1],
                });
            }
        }
        Ok(())
    }

    /// A copy containing only the rows in `range`, metadata intact.
    pub fn sliced(&self, range: Range<usize>) -> SpecTable {
        SpecTable {
            w0: self.w0[range.clone()].to_vec(),
            w1: self.w1[range.clone()].to_vec(),
            flux: self.flux[range.clone()].to_vec(),
            error: self.error[range.clone()].to_vec(),
            exptime: self.exptime[range.clone()].to_vec(),
            flags: self.flags[range.clone()].to_vec(),
            instrument: self.instrument[range.clone()].to_vec(),
            normfac: self.normfac[range.clone()].to_vec(),
            start: self.start[range.clone()].to_vec(),
            end: self.end[range].to_vec(),
            meta: self.meta.clone(),
        }
    }

    /// A copy keeping only rows where `mask` is true.
    pub fn filtered(&self, mask: &[bool]) -> SpecTable {
        let keep = |v: &[f64]| -> Vec<f64> {
            v.iter()
                .zip(mask)
                .filter(|(_, &m)| m)
                .map(|(&x, _)| x)
                .collect()
        };
        let keep_i = |v: &[i32]| -> Vec<i32> {
            v.iter()
                .zip(mask)
                .filter(|(_, &m)| m)
                .map(|(&x, _)| x)
                .collect()
        };
        SpecTable {
            w0: keep(&self.w0),
            w1: keep(&self.w1),
            flux: keep(&self.flux),
            error: keep(&self.error),
            exptime: keep(&self.exptime),
            flags: keep_i(&self.flags),
            instrument: keep_i(&self.instrument),
            normfac: keep(&self.normfac),
            start: keep(&self.start),
            end: keep(&self.end),
            meta: self.meta.clone(),
        }
    }

    /// Trim bins that fall off the detector's valid region.
    ///
    /// The filename decides the flag convention: `_cos_` products mark
    /// off-detector bins with bit 128, `_sts_` products with bits 128 | 4.
    /// With two or more flagged blocks the contiguous good run bounded by the
    /// first and last block is kept; with exactly one, flagged rows are
    /// dropped; names that are neither COS nor STIS come back unchanged.
    pub fn trim_off_detector(&self) -> SpecTable {
        let base = Path::new(&self.meta.filename)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.meta.filename)
            .to_string();
        let bad_bits = if base.contains("_cos_") {
            DQ_OFF_DETECTOR
        } else if base.contains("_sts_") {
            DQ_OFF_DETECTOR | DQ_STIS_BAD
        } else {
            return self.clone();
        };
        let bad: Vec<bool> = self.flags.iter().map(|&f| f & bad_bits != 0).collect();
        let (beg, end) = binmath::block_edges(&bad);
        if beg.len() >= 2 {
            log::debug!(
                "trimming {} to rows {}..{}",
                base,
                end[0],
                beg[beg.len() - 1]
            );
            self.sliced(end[0]..beg[beg.len() - 1])
        } else if beg.len() == 1 {
            let good: Vec<bool> = bad.iter().map(|&b| !b).collect();
            self.filtered(&good)
        } else {
            self.clone()
        }
    }

    /// Instrument names contributing anywhere in the table.
    pub fn contributing_instruments(&self) -> Vec<&'static str> {
        instruments::decode(self.instrument_union())
    }
}
