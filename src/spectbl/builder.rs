//! Vector constructor for canonical tables.

use super::{SpecTable, TableError, TableMeta};

/// Builds a [`SpecTable`] from wavelength edges and flux, defaulting the
/// remaining columns: error and flags zero, exposure and timestamps zero,
/// normalization 1.0, instrument code broadcast across every bin.
#[derive(Debug, Clone)]
pub struct SpecTableBuilder {
    w0: Vec<f64>,
    w1: Vec<f64>,
    flux: Vec<f64>,
    error: Option<Vec<f64>>,
    flags: Option<Vec<i32>>,
    exptime: f64,
    start: f64,
    end: f64,
    instrument: i32,
    normfac: f64,
    meta: TableMeta,
}

impl SpecTableBuilder {
    /// Start a builder from the required columns.
    pub fn new(w0: Vec<f64>, w1: Vec<f64>, flux: Vec<f64>) -> Self {
        Self {
            w0,
            w1,
            flux,
            error: None,
            flags: None,
            exptime: 0.0,
            start: 0.0,
            end: 0.0,
            instrument: 0,
            normfac: 1.0,
            meta: TableMeta::default(),
        }
    }

    /// Per-bin 1-sigma uncertainties.
    pub fn error(mut self, error: Vec<f64>) -> Self {
        self.error = Some(error);
        self
    }

    /// Per-bin data-quality flags.
    pub fn flags(mut self, flags: Vec<i32>) -> Self {
        self.flags = Some(flags);
        self
    }

    /// Exposure time broadcast to every bin.
    pub fn exptime(mut self, exptime: f64) -> Self {
        self.exptime = exptime;
        self
    }

    /// Observation start/end (MJD) broadcast to every bin.
    pub fn obs_window(mut self, start: f64, end: f64) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Instrument bit code broadcast to every bin.
    pub fn instrument(mut self, code: i32) -> Self {
        self.instrument = code;
        self
    }

    /// Normalization factor broadcast to every bin.
    pub fn normfac(mut self, normfac: f64) -> Self {
        self.normfac = normfac;
        self
    }

    /// Target star.
    pub fn star(mut self, star: impl Into<String>) -> Self {
        self.meta.star = star.into();
        self
    }

    /// Originating filename.
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.meta.filename = filename.into();
        self
    }

    /// Derived display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.meta.name = name.into();
        self
    }

    /// Contributing source files (combination products only).
    pub fn sourcespecs(mut self, sourcespecs: Vec<String>) -> Self {
        self.meta.sourcespecs = sourcespecs;
        self
    }

    /// Validate and produce the table.
    pub fn build(self) -> Result<SpecTable, TableError> {
        let n = self.w0.len();
        let table = SpecTable {
            w0: self.w0,
            w1: self.w1,
            flux: self.flux,
            error: self.error.unwrap_or_else(|| vec![0.0; n]),
            exptime: vec![self.exptime; n],
            flags: self.flags.unwrap_or_else(|| vec![0; n]),
            instrument: vec![self.instrument; n],
            normfac: vec![self.normfac; n],
            start: vec![self.start; n],
            end: vec![self.end; n],
            meta: self.meta,
        };
        table.validate()?;
        Ok(table)
    }
}
