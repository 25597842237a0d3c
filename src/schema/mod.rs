//! # Canonical spectrum schema
//!
//! Defines the column layout of the canonical FITS file: one row per
//! wavelength bin, ten columns, ascending wavelength order. Bins within a
//! table never overlap; gaps appear only where the source data is gapped.
//!
//! | Column | FITS type | Description |
//! |--------|-----------|-------------|
//! | w0 | D | lower wavelength bin edge (Å) |
//! | w1 | D | upper wavelength bin edge (Å) |
//! | flux | D | flux density (erg s-1 cm-2 Å-1) |
//! | error | D | 1-sigma uncertainty, flux units |
//! | exptime | D | effective exposure time for the bin (s) |
//! | flags | J | bitwise data-quality flags |
//! | instrument | J | bitwise OR of contributing instrument codes |
//! | normfac | D | multiplicative renormalization applied to the bin |
//! | start | D | observation start covering the bin (MJD) |
//! | end | D | observation end covering the bin (MJD) |
//!
//! The `legend` extension maps each instrument bit code to its name; a
//! `sourcespecs` extension lists contributing files for combination products.

/// Column name constants.
pub mod columns;

pub use columns::*;

/// Name of the data extension in a canonical file.
pub const SPECTRUM_EXT: &str = "spectrum";

/// Name of the instrument-legend extension.
pub const LEGEND_EXT: &str = "legend";

/// Name of the optional source-file-list extension.
pub const SOURCESPECS_EXT: &str = "sourcespecs";

/// Header keyword carrying the file's own name.
pub const KEY_FILENAME: &str = "FILENAME";

/// Header keyword carrying the derived star/instrument identifier.
pub const KEY_NAME: &str = "NAME";

/// Explanatory comment written with the legend extension.
pub const LEGEND_COMMENT: &str = "This extension is a legend for the integer identifiers in the \
     instrument column of the previous extension. Instruments are identified \
     by bitwise flags so that any combination of instruments contributing to \
     the data within a spectral element can be identified together. For \
     example, if instruments 4 and 16, 100 and 10000 in binary, both \
     contribute to the data in a bin, then that bin will have the value 20, \
     or 10100 in binary, to signify that both instruments 4 and 16 have \
     contributed. This is identical to the handling of bitwise data quality \
     flags.";

/// Explanatory comment written with the sourcespecs extension.
pub const SOURCESPECS_COMMENT: &str =
    "This extension contains a list of the source files that were incorporated into this spectrum.";

/// Canonical column order.
pub const COLUMN_ORDER: [&str; 10] = [
    columns::W0,
    columns::W1,
    columns::FLUX,
    columns::ERROR,
    columns::EXPTIME,
    columns::FLAGS,
    columns::INSTRUMENT,
    columns::NORMFAC,
    columns::START,
    columns::END,
];

/// Free-text description written as `TDESC<n>` for each column, in order.
pub const COLUMN_DESCRIPTIONS: [&str; 10] = [
    "left (short wavelength) edge of the spectral bin, Angstroms",
    "right (long wavelength) edge of the spectral bin, Angstroms",
    "flux density, erg s-1 cm-2 Angstrom-1",
    "1-sigma error on the flux density, same units",
    "cumulative exposure time for the bin, s",
    "bitwise data quality flags (128 = off detector)",
    "bitwise OR of the codes of instruments contributing to the bin",
    "multiplicative normalization applied to the bin",
    "start time of the observations covering the bin, MJD",
    "end time of the observations covering the bin, MJD",
];
