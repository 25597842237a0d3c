/// Column names as constants for type safety
/// Lower wavelength bin edge (Angstroms)
pub const W0: &str = "w0";
/// Upper wavelength bin edge (Angstroms)
pub const W1: &str = "w1";
/// Flux density (erg s-1 cm-2 Angstrom-1)
pub const FLUX: &str = "flux";
/// 1-sigma uncertainty on the flux density
pub const ERROR: &str = "error";
/// Effective exposure time contributing to the bin (seconds)
pub const EXPTIME: &str = "exptime";
/// Bitwise data-quality flags (instrument-specific bit meanings)
pub const FLAGS: &str = "flags";
/// Bitwise OR of contributing instrument codes
pub const INSTRUMENT: &str = "instrument";
/// Multiplicative renormalization applied to the bin
pub const NORMFAC: &str = "normfac";
/// Observation start time covering the bin (MJD)
pub const START: &str = "start";
/// Observation end time covering the bin (MJD)
pub const END: &str = "end";

/// Name column of the legend extension
pub const LEGEND_NAMES: &str = "instruments";
/// Bit-code column of the legend extension
pub const LEGEND_VALUES: &str = "bitvalues";

/// Data-quality bit marking off-detector bins
pub const DQ_OFF_DETECTOR: i32 = 128;
/// Additional STIS data-quality bit treated as off-detector
pub const DQ_STIS_BAD: i32 = 4;
