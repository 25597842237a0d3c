//! # Instrument provenance legend
//!
//! Every spectral bin records which instrument configurations contributed
//! flux to it as a bitwise OR of per-instrument codes. The set of known
//! configurations is closed and stable: codes are powers of two assigned by
//! position in [`INSTRUMENTS`], and the code↔name mapping (the "legend") is
//! embedded in every canonical file so serialized tables stay
//! self-describing.
//!
//! Names are the fixed-width `aaa_bbb_ccccc` token from the filename
//! convention (observatory, instrument, grating), 13 characters each.

use std::fmt;

/// Width of the legend name column in the canonical file.
pub const NAME_WIDTH: usize = 13;

/// The closed set of known instrument configurations, in bit order.
///
/// Codes must stay representable in an i16 legend column, so this table
/// never grows past 15 entries.
pub const INSTRUMENTS: [&str; 15] = [
    "hst_cos_g130m",
    "hst_cos_g160m",
    "hst_cos_g230l",
    "hst_sts_g140m",
    "hst_sts_e140m",
    "hst_sts_e230m",
    "hst_sts_e230h",
    "hst_sts_g230l",
    "hst_sts_g430l",
    "xmm_pn-_-----",
    "xmm_mos_-----",
    "mod_lya_young",
    "mod_euv_young",
    "mod_phx_-----",
    "oth_---_other",
];

/// Catch-all configuration for observatory conventions outside the table.
pub const OTHER: &str = "oth_---_other";

/// Bit code for the instrument at a given table index.
pub const fn code_at(index: usize) -> i32 {
    1 << index
}

/// Bit code for a named instrument configuration, if known.
pub fn code_of(name: &str) -> Option<i32> {
    INSTRUMENTS.iter().position(|&n| n == name).map(code_at)
}

/// Name of the instrument holding exactly the given single-bit code.
pub fn name_of(code: i32) -> Option<&'static str> {
    if code <= 0 || code.count_ones() != 1 {
        return None;
    }
    let index = code.trailing_zeros() as usize;
    INSTRUMENTS.get(index).copied()
}

/// Bit code for a filename-derived `aaa_bbb_ccccc` token.
///
/// Tokens outside the closed set map to the [`OTHER`] catch-all so files from
/// unlisted conventions (the tmd/src exports, the solar reference) still get
/// a legal power-of-two provenance code.
pub fn code_for_token(token: &str) -> i32 {
    code_of(token).unwrap_or_else(|| {
        // OTHER is a member of INSTRUMENTS, so this lookup cannot miss.
        code_of(OTHER).unwrap_or(1)
    })
}

/// The names of every instrument contributing to an OR-ed provenance value.
pub fn decode(value: i32) -> Vec<&'static str> {
    INSTRUMENTS
        .iter()
        .enumerate()
        .filter(|(i, _)| value & code_at(*i) != 0)
        .map(|(_, &n)| n)
        .collect()
}

/// Legend rows as written to the canonical file: `(name, bit code)`.
pub fn legend_rows() -> Vec<(&'static str, i16)> {
    INSTRUMENTS
        .iter()
        .enumerate()
        .map(|(i, &n)| (n, code_at(i) as i16))
        .collect()
}

/// Display an OR-ed provenance value as `name|name|...`.
pub struct Provenance(pub i32);

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = decode(self.0);
        if names.is_empty() {
            return write!(f, "(none)");
        }
        write!(f, "{}", names.join("|"))
    }
}
