//! Per-format spectrum parsers.
//!
//! Each submodule turns one storage format into canonical spectrum
//! tables. Which parser applies is decided here, from the file
//! extension and the observatory field of the filename, never by
//! content sniffing:
//!
//! | format | extension | selector |
//! |--------|-----------|----------|
//! | standardized FITS | `.fits` | basename contains `coadd`, `custom`, `mod`, or `panspec` |
//! | HST x1d/sx1 | `.fits` | observatory `hst` |
//! | XMM-Newton | `.fits` | observatory `xmm` |
//! | plain text | `.txt` | basename contains `young` |
//! | CSV export | `.csv` | observatory `tmd` or `src` |
//! | IDL save | `.sav`, `.idlsav` | any |

use std::path::Path;

use crate::naming;
use crate::reader::ReadError;
use crate::spectbl::SpecTable;

pub mod csv;
pub mod hst;
pub mod idl;
pub mod stdfits;
pub mod text;
pub mod xmm;

#[cfg(test)]
mod tests;

/// Basename substrings that mark a file as already standardized.
const STD_MARKERS: [&str; 4] = ["coadd", "custom", "mod", "panspec"];

/// The storage formats this crate can parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Canonical FITS written by [`crate::writer`].
    StdFits,
    /// HST COS/STIS extracted-spectrum FITS.
    HstFits,
    /// XMM-Newton fluxed-spectrum FITS.
    XmmFits,
    /// Whitespace-delimited text export.
    Text,
    /// Two-column CSV export.
    Csv,
    /// IDL save file.
    IdlSav,
}

/// Decides which parser handles `path`.
///
/// Files whose extension/observatory combination is not in the table
/// above fail with [`ReadError::UnsupportedFormat`] instead of being
/// guessed at.
pub fn resolve(path: &Path) -> Result<FileFormat, ReadError> {
    let ext = naming::extension(path)?;
    let base = basename(path).to_ascii_lowercase();
    let unsupported = || ReadError::UnsupportedFormat {
        file: path.display().to_string(),
    };
    match ext.as_str() {
        "fits" | "fit" => {
            if STD_MARKERS.iter().any(|m| base.contains(m)) {
                return Ok(FileFormat::StdFits);
            }
            match naming::parse_observatory(path)?.as_str() {
                "hst" => Ok(FileFormat::HstFits),
                "xmm" => Ok(FileFormat::XmmFits),
                _ => Err(unsupported()),
            }
        }
        "txt" => {
            if base.contains("young") {
                Ok(FileFormat::Text)
            } else {
                Err(unsupported())
            }
        }
        "csv" => match naming::parse_observatory(path)?.as_str() {
            "tmd" | "src" => Ok(FileFormat::Csv),
            _ => Err(unsupported()),
        },
        "sav" | "idlsav" => Ok(FileFormat::IdlSav),
        _ => Err(unsupported()),
    }
}

/// Parses `path` with the parser `format` names.
pub fn parse(format: FileFormat, path: &Path) -> Result<Vec<SpecTable>, ReadError> {
    match format {
        FileFormat::StdFits => stdfits::read(path),
        FileFormat::HstFits => hst::read(path),
        FileFormat::XmmFits => xmm::read(path),
        FileFormat::Text => text::read(path),
        FileFormat::Csv => csv::read(path),
        FileFormat::IdlSav => idl::read(path),
    }
}

/// Lossy basename, for substring checks and error messages.
pub(crate) fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
