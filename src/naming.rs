//! Filename-convention parsing and path validation.
//!
//! Data products follow `w_aaa_bbb_ccccc_<star>_... .<ext>` where `w` is the
//! spectral band tag, `aaa` the observatory (`mod` for modeled data), `bbb`
//! the instrument, and `ccccc` the grating or filter. Field positions are
//! load-bearing: the star token is the fifth underscore-delimited field.

use std::path::{Path, PathBuf};

/// Errors raised while resolving or parsing a data-product filename.
#[derive(Debug, thiserror::Error)]
pub enum NameError {
    /// The path does not point at an existing regular file.
    #[error("not a readable file: {0}")]
    NotFound(PathBuf),

    /// The filename has no extension to dispatch on.
    #[error("filename has no extension: {0}")]
    NoExtension(String),

    /// The filename does not carry the expected underscore-delimited fields.
    #[error("filename does not follow the w_aaa_bbb_ccccc_star convention: {0}")]
    Malformed(String),
}

/// Validate that a path points at an existing regular file.
pub fn validpath(path: &Path) -> Result<PathBuf, NameError> {
    if path.is_file() {
        Ok(path.to_path_buf())
    } else {
        Err(NameError::NotFound(path.to_path_buf()))
    }
}

fn basename(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or("")
}

fn field(path: &Path, index: usize) -> Result<&str, NameError> {
    let base = basename(path);
    base.split('_')
        .nth(index)
        .filter(|f| !f.is_empty())
        .ok_or_else(|| NameError::Malformed(base.to_string()))
}

/// The lowercased extension after the final `.`.
pub fn extension(path: &Path) -> Result<String, NameError> {
    let base = basename(path);
    base.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .ok_or_else(|| NameError::NoExtension(base.to_string()))
}

/// The observatory token (`aaa`).
pub fn parse_observatory(path: &Path) -> Result<String, NameError> {
    field(path, 1).map(str::to_string)
}

/// The spectrograph/detector token (`bbb`), e.g. `pn-` or `mos` for XMM.
pub fn parse_spectrograph(path: &Path) -> Result<String, NameError> {
    field(path, 2).map(str::to_string)
}

/// The target star token (fifth field).
pub fn parse_star(path: &Path) -> Result<String, NameError> {
    // Strip the extension so a bare `w_aaa_bbb_ccccc_star.fits` name parses.
    let star = field(path, 4)?;
    let star = star.split('.').next().unwrap_or(star);
    if star.is_empty() {
        return Err(NameError::Malformed(basename(path).to_string()));
    }
    Ok(star.to_string())
}

/// The `aaa_bbb_ccccc` instrument-configuration token.
pub fn instrument_token(path: &Path) -> Result<String, NameError> {
    Ok(format!(
        "{}_{}_{}",
        field(path, 1)?,
        field(path, 2)?,
        field(path, 3)?
    ))
}

/// Derived display identifier: instrument token plus star.
pub fn parse_name(path: &Path) -> Result<String, NameError> {
    Ok(format!("{}_{}", instrument_token(path)?, parse_star(path)?))
}
