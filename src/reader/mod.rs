//! Format-dispatching spectrum ingestion.
//!
//! [`read`] resolves a file's parser from its name alone, parses it into
//! one or more canonical tables, and applies any per-star rejection rules
//! before handing the tables back in file order.

mod error;


pub use error::ReadError;

use std::path::{Path, PathBuf};

use crate::formats;
use crate::naming;
use crate::settings;
use crate::spectbl::SpecTable;

/// Basename substrings exempt from rejection rules; these products were
/// assembled deliberately and rules target their raw inputs instead.
const REJECT_EXEMPT: [&str; 2] = ["coadd", "custom"];

/// Knobs for [`read`].
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    /// Directory holding per-star settings files; `None` disables
    /// rejection filtering.
    pub settings_dir: Option<PathBuf>,
}

/// Read one file into canonical tables.
///
/// Multi-order instrument files produce one table per order, in file
/// order. Rejection rules from the star's settings drop tables by
/// index; a rule naming an index the file does not produce is an error,
/// since it means the rule no longer matches the data it was written for.
pub fn read(path: &Path, options: &ReadOptions) -> Result<Vec<SpecTable>, ReadError> {
    let path = naming::validpath(path)?;
    let format = formats::resolve(&path)?;
    log::info!("reading {} as {:?}", path.display(), format);
    let mut tables = formats::parse(format, &path)?;

    let base = formats::basename(&path).to_ascii_lowercase();
    if REJECT_EXEMPT.iter().any(|m| base.contains(m)) {
        return Ok(tables);
    }
    if let Some(dir) = &options.settings_dir {
        let star = naming::parse_star(&path)?;
        let rules = settings::load(dir, &star)?;
        for rule in &rules.reject_specs {
            if !base.contains(&rule.config.to_ascii_lowercase()) {
                continue;
            }
            if rule.index >= tables.len() {
                return Err(ReadError::RejectIndex {
                    file: formats::basename(&path),
                    index: rule.index,
                });
            }
            log::info!(
                "rejecting table {} of {} per settings for {}",
                rule.index,
                path.display(),
                star
            );
            tables.remove(rule.index);
        }
    }
    Ok(tables)
}

/// Read several files, flattening their tables into one list in argument
/// order. Fails on the first unreadable file.
pub fn read_all(paths: &[PathBuf], options: &ReadOptions) -> Result<Vec<SpecTable>, ReadError> {
    let mut all = Vec::new();
    for path in paths {
        all.extend(read(path, options)?);
    }
    Ok(all)
}
