//! Reader for canonical FITS files, the inverse of [`crate::writer`].

use std::path::Path;

use crate::fits::FitsFile;
use crate::naming;
use crate::reader::ReadError;
use crate::schema;
use crate::spectbl::{SpecTable, TableMeta};

use super::basename;

/// Read a canonical file back into a single-table list.
pub fn read(path: &Path) -> Result<Vec<SpecTable>, ReadError> {
    let file = FitsFile::open(path)?;
    let spec = file.table(schema::SPECTRUM_EXT)?;

    let mut table = SpecTable {
        w0: spec.numeric_column(schema::W0)?,
        w1: spec.numeric_column(schema::W1)?,
        flux: spec.numeric_column(schema::FLUX)?,
        error: spec.numeric_column(schema::ERROR)?,
        exptime: spec.numeric_column(schema::EXPTIME)?,
        flags: spec.int_column(schema::FLAGS)?,
        instrument: spec.int_column(schema::INSTRUMENT)?,
        normfac: spec.numeric_column(schema::NORMFAC)?,
        start: spec.numeric_column(schema::START)?,
        end: spec.numeric_column(schema::END)?,
        meta: TableMeta::default(),
    };

    table.meta.filename = path.display().to_string();
    table.meta.name = naming::parse_name(path)?;
    table.meta.star = naming::parse_star(path)?;
    // A single blank comment is the writer's placeholder for "none".
    table.meta.comments = spec
        .header
        .comments()
        .into_iter()
        .filter(|c| !c.trim().is_empty())
        .collect();
    if let Some(sources) = file.table_opt(schema::SOURCESPECS_EXT) {
        table.meta.sourcespecs = sources.str_column(schema::SOURCESPECS_EXT)?;
    }

    table.validate()?;
    if basename(path).to_ascii_lowercase().contains("hst") {
        table = table.trim_off_detector();
    }
    Ok(vec![table])
}
