//! Canonical FITS output.
//!
//! [`write_fits`] lays a table out exactly as [`crate::formats::stdfits`]
//! reads it back: an empty primary HDU, a `spectrum` binary table with the
//! ten schema columns and `TDESC<n>` descriptions, a `legend` extension
//! mapping instrument bit codes to names, and a `sourcespecs` extension
//! when the table lists contributing files.

mod error;


pub use error::WriteError;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::fits::{BinTable, FitsFile, Header, Value};
use crate::instruments;
use crate::schema;
use crate::spectbl::SpecTable;

/// Write `table` to `path` in the canonical layout, refusing to clobber
/// an existing file unless `overwrite` is set.
pub fn write_fits(table: &SpecTable, path: &Path, overwrite: bool) -> Result<(), WriteError> {
    table.validate()?;

    let mut spec = BinTable::new(Some(schema::SPECTRUM_EXT));
    for name in schema::COLUMN_ORDER {
        match name {
            schema::W0 => spec.push_f64(name, table.w0.clone())?,
            schema::W1 => spec.push_f64(name, table.w1.clone())?,
            schema::FLUX => spec.push_f64(name, table.flux.clone())?,
            schema::ERROR => spec.push_f64(name, table.error.clone())?,
            schema::EXPTIME => spec.push_f64(name, table.exptime.clone())?,
            schema::FLAGS => spec.push_i32(name, table.flags.clone())?,
            schema::INSTRUMENT => spec.push_i32(name, table.instrument.clone())?,
            schema::NORMFAC => spec.push_f64(name, table.normfac.clone())?,
            schema::START => spec.push_f64(name, table.start.clone())?,
            schema::END => spec.push_f64(name, table.end.clone())?,
            other => return Err(WriteError::UnknownColumn(other.to_string())),
        }
    }

    // The file records its own (destination) name, not the source's.
    spec.header
        .set(schema::KEY_FILENAME, Value::Str(path.display().to_string()));
    spec.header
        .set(schema::KEY_NAME, Value::Str(table.meta.name.clone()));
    for (i, desc) in schema::COLUMN_DESCRIPTIONS.iter().enumerate() {
        spec.header
            .set(&format!("TDESC{}", i + 1), Value::Str((*desc).to_string()));
    }
    if table.meta.comments.is_empty() {
        // A blank line keeps the COMMENT keyword present in every file.
        spec.header.push_comment("");
    } else {
        for comment in &table.meta.comments {
            spec.header.push_comment(comment);
        }
    }

    let mut tables = vec![spec, legend_table()?];
    if !table.meta.sourcespecs.is_empty() {
        tables.push(sourcespecs_table(&table.meta.sourcespecs)?);
    }

    log::info!("writing {} rows to {}", table.len(), path.display());
    let file = FitsFile {
        primary: Header::new(),
        tables,
    };
    file.write(path, overwrite)?;
    Ok(())
}

/// The instrument legend shipped with every canonical file.
fn legend_table() -> Result<BinTable, WriteError> {
    let (names, codes): (Vec<_>, Vec<_>) = instruments::legend_rows().into_iter().unzip();
    let mut legend = BinTable::new(Some(schema::LEGEND_EXT));
    legend.push_str(
        schema::LEGEND_NAMES,
        instruments::NAME_WIDTH,
        names.into_iter().map(str::to_string).collect(),
    )?;
    legend.push_i16(schema::LEGEND_VALUES, codes)?;
    legend.header.push_comment(schema::LEGEND_COMMENT);
    Ok(legend)
}

fn sourcespecs_table(sources: &[String]) -> Result<BinTable, WriteError> {
    let width = sources.iter().map(String::len).max().unwrap_or(1).max(1);
    let mut table = BinTable::new(Some(schema::SOURCESPECS_EXT));
    table.push_str(schema::SOURCESPECS_EXT, width, sources.to_vec())?;
    table.header.push_comment(schema::SOURCESPECS_COMMENT);
    Ok(table)
}

/// Export bin midpoints and one value column as two-column ASCII, one
/// row per bin.
pub fn write_ascii(table: &SpecTable, path: &Path, column: &str) -> Result<(), WriteError> {
    let values = match column {
        schema::W0 => &table.w0,
        schema::W1 => &table.w1,
        schema::FLUX => &table.flux,
        schema::ERROR => &table.error,
        schema::EXPTIME => &table.exptime,
        schema::NORMFAC => &table.normfac,
        schema::START => &table.start,
        schema::END => &table.end,
        other => return Err(WriteError::UnknownColumn(other.to_string())),
    };
    let mut out = BufWriter::new(File::create(path)?);
    for (mid, value) in table.midpoints().iter().zip(values) {
        writeln!(out, "{mid:.6e} {value:.6e}")?;
    }
    out.flush()?;
    Ok(())
}
