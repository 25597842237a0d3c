use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::reader::{self, ReadOptions};
use crate::writer;

/// Export one column of one table as two-column ASCII.
pub fn run(input: PathBuf, output: PathBuf, column: &str, index: usize) -> Result<()> {
    let tables = reader::read(&input, &ReadOptions::default())
        .with_context(|| format!("failed to read {}", input.display()))?;
    let table = tables.get(index).with_context(|| {
        format!(
            "{} holds {} tables, index {index} is out of range",
            input.display(),
            tables.len()
        )
    })?;
    writer::write_ascii(table, &output, column)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!("{} rows -> {}", table.len(), output.display());
    Ok(())
}
