use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::instruments::Provenance;
use crate::reader::{self, ReadOptions};

/// Display information about a spectrum file
pub fn run(file: PathBuf) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let tables = reader::read(&file, &ReadOptions::default())
        .with_context(|| format!("failed to read {}", file.display()))?;

    println!("panspec File Information");
    println!("========================");
    println!("File: {}", file.display());
    println!("Tables: {}", tables.len());
    println!();

    for (i, table) in tables.iter().enumerate() {
        println!("Table {}:", i);
        println!("  Name: {}", table.meta.name);
        println!("  Star: {}", table.meta.star);
        println!("  Bins: {}", table.len());
        if let (Some(first), Some(last)) = (table.w0.first(), table.w1.last()) {
            println!("  Wavelength range: {first:.2} - {last:.2} A");
        }
        println!("  Instruments: {}", Provenance(table.instrument_union()));
        if !table.meta.sourcespecs.is_empty() {
            println!("  Source files: {}", table.meta.sourcespecs.len());
            for source in &table.meta.sourcespecs {
                println!("    {source}");
            }
        }
        for comment in &table.meta.comments {
            println!("  Comment: {comment}");
        }
        println!();
    }
    Ok(())
}
