use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::reader::{self, ReadOptions};
use crate::writer;

/// Normalize each input into canonical FITS files next to it (or under
/// `output_dir`). Multi-table inputs get a numbered suffix per table.
pub fn run(
    inputs: Vec<PathBuf>,
    output_dir: Option<PathBuf>,
    settings_dir: Option<PathBuf>,
    overwrite: bool,
) -> Result<()> {
    let options = ReadOptions { settings_dir };
    for input in &inputs {
        let tables = reader::read(input, &options)
            .with_context(|| format!("failed to read {}", input.display()))?;
        let many = tables.len() > 1;
        for (i, table) in tables.iter().enumerate() {
            let dest = output_path(input, output_dir.as_deref(), if many { Some(i) } else { None });
            writer::write_fits(table, &dest, overwrite)
                .with_context(|| format!("failed to write {}", dest.display()))?;
            println!(
                "{} -> {} ({} bins)",
                input.display(),
                dest.display(),
                table.len()
            );
        }
    }
    Ok(())
}

fn output_path(input: &std::path::Path, dir: Option<&std::path::Path>, index: Option<usize>) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "spectrum".to_string());
    let name = match index {
        Some(i) => format!("{stem}_panspec_{i}.fits"),
        None => format!("{stem}_panspec.fits"),
    };
    match dir {
        Some(d) => d.join(name),
        None => input.with_file_name(name),
    }
}
