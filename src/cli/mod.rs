use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod export;
mod info;
mod normalize;

/// panspec - Panchromatic Spectrum Normalizer
#[derive(Parser)]
#[command(name = "panspec")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize instrument spectra into canonical FITS files
    Normalize {
        /// Input spectrum files, any supported format
        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory (defaults to alongside each input)
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Directory holding per-star settings files with rejection rules
        #[arg(long, value_name = "DIR")]
        settings_dir: Option<PathBuf>,

        /// Overwrite existing output files
        #[arg(long)]
        overwrite: bool,
    },

    /// Display information about a spectrum file
    Info {
        /// Input spectrum file path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Export one column of a spectrum as two-column ASCII
    ExportAscii {
        /// Input spectrum file path
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output text file path
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Column to export alongside the bin midpoints
        #[arg(short, long, default_value = "flux")]
        column: String,

        /// Which table to export when the file holds several
        #[arg(short, long, default_value = "0")]
        table: usize,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Normalize {
            inputs,
            output_dir,
            settings_dir,
            overwrite,
        } => normalize::run(inputs, output_dir, settings_dir, overwrite),
        Commands::Info { file } => info::run(file),
        Commands::ExportAscii {
            input,
            output,
            column,
            table,
        } => export::run(input, output, &column, table),
    }
}
