//! # panspec CLI
//!
//! Command-line front end for normalizing heterogeneous astronomical
//! spectra into the canonical FITS format.
//!
//! ## Usage
//!
//! ```bash
//! # Normalize an instrument product
//! panspec normalize u_hst_cos_g130m_gj832_x1d.fits
//!
//! # Inspect any supported file
//! panspec info w_hst_cos_g130m_gj832_panspec.fits
//!
//! # Dump flux vs. wavelength as text
//! panspec export-ascii w_hst_cos_g130m_gj832_panspec.fits flux.txt
//! ```

use anyhow::Result;
use clap::Parser;

use panspec::cli;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    cli::init_logging(args.verbosity());
    cli::dispatch(args)
}
