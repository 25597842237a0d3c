//! # panspec - Panchromatic Spectrum Normalization
//!
//! `panspec` ingests heterogeneous astronomical spectra and normalizes
//! them into one canonical bin-edge table, with a bidirectional FITS
//! serialization whose files are self-describing down to per-bin
//! instrument provenance.
//!
//! ## Key Features
//!
//! - **One table for everything**: HST COS/STIS extractions, XMM-Newton
//!   fluxed spectra, IDL save files, text and CSV exports all land in the
//!   same ten-column layout, in Angstrom/cgs units.
//!
//! - **Explicit bin edges**: wavelength bins carry both edges rather than
//!   midpoints, so gapped and irregular grids survive round trips.
//!
//! - **Bitwise provenance**: every bin records the OR of the instrument
//!   codes that contributed to it, and every written file embeds the
//!   legend decoding those bits.
//!
//! - **Name-driven dispatch**: the `w_aaa_bbb_ccccc_<star>` filename
//!   convention selects the parser; file contents are never sniffed.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use panspec::reader::{self, ReadOptions};
//! use panspec::writer;
//!
//! let tables = reader::read(
//!     Path::new("u_hst_cos_g130m_gj832_x1d.fits"),
//!     &ReadOptions::default(),
//! )?;
//! for table in &tables {
//!     println!("{} bins from {:?}", table.len(), table.contributing_instruments());
//! }
//! writer::write_fits(&tables[0], Path::new("w_hst_cos_g130m_gj832_panspec.fits"), false)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`spectbl`]: the Canonical Spectrum Table and its builder
//! - [`schema`]: column names, order, and FITS extension layout
//! - [`instruments`]: the closed instrument legend and bit codes
//! - [`formats`]: one parser per storage format
//! - [`reader`]: dispatch, rejection filtering, multi-file ingestion
//! - [`writer`]: canonical FITS and ASCII output
//! - [`fits`]: the minimal FITS binary-table codec everything rides on
//! - [`binmath`]: midpoint/edge conversions and mask-block arithmetic
//! - [`naming`]: filename-convention parsing
//! - [`settings`]: per-star JSON settings (rejection rules)

pub mod binmath;
pub mod cli;
pub mod fits;
pub mod formats;
pub mod instruments;
pub mod naming;
pub mod reader;
pub mod schema;
pub mod settings;
pub mod spectbl;
pub mod writer;

pub use reader::{read, read_all, ReadError, ReadOptions};
pub use spectbl::{SpecTable, SpecTableBuilder, TableError, TableMeta};
pub use writer::{write_ascii, write_fits, WriteError};
