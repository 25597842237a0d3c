//! # FITS container codec
//!
//! A focused reader/writer for the FITS structures this crate actually
//! exchanges: an empty primary HDU followed by binary-table extensions with
//! scalar or fixed-repeat vector columns (TFORM `D`, `E`, `J`, `I`, `rA`,
//! `rD`, ...). Headers support standard 80-byte cards, COMMENT/HISTORY
//! commentary, and the HIERARCH convention for keywords longer than eight
//! characters (the XMM products use them).
//!
//! This is deliberately not a general FITS library: no images beyond an
//! empty primary, no ASCII tables, no variable-length arrays, no scaling
//! keywords.

mod bintable;
mod file;
mod header;

#[cfg(test)]
mod tests;

pub use bintable::{BinTable, Column, ColumnData};
pub use file::FitsFile;
pub use header::{Card, Header, Value};

use std::path::PathBuf;

/// FITS blocks, headers and data alike, come in 2880-byte units.
pub const BLOCK_SIZE: usize = 2880;
/// Each header card is an 80-byte record.
pub const CARD_SIZE: usize = 80;
/// Cards per 2880-byte header block.
pub const CARDS_PER_BLOCK: usize = BLOCK_SIZE / CARD_SIZE;

/// Errors raised by the FITS codec.
#[derive(Debug, thiserror::Error)]
pub enum FitsError {
    /// Underlying file I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Structurally invalid header or data.
    #[error("malformed FITS: {0}")]
    Malformed(String),

    /// Ran out of bytes before the structure completed.
    #[error("unexpected end of file")]
    UnexpectedEof,

    /// A required header keyword is absent or has the wrong type.
    #[error("missing or invalid keyword {0}")]
    MissingKeyword(String),

    /// No extension with the requested EXTNAME.
    #[error("no HDU named {0}")]
    HduNotFound(String),

    /// No column with the requested TTYPE.
    #[error("no column named {0}")]
    ColumnNotFound(String),

    /// A column holds a different type than the caller asked for.
    #[error("column {column} is not {expected}")]
    TypeMismatch {
        /// Column name.
        column: String,
        /// Type the caller requested.
        expected: &'static str,
    },

    /// A TFORM code outside the supported subset.
    #[error("unsupported TFORM {0}")]
    UnsupportedTform(String),

    /// An extension type outside the supported subset.
    #[error("unsupported XTENSION {0}")]
    UnsupportedExtension(String),

    /// Destination exists and overwrite was not requested.
    #[error("file exists (pass overwrite to replace): {0}")]
    AlreadyExists(PathBuf),

    /// Column data length inconsistent with the table's row count.
    #[error("column {column}: {got} values do not fit {rows} rows with repeat {repeat}")]
    BadColumnLength {
        /// Column name.
        column: String,
        /// Number of values supplied.
        got: usize,
        /// Declared row count.
        rows: usize,
        /// Declared repeat count.
        repeat: usize,
    },
}
