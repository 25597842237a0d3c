/// Errors that can occur while writing spectra
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// FITS container error
    #[error("FITS error: {0}")]
    Fits(#[from] crate::fits::FitsError),

    /// The table violates the canonical-table contract
    #[error("table error: {0}")]
    Table(#[from] crate::spectbl::TableError),

    /// An export asked for a column the schema does not define
    #[error("no exportable column named {0:?}")]
    UnknownColumn(String),
}
