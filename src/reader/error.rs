/// Errors that can occur while reading spectra
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Filename does not resolve or follow the naming convention
    #[error("filename error: {0}")]
    Name(#[from] crate::naming::NameError),

    /// FITS container error
    #[error("FITS error: {0}")]
    Fits(#[from] crate::fits::FitsError),

    /// The produced table violates the canonical-table contract
    #[error("table error: {0}")]
    Table(#[from] crate::spectbl::TableError),

    /// No parser for this extension/observatory combination
    #[error("no parser for the format of {file}")]
    UnsupportedFormat {
        /// The file nobody can parse.
        file: String,
    },

    /// Upstream data violates an assumption the parser depends on
    #[error("inconsistent spectrum in {file}: {detail}")]
    DataConsistency {
        /// Offending file.
        file: String,
        /// What was violated.
        detail: String,
    },

    /// An expected companion extension or variable is absent
    #[error("missing companion data in {file}: {detail}")]
    MissingCompanion {
        /// Offending file.
        file: String,
        /// What was expected.
        detail: String,
    },

    /// Malformed text, CSV, or IDL-save content
    #[error("cannot parse {file}: {detail}")]
    Parse {
        /// Offending file.
        file: String,
        /// What failed.
        detail: String,
    },

    /// A rejection rule names a table index the file does not produce
    #[error("rejection rule for {file} names table {index}, which does not exist")]
    RejectIndex {
        /// Offending file.
        file: String,
        /// Out-of-range table index.
        index: usize,
    },
}
