use thiserror::Error;

/// Failures while loading the shipped CSV data
///
/// Any of these makes the table view unavailable; the web layer turns them
/// into a blocking error page with a retry link.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: column '{column}' {reason}")]
    Malformed {
        line: u64,
        column: &'static str,
        reason: String,
    },

    #[error("line {line}: symbol is empty")]
    EmptySymbol { line: u64 },

    #[error("line {line}: '{symbol}' is not a valid gene symbol")]
    InvalidSymbol { line: u64, symbol: String },

    #[error("line {line}: duplicate symbol '{symbol}'")]
    DuplicateSymbol { line: u64, symbol: String },

    #[error("no record for symbol '{0}'")]
    NotFound(String),

    #[error("loader task failed: {0}")]
    Task(String),
}

impl DataError {
    /// True when the failure is a missing record rather than a broken source
    pub fn is_not_found(&self) -> bool {
        matches!(self, DataError::NotFound(_))
    }
}

/// Failures of the contact form relay
#[derive(Debug, Error)]
pub enum MailError {
    #[error("the '{0}' field is required")]
    MissingField(&'static str),

    #[error("'{0}' is not a valid email address")]
    InvalidAddress(String),

    #[error("mail transport is not configured")]
    NotConfigured,

    #[error("mail transport failed: {0}")]
    Transport(String),
}

impl MailError {
    /// Errors caused by the submitter, safe to show verbatim
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            MailError::MissingField(_) | MailError::InvalidAddress(_)
        )
    }
}

/// Failures while writing an export
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "web")]
    #[error("XLSX export failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}
