use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("could not persist account {account}; the change is held in memory only")]
    StorageFailure {
        account: String,
        #[source]
        source: std::io::Error,
    },
    #[error("account storage I/O failed")]
    FileError(#[from] std::io::Error),
    #[error("could not write ledger rows")]
    CsvError(#[from] csv::Error),
    #[error("corrupt record for account {account}: {reason}")]
    CorruptRecord { account: String, reason: String },
    #[error("account {0} appears more than once in the roster")]
    DuplicateAccount(String),
    #[error("could not parse configuration")]
    ConfigError(#[from] serde_json::Error),
    #[error("terminal I/O failed")]
    TerminalError(#[source] std::io::Error),
    #[error(transparent)]
    BusinessError(#[from] crate::domain::error::Error),
}

impl Error {
    /// True when an in-memory mutation succeeded but was not written out.
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, Error::StorageFailure { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
