use std::error::Error;
use std::fmt;

use crate::infrastructure::bitcoin::BitcoinClientError;
use crate::infrastructure::persistence::error::DbError;

/// Error type for dunestone decoding and transition processing
#[derive(Debug)]
pub enum DuneError {
    BitcoinClientError(BitcoinClientError),
    DbError(DbError),
    /// Amount arithmetic left the u128 range; only a decoder bug can cause this
    Overflow(String),
    /// A transaction reached a state Bitcoin consensus rules should make impossible
    ProcessingError(String),
}

impl fmt::Display for DuneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuneError::BitcoinClientError(e) => write!(f, "Bitcoin client error: {}", e),
            DuneError::DbError(e) => write!(f, "Database error: {}", e),
            DuneError::Overflow(msg) => write!(f, "Balance overflow: {}", msg),
            DuneError::ProcessingError(msg) => write!(f, "Dune processing error: {}", msg),
        }
    }
}

impl Error for DuneError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DuneError::BitcoinClientError(e) => Some(e),
            DuneError::DbError(e) => Some(e),
            DuneError::Overflow(_) => None,
            DuneError::ProcessingError(_) => None,
        }
    }
}

impl From<BitcoinClientError> for DuneError {
    fn from(error: BitcoinClientError) -> Self {
        DuneError::BitcoinClientError(error)
    }
}

impl From<DbError> for DuneError {
    fn from(error: DbError) -> Self {
        DuneError::DbError(error)
    }
}

/// Error type for block processing operations
#[derive(Debug)]
pub enum BlockProcessorError {
    BitcoinClientError(BitcoinClientError),
    DuneError(DuneError),
    DbError(DbError),
    ConfigError(String),
    ProcessingError(String),
}

impl fmt::Display for BlockProcessorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockProcessorError::BitcoinClientError(e) => write!(f, "Bitcoin client error: {}", e),
            BlockProcessorError::DuneError(e) => write!(f, "Dune error: {}", e),
            BlockProcessorError::DbError(e) => write!(f, "Database error: {}", e),
            BlockProcessorError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            BlockProcessorError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
        }
    }
}

impl Error for BlockProcessorError {}

impl From<BitcoinClientError> for BlockProcessorError {
    fn from(error: BitcoinClientError) -> Self {
        BlockProcessorError::BitcoinClientError(error)
    }
}

impl From<DuneError> for BlockProcessorError {
    fn from(error: DuneError) -> Self {
        BlockProcessorError::DuneError(error)
    }
}

impl From<DbError> for BlockProcessorError {
    fn from(error: DbError) -> Self {
        BlockProcessorError::DbError(error)
    }
}
