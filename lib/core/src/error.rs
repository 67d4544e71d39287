use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("Invalid archetype data for '{id}': {reason}")]
    InvalidArchetypeData { id: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors raised by catalog adapters.
///
/// These never reach the caller as-is: the selector folds every variant into
/// [`Error::CatalogUnavailable`].
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

impl From<CatalogError> for Error {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Unavailable(msg) => Error::CatalogUnavailable(msg),
            other => Error::CatalogUnavailable(other.to_string()),
        }
    }
}
