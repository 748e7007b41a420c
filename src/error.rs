use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum CatalogError {
    #[error("Not found: {0}")]
    #[diagnostic(code(catalog::not_found))]
    NotFound(String),
    #[error("Already exists: {0}")]
    #[diagnostic(code(catalog::already_exists))]
    AlreadyExists(String),
    #[error("Invalid argument: {0}")]
    #[diagnostic(code(catalog::invalid_argument))]
    InvalidArgument(String),
    #[error("CSV error: {0}")]
    #[diagnostic(code(catalog::csv))]
    CsvError(#[from] csv::Error),
    #[error("JSON error: {0}")]
    #[diagnostic(code(catalog::json))]
    JsonError(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    #[diagnostic(code(catalog::io))]
    IoError(#[from] std::io::Error),
    #[error("Internal error: {0}")]
    #[diagnostic(code(catalog::internal))]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for CatalogError {
    fn from(err: rocksdb::Error) -> Self {
        CatalogError::InternalError(Box::new(err))
    }
}

impl CatalogError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn invalid(what: impl Into<String>) -> Self {
        Self::InvalidArgument(what.into())
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
