use crate::domain::catalog::Catalog;
use crate::error::Result;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Reads a seed catalog (`{"branches": [...], "atms": [...]}`) from JSON.
pub struct CatalogReader<R: Read> {
    source: R,
}

impl<R: Read> CatalogReader<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    pub fn read(self) -> Result<Catalog> {
        Ok(serde_json::from_reader(self.source)?)
    }
}

impl CatalogReader<BufReader<File>> {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}
