//! Adapters behind the domain ports: storage backends and the wall clock.

pub mod clock;
pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;

use crate::domain::ports::{AtmStoreBox, BranchStoreBox};
use crate::error::Result;
use in_memory::InMemoryStore;
use std::path::Path;

/// Opens the branch and ATM stores.
///
/// A `db_path` selects RocksDB when the `storage-rocksdb` feature is compiled
/// in; otherwise both collections live in memory.
pub fn open_stores(db_path: Option<&Path>) -> Result<(BranchStoreBox, AtmStoreBox)> {
    #[cfg(feature = "storage-rocksdb")]
    if let Some(path) = db_path {
        let store = rocksdb::RocksDBStore::open(path)?;
        tracing::info!(path = %path.display(), "Using RocksDB storage");
        let branches: BranchStoreBox = Box::new(store.clone());
        let atms: AtmStoreBox = Box::new(store);
        return Ok((branches, atms));
    }

    #[cfg(not(feature = "storage-rocksdb"))]
    if db_path.is_some() {
        tracing::warn!(
            "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to in-memory storage."
        );
    }

    let branches: BranchStoreBox = Box::new(InMemoryStore::new());
    let atms: AtmStoreBox = Box::new(InMemoryStore::new());
    Ok((branches, atms))
}
