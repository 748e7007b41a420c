use crate::domain::catalog::{Atm, Branch, Entity};
use crate::domain::ports::EntityStore;
use crate::domain::predicate::Predicate;
use crate::error::{CatalogError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options, WriteBatch};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// A persistent store implementation using RocksDB.
///
/// Every entity collection (`Entity::COLLECTION`) lives in its own column
/// family, values are JSON, keys are the raw UUID bytes. An entity is written
/// with a single put, so its embedded schedule is replaced atomically.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the "branches" and "atms" column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let families = [Branch::COLLECTION, Atm::COLLECTION]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()));

        let db = DB::open_cf_descriptors(&opts, path, families)?;

        Ok(Self { db: Arc::new(db) })
    }

    fn family(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            CatalogError::InternalError(Box::new(std::io::Error::other(format!(
                "Column family '{}' not found",
                name
            ))))
        })
    }

    fn decode<T: Entity>(bytes: &[u8]) -> Result<T> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[async_trait]
impl<T: Entity> EntityStore<T> for RocksDBStore {
    async fn store(&self, entity: T) -> Result<()> {
        let cf = self.family(T::COLLECTION)?;
        let value = serde_json::to_vec(&entity)?;
        self.db.put_cf(&cf, entity.id().as_bytes(), value)?;
        Ok(())
    }

    async fn store_all(&self, entities: Vec<T>) -> Result<()> {
        let cf = self.family(T::COLLECTION)?;
        let mut batch = WriteBatch::default();
        for entity in &entities {
            batch.put_cf(&cf, entity.id().as_bytes(), serde_json::to_vec(entity)?);
        }
        self.db.write(batch)?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<T>> {
        let cf = self.family(T::COLLECTION)?;
        match self.db.get_cf(&cf, id.as_bytes())? {
            Some(bytes) => Ok(Some(Self::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<T>> {
        let mut found = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(entity) = EntityStore::<T>::get(self, *id).await? {
                found.push(entity);
            }
        }
        Ok(found)
    }

    async fn find_all(&self, predicate: &Predicate<T>) -> Result<Vec<T>> {
        let cf = self.family(T::COLLECTION)?;
        let mut matching = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            let entity: T = Self::decode(&value)?;
            if predicate.matches(&entity) {
                matching.push(entity);
            }
        }
        Ok(matching)
    }
}
