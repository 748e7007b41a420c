use super::catalog::{Atm, Branch, Entity};
use super::predicate::Predicate;
use crate::error::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::sync::Arc;
use uuid::Uuid;

/// Storage for one entity collection.
///
/// A single `store` call is atomic: an entity and its embedded schedule are
/// written as one unit. `store_all` writes the whole batch or nothing.
#[async_trait]
pub trait EntityStore<T: Entity>: Send + Sync {
    async fn store(&self, entity: T) -> Result<()>;
    async fn store_all(&self, entities: Vec<T>) -> Result<()>;
    async fn get(&self, id: Uuid) -> Result<Option<T>>;
    /// Ids with no stored entity are skipped.
    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<T>>;
    async fn find_all(&self, predicate: &Predicate<T>) -> Result<Vec<T>>;

    async fn all(&self) -> Result<Vec<T>> {
        self.find_all(&Predicate::all()).await
    }
}

pub type BranchStoreBox = Box<dyn EntityStore<Branch>>;
pub type AtmStoreBox = Box<dyn EntityStore<Atm>>;

/// Source of the current local date and time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

pub type ClockRef = Arc<dyn Clock>;
