use crate::domain::catalog::Entity;
use crate::domain::ports::EntityStore;
use crate::domain::predicate::Predicate;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A thread-safe in-memory store for one entity collection.
///
/// Uses `Arc<RwLock<HashMap<Uuid, T>>>` to allow shared concurrent access.
/// Clones share the same underlying map.
#[derive(Clone)]
pub struct InMemoryStore<T> {
    entities: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T> InMemoryStore<T> {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self {
            entities: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<T> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> EntityStore<T> for InMemoryStore<T> {
    async fn store(&self, entity: T) -> Result<()> {
        let mut entities = self.entities.write().await;
        entities.insert(entity.id(), entity);
        Ok(())
    }

    async fn store_all(&self, batch: Vec<T>) -> Result<()> {
        let mut entities = self.entities.write().await;
        for entity in batch {
            entities.insert(entity.id(), entity);
        }
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<T>> {
        let entities = self.entities.read().await;
        Ok(entities.get(&id).cloned())
    }

    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<T>> {
        let entities = self.entities.read().await;
        Ok(ids.iter().filter_map(|id| entities.get(id).cloned()).collect())
    }

    async fn find_all(&self, predicate: &Predicate<T>) -> Result<Vec<T>> {
        let entities = self.entities.read().await;
        Ok(entities
            .values()
            .filter(|entity| predicate.matches(entity))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{Atm, Branch};

    #[tokio::test]
    async fn test_in_memory_branch_store() {
        let store = InMemoryStore::<Branch>::new();
        let branch = Branch::new("Центральное отделение", "1111", "+7 495 111-11-11");

        store.store(branch.clone()).await.unwrap();
        let retrieved = store.get(branch.id).await.unwrap().unwrap();
        assert_eq!(retrieved, branch);

        assert!(store.get(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_in_memory_get_many_skips_unknown_ids() {
        let store = InMemoryStore::<Atm>::new();
        let first = Atm::new("A-1", "0001");
        let second = Atm::new("A-2", "0002");
        store
            .store_all(vec![first.clone(), second.clone()])
            .await
            .unwrap();

        let found = store
            .get_many(&[first.id, Uuid::new_v4(), second.id])
            .await
            .unwrap();
        assert_eq!(found, vec![first, second]);
    }

    #[tokio::test]
    async fn test_in_memory_find_all_applies_predicate() {
        let store = InMemoryStore::<Atm>::new();
        let mut with_nfc = Atm::new("A-1", "0001");
        with_nfc.has_nfc = true;
        let without_nfc = Atm::new("A-2", "0002");
        store
            .store_all(vec![with_nfc.clone(), without_nfc])
            .await
            .unwrap();

        let predicate = Predicate::all().and("nfc", |atm: &Atm| atm.has_nfc);
        let found = store.find_all(&predicate).await.unwrap();
        assert_eq!(found, vec![with_nfc]);
        assert_eq!(store.all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_in_memory_store_overwrites_by_id() {
        let store = InMemoryStore::<Branch>::new();
        let mut branch = Branch::new("Отделение", "2000", "+7 000");
        store.store(branch.clone()).await.unwrap();

        branch.is_closed = true;
        store.store(branch.clone()).await.unwrap();

        let all = store.all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].is_closed);
    }
}
