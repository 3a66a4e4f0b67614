//! In-memory dedup store for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::traits::WarrantStore;
use crate::types::{Fugitive, Warrant};

/// In-memory warrant and fugitive storage.
///
/// Data is lost when the store is dropped.
#[derive(Default)]
pub struct MemoryWarrantStore {
    warrants: RwLock<HashMap<String, Warrant>>,
    fugitives: RwLock<HashMap<String, Fugitive>>,
}

impl MemoryWarrantStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a recorded warrant by number.
    pub fn warrant(&self, number: &str) -> Option<Warrant> {
        self.warrants.read().unwrap().get(number).cloned()
    }

    /// Get a recorded fugitive by detail URL.
    pub fn fugitive(&self, detail_url: &str) -> Option<Fugitive> {
        self.fugitives.read().unwrap().get(detail_url).cloned()
    }

    pub fn fugitive_count(&self) -> usize {
        self.fugitives.read().unwrap().len()
    }
}

#[async_trait]
impl WarrantStore for MemoryWarrantStore {
    async fn exists(&self, number: &str) -> StoreResult<bool> {
        Ok(self.warrants.read().unwrap().contains_key(number))
    }

    async fn insert(&self, warrant: &Warrant) -> StoreResult<()> {
        let mut warrants = self.warrants.write().unwrap();
        if warrants.contains_key(&warrant.number) {
            return Err(StoreError::Duplicate {
                number: warrant.number.clone(),
            });
        }
        warrants.insert(warrant.number.clone(), warrant.clone());
        Ok(())
    }

    async fn record_fugitive(&self, fugitive: &Fugitive) -> StoreResult<()> {
        self.fugitives
            .write()
            .unwrap()
            .entry(fugitive.detail_url.clone())
            .or_insert_with(|| fugitive.clone());
        Ok(())
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.warrants.read().unwrap().len())
    }
}
