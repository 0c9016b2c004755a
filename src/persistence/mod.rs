//! User level storage
//!
//! Levels are stored as JSON blobs under `level.<id>` keys in a
//! `BlobStore`. New ids come from a seeded generator so runs are
//! reproducible.

pub mod store;

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::level::{Level, LevelError, codec};

pub use store::{BlobStore, DirStore, MemoryStore};

const LEVEL_KEY_PREFIX: &str = "level.";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
    #[error("invalid settings: {0}")]
    InvalidSettings(&'static str),
}

/// Listing entry for a stored level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSummary {
    pub id: String,
    pub name: String,
    pub element_count: usize,
}

/// Saves, lists, loads and deletes user levels
#[derive(Debug)]
pub struct LevelLibrary<S: BlobStore> {
    store: S,
    rng: Pcg32,
}

impl<S: BlobStore> LevelLibrary<S> {
    pub fn new(store: S, seed: u64) -> Self {
        Self {
            store,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn key(id: &str) -> String {
        format!("{LEVEL_KEY_PREFIX}{id}")
    }

    fn fresh_id(&mut self) -> Result<String, StoreError> {
        loop {
            let id = format!("custom-{:08x}", self.rng.next_u32());
            if self.store.get(&Self::key(&id))?.is_none() {
                return Ok(id);
            }
        }
    }

    /// Store `level` under `id`, or under a new id when `None`. Returns the id.
    pub fn save_level(&mut self, level: &Level, id: Option<&str>) -> Result<String, StoreError> {
        let id = match id {
            Some(id) => id.to_string(),
            None => self.fresh_id()?,
        };
        let json = serde_json::to_string(level)?;
        self.store.set(&Self::key(&id), &json)?;
        log::info!("Saved level '{}' as {}", level.name, id);
        Ok(id)
    }

    pub fn load_level(&self, id: &str) -> Result<Level, StoreError> {
        let json = self
            .store
            .get(&Self::key(id))?
            .ok_or_else(|| LevelError::NotFound(id.to_string()))?;
        Ok(codec::from_json(&json)?)
    }

    /// Returns whether a level was removed
    pub fn delete_level(&mut self, id: &str) -> Result<bool, StoreError> {
        let removed = self.store.remove(&Self::key(id))?;
        if removed {
            log::info!("Deleted level {}", id);
        }
        Ok(removed)
    }

    /// Every readable stored level. Corrupt entries are skipped with a warning.
    pub fn list_levels(&self) -> Result<Vec<LevelSummary>, StoreError> {
        let mut summaries = Vec::new();
        for key in self.store.keys()? {
            let Some(id) = key.strip_prefix(LEVEL_KEY_PREFIX) else {
                continue;
            };
            match self.load_level(id) {
                Ok(level) => summaries.push(LevelSummary {
                    id: id.to_string(),
                    element_count: level.element_count(),
                    name: level.name,
                }),
                Err(e) => log::warn!("Skipping unreadable level {}: {}", id, e),
            }
        }
        Ok(summaries)
    }
}
