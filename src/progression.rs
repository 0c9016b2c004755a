//! Level progression
//!
//! Tracks which built-in levels are completed. Level 1 is always unlocked;
//! level N unlocks once level N-1 is completed. Persisted as JSON in a
//! `BlobStore`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::persistence::{BlobStore, StoreError};

/// Completed built-in levels
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    pub completed: BTreeSet<u32>,
}

impl Progression {
    /// Storage key
    const STORAGE_KEY: &'static str = "progression";

    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completion. Returns true if it was new.
    pub fn mark_level_completed(&mut self, level_id: u32) -> bool {
        let fresh = self.completed.insert(level_id);
        if fresh {
            log::info!("Level {} completed", level_id);
        }
        fresh
    }

    pub fn is_level_completed(&self, level_id: u32) -> bool {
        self.completed.contains(&level_id)
    }

    pub fn is_level_unlocked(&self, level_id: u32) -> bool {
        match level_id {
            0 => false,
            1 => true,
            n => self.is_level_completed(n - 1),
        }
    }

    /// Highest unlocked level among `1..=level_count`
    pub fn highest_unlocked(&self, level_count: u32) -> u32 {
        (1..=level_count)
            .take_while(|&id| self.is_level_unlocked(id))
            .last()
            .unwrap_or(1)
    }

    /// Load progress, falling back to a fresh start on missing or bad data
    pub fn load(store: &impl BlobStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Progression>(&json) {
                Ok(progress) => {
                    log::info!(
                        "Loaded progression ({} levels completed)",
                        progress.completed.len()
                    );
                    progress
                }
                Err(e) => {
                    log::warn!("Discarding unreadable progression: {}", e);
                    Self::new()
                }
            },
            Ok(None) => {
                log::info!("No progression found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Failed to read progression: {}", e);
                Self::new()
            }
        }
    }

    pub fn save(&self, store: &mut impl BlobStore) -> Result<(), StoreError> {
        let json = serde_json::to_string(self)?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::debug!("Progression saved ({} levels completed)", self.completed.len());
        Ok(())
    }
}
