use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use super::domain::ReceiptId;

/// Scoring progress recorded for a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "points", rename_all = "snake_case")]
pub enum ScoreState {
    Pending,
    Scored(u32),
}

/// Identifier-keyed score storage shared between the submit path and readers.
pub trait ScoreStore: Send + Sync {
    /// Unconditional upsert; the last write wins.
    fn set(&self, id: ReceiptId, state: ScoreState);
    fn get(&self, id: &ReceiptId) -> Option<ScoreState>;
    fn delete(&self, id: &ReceiptId) -> Option<ScoreState>;
}

/// Process-local store behind a single reader/writer lock.
#[derive(Debug, Default, Clone)]
pub struct InMemoryScoreStore {
    records: Arc<RwLock<HashMap<ReceiptId, ScoreState>>>,
}

impl InMemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// Every mutation is a single map operation, so a poisoned lock still guards a whole map.
impl ScoreStore for InMemoryScoreStore {
    fn set(&self, id: ReceiptId, state: ScoreState) {
        let mut guard = self.records.write().unwrap_or_else(PoisonError::into_inner);
        guard.insert(id, state);
    }

    fn get(&self, id: &ReceiptId) -> Option<ScoreState> {
        let guard = self.records.read().unwrap_or_else(PoisonError::into_inner);
        guard.get(id).copied()
    }

    fn delete(&self, id: &ReceiptId) -> Option<ScoreState> {
        let mut guard = self.records.write().unwrap_or_else(PoisonError::into_inner);
        guard.remove(id)
    }
}
