use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::ScoringConfig;

use super::domain::{IdGenerator, Receipt, ReceiptId};
use super::engine::ScoringRuleEngine;
use super::store::{ScoreState, ScoreStore};
use super::validation::{ReceiptInputError, ReceiptValidator};

/// Outcome of a score lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "points", rename_all = "snake_case")]
pub enum ScoreLookup {
    NotFound,
    Pending,
    Scored(u32),
}

impl From<Option<ScoreState>> for ScoreLookup {
    fn from(value: Option<ScoreState>) -> Self {
        match value {
            None => ScoreLookup::NotFound,
            Some(ScoreState::Pending) => ScoreLookup::Pending,
            Some(ScoreState::Scored(points)) => ScoreLookup::Scored(points),
        }
    }
}

/// Coordinates a submission: park it as pending, score it on a background task, record
/// the total. The processor is the only writer to the store it is given.
///
/// Background tasks are unbounded unless a concurrency limit is set; the limit is
/// enforced inside each task so submission never waits on it.
pub struct ReceiptProcessor<S, G> {
    store: Arc<S>,
    ids: Arc<G>,
    engine: Arc<ScoringRuleEngine>,
    validator: ReceiptValidator,
    limiter: Option<Arc<Semaphore>>,
}

impl<S, G> ReceiptProcessor<S, G>
where
    S: ScoreStore + 'static,
    G: IdGenerator + 'static,
{
    pub fn new(store: Arc<S>, ids: Arc<G>, engine: Arc<ScoringRuleEngine>) -> Self {
        Self {
            store,
            ids,
            engine,
            validator: ReceiptValidator::new(),
            limiter: None,
        }
    }

    pub fn from_config(store: Arc<S>, ids: Arc<G>, config: &ScoringConfig) -> Self {
        let engine = Arc::new(ScoringRuleEngine::with_disabled(&config.disabled_rules));
        Self::new(store, ids, engine).with_concurrency_limit(config.max_concurrent_scoring)
    }

    /// Cap simultaneously running scoring tasks; `0` removes the cap.
    pub fn with_concurrency_limit(mut self, permits: usize) -> Self {
        self.limiter = (permits > 0).then(|| Arc::new(Semaphore::new(permits)));
        self
    }

    pub fn engine(&self) -> &ScoringRuleEngine {
        &self.engine
    }

    pub fn validator(&self) -> &ReceiptValidator {
        &self.validator
    }

    /// Validate, then submit.
    pub fn accept(&self, receipt: Receipt) -> Result<ReceiptId, ReceiptInputError> {
        let violations = self.validator.violations(&receipt);
        if !violations.is_empty() {
            debug!(?violations, "receipt failed validation");
            return Err(ReceiptInputError::Rejected {
                violations: violations.len(),
            });
        }
        Ok(self.submit(receipt))
    }

    /// Returns as soon as the pending marker is written; scoring continues in the background.
    /// Must be called from within a Tokio runtime.
    pub fn submit(&self, receipt: Receipt) -> ReceiptId {
        let (id, _handle) = self.dispatch(receipt);
        id
    }

    /// Like [`submit`](Self::submit), also handing back the scoring task so callers can
    /// await the total. Must be called from within a Tokio runtime.
    pub fn dispatch(&self, receipt: Receipt) -> (ReceiptId, JoinHandle<u32>) {
        let id = self.ids.next_id();
        self.store.set(id.clone(), ScoreState::Pending);
        info!(receipt_id = %id, retailer = %receipt.retailer, "receipt accepted");

        let store = Arc::clone(&self.store);
        let engine = Arc::clone(&self.engine);
        let limiter = self.limiter.clone();
        let task_id = id.clone();

        let handle = tokio::spawn(async move {
            // The semaphore is never closed, so acquisition only fails if that changes.
            let _permit = match limiter {
                Some(limiter) => limiter.acquire_owned().await.ok(),
                None => None,
            };

            let total = engine.total(&receipt);
            store.set(task_id.clone(), ScoreState::Scored(total));
            info!(receipt_id = %task_id, points = total, "receipt scored");
            total
        });

        (id, handle)
    }

    /// Score without recording anything.
    pub fn score(&self, receipt: &Receipt) -> u32 {
        self.engine.total(receipt)
    }

    pub fn get_score(&self, id: &ReceiptId) -> ScoreLookup {
        let lookup = ScoreLookup::from(self.store.get(id));
        debug!(receipt_id = %id, ?lookup, "score lookup");
        lookup
    }
}
