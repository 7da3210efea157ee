use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::receipts::domain::{IdGenerator, Item, Receipt, ReceiptId};
use crate::receipts::engine::ScoringRuleEngine;
use crate::receipts::processor::{ReceiptProcessor, ScoreLookup};
use crate::receipts::store::InMemoryScoreStore;

/// Deterministic identifiers: `receipt-000001`, `receipt-000002`, ...
#[derive(Default)]
pub(super) struct SequenceIds {
    next: AtomicU64,
}

impl IdGenerator for SequenceIds {
    fn next_id(&self) -> ReceiptId {
        let id = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        ReceiptId(format!("receipt-{id:06}"))
    }
}

pub(super) type TestProcessor = ReceiptProcessor<InMemoryScoreStore, SequenceIds>;

pub(super) fn item(description: &str, price: &str) -> Item {
    Item {
        short_description: description.to_string(),
        price: price.to_string(),
    }
}

/// Scores 28 points.
pub(super) fn target_receipt() -> Receipt {
    Receipt {
        retailer: "Target".to_string(),
        purchase_date: "2022-01-01".to_string(),
        purchase_time: "13:01".to_string(),
        items: vec![
            item("Mountain Dew 12PK", "6.49"),
            item("Emils Cheese Pizza", "12.25"),
            item("Knorr Creamy Chicken", "1.26"),
            item("Doritos Nacho Cheese", "3.35"),
            item("   Klarbrunn 12-PK 12 FL OZ  ", "12.00"),
        ],
        total: "35.35".to_string(),
    }
}

/// Scores 109 points.
pub(super) fn corner_market_receipt() -> Receipt {
    Receipt {
        retailer: "M&M Corner Market".to_string(),
        purchase_date: "2022-03-20".to_string(),
        purchase_time: "14:33".to_string(),
        items: (0..4).map(|_| item("Gatorade", "2.25")).collect(),
        total: "9.00".to_string(),
    }
}

pub(super) fn invalid_receipt() -> Receipt {
    let mut receipt = corner_market_receipt();
    receipt.retailer = String::new();
    receipt.purchase_date = "not A Date".to_string();
    receipt.items[0].price = "FREE!".to_string();
    receipt
}

pub(super) fn build_processor() -> (TestProcessor, Arc<InMemoryScoreStore>) {
    let store = Arc::new(InMemoryScoreStore::new());
    let processor = ReceiptProcessor::new(
        Arc::clone(&store),
        Arc::new(SequenceIds::default()),
        Arc::new(ScoringRuleEngine::standard()),
    );
    (processor, store)
}

/// Yields to the runtime until the background task records a score.
pub(super) async fn wait_for_score(processor: &TestProcessor, id: &ReceiptId) -> ScoreLookup {
    for _ in 0..1_000 {
        match processor.get_score(id) {
            ScoreLookup::Pending => tokio::task::yield_now().await,
            settled => return settled,
        }
    }
    processor.get_score(id)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
