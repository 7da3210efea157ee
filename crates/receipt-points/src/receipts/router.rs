use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::warn;

use super::domain::{IdGenerator, Receipt, ReceiptId};
use super::processor::{ReceiptProcessor, ScoreLookup};
use super::store::ScoreStore;

pub(crate) const INVALID_RECEIPT: &str = "The receipt is invalid.";
pub(crate) const UNKNOWN_RECEIPT: &str = "No receipt found for that ID.";

/// Router exposing receipt submission and point lookup.
pub fn receipt_router<S, G>(processor: Arc<ReceiptProcessor<S, G>>) -> Router
where
    S: ScoreStore + 'static,
    G: IdGenerator + 'static,
{
    Router::new()
        .route("/receipts/process", post(process_handler::<S, G>))
        .route("/receipts/:id/points", get(points_handler::<S, G>))
        .with_state(processor)
}

pub(crate) async fn process_handler<S, G>(
    State(processor): State<Arc<ReceiptProcessor<S, G>>>,
    payload: Result<Json<Receipt>, JsonRejection>,
) -> Response
where
    S: ScoreStore + 'static,
    G: IdGenerator + 'static,
{
    let Json(receipt) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "receipt payload rejected");
            return invalid_receipt();
        }
    };

    match processor.accept(receipt) {
        Ok(id) => (StatusCode::OK, Json(json!({ "id": id }))).into_response(),
        Err(_) => invalid_receipt(),
    }
}

pub(crate) async fn points_handler<S, G>(
    State(processor): State<Arc<ReceiptProcessor<S, G>>>,
    Path(id): Path<String>,
) -> Response
where
    S: ScoreStore + 'static,
    G: IdGenerator + 'static,
{
    let id = ReceiptId(id);
    match processor.get_score(&id) {
        ScoreLookup::Scored(points) => {
            (StatusCode::OK, Json(json!({ "points": points }))).into_response()
        }
        ScoreLookup::Pending => {
            let payload = json!({ "id": id, "status": "pending" });
            (StatusCode::ACCEPTED, Json(payload)).into_response()
        }
        ScoreLookup::NotFound => {
            let payload = json!({ "error": UNKNOWN_RECEIPT });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
    }
}

fn invalid_receipt() -> Response {
    let payload = json!({ "error": INVALID_RECEIPT });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}
