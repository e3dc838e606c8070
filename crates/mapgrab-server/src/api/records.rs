//! The ingest endpoint: batches in, rows appended, counters updated.

use axum::extract::rejection::JsonRejection;
use axum::{extract::State, http::StatusCode, Extension, Json};
use mapgrab_core::BusinessRecord;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::middleware::RequestId;

/// One submission from the page-side capture agent.
#[derive(Debug, Deserialize)]
pub struct RecordBatch {
    pub items: Vec<BusinessRecord>,
}

/// Wire response for `POST /records`.
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub status: &'static str,
    pub received: usize,
    pub saved: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Accepts a batch of records and appends them to the sink.
///
/// A body that does not parse as a batch of records rejects the whole
/// submission — nothing is persisted and no counter moves. A well-formed
/// batch is appended item by item; per-item failures are counted and
/// excluded from `saved` but the rest of the batch still lands, and the
/// response reports the split accurately.
pub async fn ingest(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    batch: Result<Json<RecordBatch>, JsonRejection>,
) -> (StatusCode, Json<IngestResponse>) {
    let Json(batch) = match batch {
        Ok(batch) => batch,
        Err(rejection) => {
            tracing::warn!(request_id = %req_id.0, error = %rejection, "rejecting malformed batch");
            return (
                StatusCode::BAD_REQUEST,
                Json(IngestResponse {
                    status: "error",
                    received: 0,
                    saved: 0,
                    message: Some(rejection.body_text()),
                }),
            );
        }
    };

    let received = batch.items.len();
    state.stats.record_received(received as u64);

    match state.sink.append(&batch.items).await {
        Ok(report) => {
            state.stats.record_saved(report.saved as u64);
            state.stats.record_errors(report.errors as u64);
            tracing::info!(
                request_id = %req_id.0,
                received,
                saved = report.saved,
                errors = report.errors,
                "batch ingested"
            );
            (
                StatusCode::OK,
                Json(IngestResponse {
                    status: "success",
                    received,
                    saved: report.saved,
                    message: Some(format!(
                        "appended to {}",
                        state.sink.location().display()
                    )),
                }),
            )
        }
        Err(err) => {
            // The batch could not be made durable as a whole; its records
            // may be retried by the agent under at-least-once semantics.
            state.stats.record_errors(received as u64);
            tracing::error!(request_id = %req_id.0, error = %err, "batch append failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(IngestResponse {
                    status: "error",
                    received,
                    saved: 0,
                    message: Some(err.to_string()),
                }),
            )
        }
    }
}
