//! HTTP request handlers for the attendance ledger API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Local;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    build_ledger, export_ledger, export_merged_leave, export_records, merge_leave_batches,
};
use crate::error::{LedgerError, LedgerResult};
use crate::export::ExportArtifact;
use crate::models::{BatchId, BatchType};
use crate::store::{BatchStore, paginate, preview};

use super::request::{BatchIdsRequest, HolidayQuery, PageQuery, UploadBatchRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Fewest batches the leave merge routes accept.
pub const MIN_MERGE_BATCHES: usize = 2;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/batches", post(upload_batch_handler))
        .route(
            "/batches/:id",
            get(batch_page_handler).delete(delete_batch_handler),
        )
        .route("/ledger", post(ledger_handler))
        .route("/ledger/export", post(ledger_export_handler))
        .route("/leave/merge", post(merge_handler))
        .route("/leave/merge/export", post(merge_export_handler))
        .route("/records/export/:kind", post(records_export_handler))
        .route("/holidays", get(holidays_handler))
        .with_state(state)
}

/// Handler for POST /batches.
///
/// Stores an uploaded table and returns its preview.
async fn upload_batch_handler(
    State(state): State<AppState>,
    payload: Result<Json<UploadBatchRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection(correlation_id, rejection),
    };

    let name = request.name.clone();
    let Some(batch) = request.into_batch() else {
        warn!(correlation_id = %correlation_id, batch = %name, "Upload has no header row");
        return ApiErrorResponse::bad_request(ApiError::validation_error(
            "batch must contain a header row",
        ))
        .into_response();
    };

    let batch_preview = preview(&batch);
    state.store().write().await.insert(batch);
    info!(
        correlation_id = %correlation_id,
        batch_id = %batch_preview.batch_id,
        batch = %batch_preview.name,
        declared_type = %batch_preview.declared_type,
        detected_kind = ?batch_preview.detected_kind,
        rows = batch_preview.total_rows,
        "Batch uploaded"
    );
    json_response(StatusCode::CREATED, &batch_preview)
}

/// Handler for GET /batches/:id.
async fn batch_page_handler(
    State(state): State<AppState>,
    id: Result<Path<BatchId>, PathRejection>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let id = match id {
        Ok(Path(id)) => id,
        Err(rejection) => return bad_parameter(correlation_id, rejection.body_text()),
    };
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return bad_parameter(correlation_id, rejection.body_text()),
    };

    let store = state.store().read().await;
    let result = store
        .get_batch(&id)
        .and_then(|batch| paginate(batch, query.page, query.size));
    respond(correlation_id, "Batch page", result)
}

/// Handler for DELETE /batches/:id.
async fn delete_batch_handler(
    State(state): State<AppState>,
    id: Result<Path<BatchId>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let id = match id {
        Ok(Path(id)) => id,
        Err(rejection) => return bad_parameter(correlation_id, rejection.body_text()),
    };

    if state.store().write().await.remove(&id) {
        info!(correlation_id = %correlation_id, batch_id = %id, "Batch deleted");
        StatusCode::NO_CONTENT.into_response()
    } else {
        error_response(
            correlation_id,
            LedgerError::UnknownBatch {
                batch_id: id.to_string(),
            },
        )
    }
}

/// Handler for POST /ledger.
///
/// Reconciles the named batches and returns the ledger report.
async fn ledger_handler(
    State(state): State<AppState>,
    payload: Result<Json<BatchIdsRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection(correlation_id, rejection),
    };

    let store = state.store().read().await;
    let result = build_ledger(&*store, &request.batch_ids, state.calendar());
    respond(correlation_id, "Ledger", result)
}

/// Handler for POST /ledger/export.
async fn ledger_export_handler(
    State(state): State<AppState>,
    payload: Result<Json<BatchIdsRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection(correlation_id, rejection),
    };

    let store = state.store().read().await;
    let result = export_ledger(
        &*store,
        &request.batch_ids,
        state.calendar(),
        state.exporter(),
        Local::now().date_naive(),
    );
    respond_with_file(correlation_id, result)
}

/// Handler for POST /leave/merge.
///
/// Requires at least [`MIN_MERGE_BATCHES`] batch ids.
async fn merge_handler(
    State(state): State<AppState>,
    payload: Result<Json<BatchIdsRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection(correlation_id, rejection),
    };
    if let Some(response) = too_few_batches(correlation_id, &request) {
        return response;
    }

    let store = state.store().read().await;
    let result = merge_leave_batches(&*store, &request.batch_ids);
    respond(correlation_id, "Leave merge", result)
}

/// Handler for POST /leave/merge/export.
///
/// Requires at least [`MIN_MERGE_BATCHES`] batch ids.
async fn merge_export_handler(
    State(state): State<AppState>,
    payload: Result<Json<BatchIdsRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection(correlation_id, rejection),
    };
    if let Some(response) = too_few_batches(correlation_id, &request) {
        return response;
    }

    let store = state.store().read().await;
    let result = export_merged_leave(
        &*store,
        &request.batch_ids,
        state.exporter(),
        Local::now().date_naive(),
    );
    respond_with_file(correlation_id, result)
}

/// Handler for POST /records/export/:kind.
async fn records_export_handler(
    State(state): State<AppState>,
    kind: Result<Path<BatchType>, PathRejection>,
    payload: Result<Json<BatchIdsRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let kind = match kind {
        Ok(Path(kind)) => kind,
        Err(rejection) => return bad_parameter(correlation_id, rejection.body_text()),
    };
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection(correlation_id, rejection),
    };

    let store = state.store().read().await;
    let result = export_records(
        &*store,
        &request.batch_ids,
        kind,
        state.exporter(),
        Local::now().date_naive(),
    );
    respond_with_file(correlation_id, result)
}

/// Handler for GET /holidays?year=.
///
/// Returns the configured holidays and weekend workdays of one year. Years
/// without a configured table come back with both lists empty.
async fn holidays_handler(
    State(state): State<AppState>,
    query: Result<Query<HolidayQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return bad_parameter(correlation_id, rejection.body_text()),
    };

    let arrangement = state.calendar().arrangement(query.year);
    info!(
        correlation_id = %correlation_id,
        year = query.year,
        holidays = arrangement.holidays.len(),
        workdays_on_weekends = arrangement.workdays_on_weekends.len(),
        "Holiday arrangement served"
    );
    json_response(StatusCode::OK, &arrangement)
}

fn too_few_batches(correlation_id: Uuid, request: &BatchIdsRequest) -> Option<Response> {
    if request.batch_ids.len() >= MIN_MERGE_BATCHES {
        return None;
    }
    warn!(
        correlation_id = %correlation_id,
        batches = request.batch_ids.len(),
        "Too few batches to merge"
    );
    Some(
        ApiErrorResponse::bad_request(ApiError::validation_error(format!(
            "select at least {} leave batches to merge",
            MIN_MERGE_BATCHES
        )))
        .into_response(),
    )
}

fn respond<T: Serialize>(correlation_id: Uuid, operation: &str, result: LedgerResult<T>) -> Response {
    match result {
        Ok(body) => {
            info!(correlation_id = %correlation_id, operation, "Request completed successfully");
            json_response(StatusCode::OK, &body)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

fn respond_with_file(correlation_id: Uuid, result: LedgerResult<ExportArtifact>) -> Response {
    let artifact = match result {
        Ok(artifact) => artifact,
        Err(err) => return error_response(correlation_id, err),
    };

    let disposition = format!(
        "attachment; filename*=UTF-8''{}",
        encode_filename(&artifact.file_name)
    );
    let (Ok(content_type), Ok(disposition)) = (
        HeaderValue::from_str(&artifact.content_type),
        HeaderValue::from_str(&disposition),
    ) else {
        return ApiErrorResponse {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: ApiError::new("EXPORT_ERROR", "Export produced an invalid header"),
        }
        .into_response();
    };

    info!(
        correlation_id = %correlation_id,
        file_name = %artifact.file_name,
        bytes = artifact.bytes.len(),
        "Export completed successfully"
    );
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.bytes,
    )
        .into_response()
}

/// Percent-encodes a file name for an RFC 5987 `filename*` parameter.
fn encode_filename(name: &str) -> String {
    name.bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'-' | b'_' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{:02X}", b),
        })
        .collect()
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(correlation_id: Uuid, err: LedgerError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request failed"
    );
    let api_error: ApiErrorResponse = err.into();
    (
        api_error.status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(api_error.error),
    )
        .into_response()
}

fn bad_parameter(correlation_id: Uuid, message: String) -> Response {
    warn!(correlation_id = %correlation_id, error = %message, "Invalid request parameter");
    ApiErrorResponse::bad_request(ApiError::new("INVALID_PARAMETER", message)).into_response()
}

fn json_rejection(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    (
        StatusCode::BAD_REQUEST,
        [(header::CONTENT_TYPE, "application/json")],
        Json(error),
    )
        .into_response()
}
