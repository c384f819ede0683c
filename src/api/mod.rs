//! HTTP API module for the attendance ledger engine.
//!
//! This module exposes batch upload and paging, ledger reconciliation, leave
//! merging, the file exports and the holiday calendar over REST endpoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{MIN_MERGE_BATCHES, create_router};
pub use request::{BatchIdsRequest, HolidayQuery, PageQuery, UploadBatchRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
