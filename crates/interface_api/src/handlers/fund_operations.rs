//! Fund operations handlers

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    Json,
};
use tracing::warn;
use validator::Validate;

use domain_fund::{CommandAcknowledgment, QueryKind, QueryResult};

use crate::dto::fund_operations::{CommandRequest, FundOperationsQuery};
use crate::dto::ApiResponse;
use crate::{error::ApiError, AppState};

const QUERY_FAILED: &str = "Failed to fetch fund operations data";
const COMMAND_FAILED: &str = "Failed to process fund operation";

/// Serves every read view selected by `type`
pub async fn get_fund_operations(
    State(state): State<AppState>,
    query: Result<Query<FundOperationsQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<QueryResult>>, ApiError> {
    let Query(query) = query?;
    let kind = QueryKind::from_param(query.query_type.as_deref());
    let fund_id = query.fund_filter();

    let result = state
        .service
        .query(kind, fund_id.as_ref())
        .await
        .map_err(|e| ApiError::from_port(e, QUERY_FAILED))?;

    Ok(Json(ApiResponse::ok(result)))
}

/// Runs a write command
pub async fn post_fund_operations(
    State(state): State<AppState>,
    payload: Result<Json<CommandRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<CommandAcknowledgment>>, ApiError> {
    let Json(request) = payload?;
    if let Err(e) = request.validate() {
        warn!(error = %e, "invalid command request");
        return Err(ApiError::BadRequest("Invalid action".to_string()));
    }

    let receipt = state
        .service
        .execute(&request.action, request.data)
        .await
        .map_err(|e| ApiError::from_port(e, COMMAND_FAILED))?;

    Ok(Json(ApiResponse::with_message(
        receipt.message(),
        receipt.acknowledgment,
    )))
}
