//! Relationship intelligence handlers

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};

use crate::dto::relationship::{RelationshipData, RelationshipQuery};
use crate::dto::ApiResponse;
use crate::{error::ApiError, AppState};

const PROFILES_FAILED: &str = "Failed to compute relationship intelligence";

/// All investor profiles, or one when `investorId` is given
pub async fn get_relationship_intelligence(
    State(state): State<AppState>,
    query: Result<Query<RelationshipQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<RelationshipData>>, ApiError> {
    let Query(query) = query?;

    let data = match query.investor_id {
        Some(investor_id) => state
            .service
            .relationship_profile(&investor_id)
            .await
            .map(|profile| RelationshipData::One(Box::new(profile))),
        None => state
            .service
            .relationship_profiles()
            .await
            .map(RelationshipData::All),
    }
    .map_err(|e| ApiError::from_port(e, PROFILES_FAILED))?;

    Ok(Json(ApiResponse::ok(data)))
}
