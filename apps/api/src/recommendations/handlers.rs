use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::models::user::AuthedUser;
use crate::recommendations::resolver::{resolve, RecommendationResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    #[serde(default)]
    pub holland_code: String,
    #[serde(default)]
    pub mbti_type: String,
}

/// GET /api/v1/recommendations
///
/// Pure preview: resolves against the in-memory tables without persisting
/// anything. Unknown keys return empty sides, never an error.
pub async fn handle_preview(
    State(state): State<AppState>,
    _user: AuthedUser,
    Query(params): Query<RecommendationQuery>,
) -> Json<RecommendationResult> {
    Json(resolve(&state.tables, &params.holland_code, &params.mbti_type))
}
