use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::survey::{SurveyResponseRow, SurveySubmission};
use crate::models::user::AuthedUser;
use crate::recommendations::resolver::{resolve, RecommendationResult};
use crate::state::AppState;
use crate::survey::store;

#[derive(Serialize)]
pub struct SubmitResponse {
    pub id: Uuid,
    pub recommendations: RecommendationResult,
}

/// POST /api/v1/survey/responses
///
/// Resolves recommendations from the personality profile and persists the
/// combined record. Recommendations are computed exactly once, here.
pub async fn handle_submit(
    State(state): State<AppState>,
    _user: AuthedUser,
    Json(submission): Json<SurveySubmission>,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError> {
    let holland_key = submission.personality_profile.holland_key();
    let recommendations = resolve(
        &state.tables,
        &holland_key,
        &submission.personality_profile.mbti_type,
    );

    let id = store::save_response(&state.db, &submission, &recommendations).await?;

    Ok((StatusCode::CREATED, Json(SubmitResponse { id, recommendations })))
}

/// GET /api/v1/survey/responses
pub async fn handle_list(
    State(state): State<AppState>,
    user: AuthedUser,
) -> Result<Json<Vec<SurveyResponseRow>>, AppError> {
    if !user.role.can_view_analytics() {
        return Err(AppError::Forbidden);
    }

    let mut rows = store::get_all(&state.db).await?;
    // Store order is unspecified; newest-first is a display choice
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Json(rows))
}

/// GET /api/v1/survey/responses/:id
pub async fn handle_get(
    State(state): State<AppState>,
    user: AuthedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SurveyResponseRow>, AppError> {
    if !user.role.can_view_analytics() {
        return Err(AppError::Forbidden);
    }

    let row = store::get_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Survey response {id} not found")))?;
    Ok(Json(row))
}
