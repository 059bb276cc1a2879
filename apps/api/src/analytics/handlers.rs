use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analytics::aggregate::{
    count_by_day, count_by_month, count_field_values, linear_trend, TrendLine,
};
use crate::analytics::flatten::{flatten, FlatResponse};
use crate::errors::AppError;
use crate::models::user::AuthedUser;
use crate::state::AppState;
use crate::survey::store;

/// Loads the flattened response set, going through the short-interval cache.
/// A store failure here is the single fatal condition of the analytics
/// surface; everything below it degrades per-record.
async fn load_rows(state: &AppState) -> Result<Arc<Vec<FlatResponse>>, AppError> {
    if let Some(rows) = state.analytics_cache.get().await {
        return Ok(rows);
    }

    let records = store::get_all(&state.db).await?;
    let rows: Vec<FlatResponse> = records.iter().map(flatten).collect();
    Ok(state.analytics_cache.put(rows).await)
}

#[derive(Serialize)]
pub struct AnalyticsSummary {
    pub total_responses: usize,
    pub holland_distribution: BTreeMap<String, usize>,
    pub mbti_distribution: BTreeMap<String, usize>,
    pub certification_distribution: BTreeMap<String, usize>,
    pub technical_skill_distribution: BTreeMap<String, usize>,
    pub career_interest_distribution: BTreeMap<String, usize>,
    pub recommended_job_distribution: BTreeMap<String, usize>,
}

/// GET /api/v1/analytics/summary
pub async fn handle_summary(
    State(state): State<AppState>,
    user: AuthedUser,
) -> Result<Json<AnalyticsSummary>, AppError> {
    if !user.role.can_view_analytics() {
        return Err(AppError::Forbidden);
    }

    let rows = load_rows(&state).await?;
    Ok(Json(AnalyticsSummary {
        total_responses: rows.len(),
        holland_distribution: count_field_values(rows.iter().map(|r| r.holland_code.as_str())),
        mbti_distribution: count_field_values(rows.iter().map(|r| r.mbti_type.as_str())),
        certification_distribution: count_field_values(
            rows.iter().map(|r| r.certification_level.as_str()),
        ),
        technical_skill_distribution: count_field_values(
            rows.iter().map(|r| r.technical_skills.as_str()),
        ),
        career_interest_distribution: count_field_values(
            rows.iter().map(|r| r.career_interests.as_str()),
        ),
        recommended_job_distribution: count_field_values(
            rows.iter().map(|r| r.recommended_jobs.as_str()),
        ),
    }))
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Day,
    Month,
}

#[derive(Debug, Deserialize)]
pub struct TimeseriesQuery {
    #[serde(default)]
    pub granularity: Granularity,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[derive(Serialize)]
pub struct TimeseriesResponse {
    pub buckets: BTreeMap<String, usize>,
    /// Least-squares fit over the daily series; absent for monthly buckets
    /// or series too short to define a line.
    pub trend: Option<TrendLine>,
}

/// GET /api/v1/analytics/timeseries
pub async fn handle_timeseries(
    State(state): State<AppState>,
    user: AuthedUser,
    Query(params): Query<TimeseriesQuery>,
) -> Result<Json<TimeseriesResponse>, AppError> {
    if !user.role.can_view_analytics() {
        return Err(AppError::Forbidden);
    }

    let rows = load_rows(&state).await?;
    let filtered: Vec<FlatResponse> = rows
        .iter()
        .filter(|row| {
            let date = row.timestamp.date_naive();
            params.start.map_or(true, |start| date >= start)
                && params.end.map_or(true, |end| date <= end)
        })
        .cloned()
        .collect();

    match params.granularity {
        Granularity::Day => {
            let series = count_by_day(&filtered);
            let trend = linear_trend(&series);
            let buckets = series
                .into_iter()
                .map(|(date, count)| (date.to_string(), count))
                .collect();
            Ok(Json(TimeseriesResponse { buckets, trend }))
        }
        Granularity::Month => Ok(Json(TimeseriesResponse {
            buckets: count_by_month(&filtered),
            trend: None,
        })),
    }
}

/// GET /api/v1/analytics/responses
///
/// The flattened rows backing the raw-data table, newest first.
pub async fn handle_responses(
    State(state): State<AppState>,
    user: AuthedUser,
) -> Result<Json<Vec<FlatResponse>>, AppError> {
    if !user.role.can_view_analytics() {
        return Err(AppError::Forbidden);
    }

    let rows = load_rows(&state).await?;
    let mut rows: Vec<FlatResponse> = rows.iter().cloned().collect();
    rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(Json(rows))
}
