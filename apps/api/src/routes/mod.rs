pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;
use crate::{analytics, auth, recommendations, survey};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/v1/auth/register", post(auth::handlers::handle_register))
        .route("/api/v1/auth/login", post(auth::handlers::handle_login))
        .route(
            "/api/v1/auth/reset-password",
            post(auth::handlers::handle_reset_password),
        )
        .route("/api/v1/auth/me", get(auth::handlers::handle_me))
        .route(
            "/api/v1/auth/users/:uid/role",
            put(auth::handlers::handle_set_role),
        )
        // Recommendations (pure preview, no persistence)
        .route(
            "/api/v1/recommendations",
            get(recommendations::handlers::handle_preview),
        )
        // Survey intake
        .route(
            "/api/v1/survey/responses",
            post(survey::handlers::handle_submit).get(survey::handlers::handle_list),
        )
        .route(
            "/api/v1/survey/responses/:id",
            get(survey::handlers::handle_get),
        )
        // Analytics
        .route(
            "/api/v1/analytics/summary",
            get(analytics::handlers::handle_summary),
        )
        .route(
            "/api/v1/analytics/timeseries",
            get(analytics::handlers::handle_timeseries),
        )
        .route(
            "/api/v1/analytics/responses",
            get(analytics::handlers::handle_responses),
        )
        .with_state(state)
}
