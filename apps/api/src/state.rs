use std::sync::Arc;

use sqlx::PgPool;

use crate::analytics::cache::ResponseCache;
use crate::identity::IdentityClient;
use crate::recommendations::tables::RecommendationTables;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub identity: IdentityClient,
    /// Lookup tables, loaded once at startup and read-only thereafter.
    /// Operator edits to the backing collection take effect on the next boot.
    pub tables: Arc<RecommendationTables>,
    /// Short-interval cache over the flattened response set.
    pub analytics_cache: Arc<ResponseCache>,
}
