use std::collections::HashMap;

use sqlx::{FromRow, PgPool};
use tracing::{info, warn};

use crate::errors::AppError;

/// One operator-authored lookup entry: job titles in authoring order (no
/// dedup guarantee at rest) plus a description.
#[derive(Debug, Clone)]
pub struct RecommendationEntry {
    pub jobs: Vec<String>,
    pub description: String,
}

/// Row shape of the `recommendation_entries` collection.
#[derive(Debug, Clone, FromRow)]
pub struct RecommendationEntryRow {
    pub scheme: String,
    pub code: String,
    pub jobs: Vec<String>,
    pub description: String,
}

/// The two lookup tables, keyed by Holland code and MBTI type respectively.
///
/// Loaded once at process start and read-only thereafter; operator edits to
/// the backing collection take effect on the next boot. Existing stored
/// recommendations are never recomputed against a newer table.
#[derive(Debug, Default)]
pub struct RecommendationTables {
    holland: HashMap<String, RecommendationEntry>,
    mbti: HashMap<String, RecommendationEntry>,
}

impl RecommendationTables {
    pub fn from_rows(rows: Vec<RecommendationEntryRow>) -> Self {
        let mut tables = RecommendationTables::default();
        for row in rows {
            let entry = RecommendationEntry {
                jobs: row.jobs,
                description: row.description,
            };
            match row.scheme.as_str() {
                "holland" => {
                    tables.holland.insert(row.code, entry);
                }
                "mbti" => {
                    tables.mbti.insert(row.code, entry);
                }
                other => warn!("Skipping recommendation entry with unknown scheme '{other}'"),
            }
        }
        tables
    }

    pub async fn load(pool: &PgPool) -> Result<Self, AppError> {
        let rows = sqlx::query_as::<_, RecommendationEntryRow>(
            "SELECT scheme, code, jobs, description FROM recommendation_entries",
        )
        .fetch_all(pool)
        .await?;

        let tables = Self::from_rows(rows);
        info!(
            "Loaded recommendation tables ({} Holland codes, {} MBTI types)",
            tables.holland.len(),
            tables.mbti.len()
        );
        Ok(tables)
    }

    /// Exact, case-sensitive lookup. Absence is a normal outcome, not an error.
    pub fn holland(&self, code: &str) -> Option<&RecommendationEntry> {
        self.holland.get(code)
    }

    /// Exact, case-sensitive lookup. Absence is a normal outcome, not an error.
    pub fn mbti(&self, mbti_type: &str) -> Option<&RecommendationEntry> {
        self.mbti.get(mbti_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(scheme: &str, code: &str, jobs: &[&str], description: &str) -> RecommendationEntryRow {
        RecommendationEntryRow {
            scheme: scheme.to_string(),
            code: code.to_string(),
            jobs: jobs.iter().map(|j| j.to_string()).collect(),
            description: description.to_string(),
        }
    }

    #[test]
    fn test_rows_group_by_scheme() {
        let tables = RecommendationTables::from_rows(vec![
            row("holland", "RIA", &["Civil Engineer"], "hands-on"),
            row("mbti", "ISTJ", &["Inspector"], "methodical"),
        ]);

        assert!(tables.holland("RIA").is_some());
        assert!(tables.mbti("ISTJ").is_some());
        // Keys do not leak across schemes
        assert!(tables.holland("ISTJ").is_none());
        assert!(tables.mbti("RIA").is_none());
    }

    #[test]
    fn test_unknown_scheme_rows_are_skipped() {
        let tables = RecommendationTables::from_rows(vec![
            row("zodiac", "LEO", &["Astrologer"], ""),
            row("holland", "RSE", &["General Contractor"], ""),
        ]);

        assert!(tables.holland("RSE").is_some());
        assert!(tables.holland("LEO").is_none());
        assert!(tables.mbti("LEO").is_none());
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let tables =
            RecommendationTables::from_rows(vec![row("holland", "RIA", &["Civil Engineer"], "")]);

        assert!(tables.holland("RIA").is_some());
        assert!(tables.holland("ria").is_none());
        assert!(tables.holland("Ria").is_none());
    }

    #[test]
    fn test_entry_preserves_authoring_order_and_duplicates() {
        let tables = RecommendationTables::from_rows(vec![row(
            "mbti",
            "ESTP",
            &["Site Supervisor", "Foreman", "Site Supervisor"],
            "",
        )]);

        let entry = tables.mbti("ESTP").unwrap();
        // Dedup is the resolver's concern, not the table's
        assert_eq!(
            entry.jobs,
            vec!["Site Supervisor", "Foreman", "Site Supervisor"]
        );
    }
}
