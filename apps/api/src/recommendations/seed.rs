//! Canonical seed data for the recommendation tables, inserted at boot only
//! when the collection is empty. Coverage is intentionally sparse: operators
//! extend the tables in place, and unseeded keys simply resolve to empty
//! recommendations.

use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;

struct SeedEntry {
    scheme: &'static str,
    code: &'static str,
    jobs: &'static [&'static str],
    description: &'static str,
}

const SEED_ENTRIES: &[SeedEntry] = &[
    SeedEntry {
        scheme: "holland",
        code: "RIA",
        jobs: &[
            "Construction Manager",
            "Site Supervisor",
            "Project Manager",
            "Civil Engineer",
            "Structural Engineer",
            "Equipment Operator",
            "Safety Director",
        ],
        description: "People with RIA (Realistic, Investigative, Artistic) preferences excel in hands-on leadership roles that require technical knowledge and creative problem-solving. They are well-suited for positions that combine practical skills with planning and design elements.",
    },
    SeedEntry {
        scheme: "holland",
        code: "RIE",
        jobs: &[
            "Construction Superintendent",
            "Project Engineer",
            "Building Inspector",
            "Quality Control Manager",
            "Operations Manager",
            "Technical Specialist",
            "Field Engineer",
        ],
        description: "RIE (Realistic, Investigative, Enterprising) types thrive in roles that combine technical expertise with management responsibilities. They excel at analyzing problems and implementing practical solutions while leading teams.",
    },
    SeedEntry {
        scheme: "holland",
        code: "RSE",
        jobs: &[
            "General Contractor",
            "Construction Foreman",
            "Project Coordinator",
            "Site Manager",
            "Trade Supervisor",
            "Field Operations Manager",
            "Construction Estimator",
        ],
        description: "RSE (Realistic, Social, Enterprising) individuals excel in roles that combine practical skills with team leadership. They are natural at managing people while maintaining hands-on involvement in projects.",
    },
    SeedEntry {
        scheme: "mbti",
        code: "ISTJ",
        jobs: &[
            "Project Manager",
            "Construction Inspector",
            "Quality Control Manager",
            "Safety Director",
            "Construction Estimator",
            "Building Code Inspector",
            "Structural Engineer",
        ],
        description: "ISTJs excel in roles requiring attention to detail, systematic thinking, and adherence to standards. They make excellent managers and inspectors in construction due to their methodical approach and reliability.",
    },
    SeedEntry {
        scheme: "mbti",
        code: "ESTP",
        jobs: &[
            "Site Supervisor",
            "General Contractor",
            "Construction Superintendent",
            "Project Coordinator",
            "Equipment Operator",
            "Field Operations Manager",
            "Emergency Response Coordinator",
        ],
        description: "ESTPs thrive in dynamic, hands-on roles that require quick thinking and adaptability. They excel in positions that involve active problem-solving and direct oversight of operations.",
    },
    SeedEntry {
        scheme: "mbti",
        code: "ENTJ",
        jobs: &[
            "Construction Executive",
            "Project Director",
            "Development Manager",
            "Operations Director",
            "Business Development Manager",
            "Strategic Planning Director",
            "Construction Company Owner",
        ],
        description: "ENTJs excel in leadership positions that require strategic thinking and long-term planning. They are natural leaders who can effectively manage large-scale construction projects and organizations.",
    },
];

/// Populates `recommendation_entries` with the canonical set when the table
/// is empty. Returns the number of inserted entries (0 when already seeded).
pub async fn seed_if_empty(pool: &PgPool) -> Result<u64, AppError> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM recommendation_entries")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        return Ok(0);
    }

    let mut inserted = 0u64;
    for entry in SEED_ENTRIES {
        let jobs: Vec<String> = entry.jobs.iter().map(|j| j.to_string()).collect();
        sqlx::query(
            r#"
            INSERT INTO recommendation_entries (scheme, code, jobs, description)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (scheme, code) DO NOTHING
            "#,
        )
        .bind(entry.scheme)
        .bind(entry.code)
        .bind(&jobs)
        .bind(entry.description)
        .execute(pool)
        .await?;
        inserted += 1;
    }

    info!("Seeded {inserted} recommendation entries");
    Ok(inserted)
}

/// In-memory tables built from the seed set, for tests that exercise the
/// resolver against the canonical data without a database.
#[cfg(test)]
pub fn seed_tables() -> crate::recommendations::tables::RecommendationTables {
    use crate::recommendations::tables::{RecommendationEntryRow, RecommendationTables};

    RecommendationTables::from_rows(
        SEED_ENTRIES
            .iter()
            .map(|entry| RecommendationEntryRow {
                scheme: entry.scheme.to_string(),
                code: entry.code.to_string(),
                jobs: entry.jobs.iter().map(|j| j.to_string()).collect(),
                description: entry.description.to_string(),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seed_keys_are_unique_per_scheme() {
        let mut seen = HashSet::new();
        for entry in SEED_ENTRIES {
            assert!(
                seen.insert((entry.scheme, entry.code)),
                "duplicate seed key {}/{}",
                entry.scheme,
                entry.code
            );
        }
    }

    #[test]
    fn test_seed_entries_are_complete() {
        for entry in SEED_ENTRIES {
            assert!(!entry.jobs.is_empty(), "{} has no jobs", entry.code);
            assert!(
                !entry.description.is_empty(),
                "{} has no description",
                entry.code
            );
        }
    }

    #[test]
    fn test_seed_covers_the_documented_scenario_keys() {
        let tables = seed_tables();
        assert!(tables.holland("RIA").is_some());
        assert!(tables.mbti("ISTJ").is_some());
    }
}
