//! Response store — append-only persistence for survey submissions.
//!
//! Each save writes exactly one immutable document; there are no updates and
//! no multi-document transactions. Concurrent saves are independent because
//! every submission creates a new record.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::survey::{SurveyResponseRow, SurveySubmission};
use crate::recommendations::resolver::RecommendationResult;

/// Builds the persisted document: the survey sections at the top level plus
/// the resolved recommendations. Pure — the inputs are only read.
pub fn build_response_document(
    submission: &SurveySubmission,
    recommendations: &RecommendationResult,
) -> serde_json::Value {
    let mut doc = serde_json::to_value(submission).unwrap_or_else(|_| serde_json::json!({}));
    doc["recommendations"] =
        serde_json::to_value(recommendations).unwrap_or_else(|_| serde_json::json!({}));
    doc
}

/// Persists one survey response and returns its store-assigned id.
/// `created_at` is assigned by the store itself.
pub async fn save_response(
    pool: &PgPool,
    submission: &SurveySubmission,
    recommendations: &RecommendationResult,
) -> Result<Uuid, AppError> {
    let id = Uuid::new_v4();
    let doc = build_response_document(submission, recommendations);

    sqlx::query("INSERT INTO survey_responses (id, data) VALUES ($1, $2)")
        .bind(id)
        .bind(&doc)
        .execute(pool)
        .await?;

    info!("Stored survey response {id}");
    Ok(id)
}

/// Returns every stored record, unordered at the store level. Callers impose
/// display ordering.
pub async fn get_all(pool: &PgPool) -> Result<Vec<SurveyResponseRow>, AppError> {
    Ok(sqlx::query_as::<_, SurveyResponseRow>(
        "SELECT id, data, created_at FROM survey_responses",
    )
    .fetch_all(pool)
    .await?)
}

/// Returns the record or an explicit absence; a missing id is not an error.
pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<SurveyResponseRow>, AppError> {
    Ok(sqlx::query_as::<_, SurveyResponseRow>(
        "SELECT id, data, created_at FROM survey_responses WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::survey::{PersonalProfile, PersonalityProfile};

    fn make_submission() -> SurveySubmission {
        SurveySubmission {
            personal_profile: PersonalProfile {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                birth_year: "1990".to_string(),
                birth_month: "4".to_string(),
                construction_experience: "5".to_string(),
            },
            personality_profile: PersonalityProfile {
                mbti_type: "ENFP".to_string(),
                holland_code: vec!["R".to_string()],
            },
            ..SurveySubmission::default()
        }
    }

    fn make_recommendations() -> RecommendationResult {
        RecommendationResult {
            jobs: vec!["X".to_string()],
            holland_description: "hands-on".to_string(),
            mbti_description: String::new(),
            holland_code: "R".to_string(),
            mbti_type: "ENFP".to_string(),
        }
    }

    #[test]
    fn test_document_carries_all_sections_and_recommendations() {
        let doc = build_response_document(&make_submission(), &make_recommendations());

        assert_eq!(doc["personalProfile"]["firstName"], "Jane");
        assert_eq!(doc["personalityProfile"]["mbtiType"], "ENFP");
        assert!(doc.get("skillsProfile").is_some());
        assert!(doc.get("workPreferences").is_some());
        assert!(doc.get("goalsProfile").is_some());
        assert_eq!(doc["recommendations"]["jobs"][0], "X");
        assert_eq!(doc["recommendations"]["hollandCode"], "R");
    }

    #[test]
    fn test_document_is_detached_from_its_inputs() {
        let submission = make_submission();
        let recommendations = make_recommendations();
        let mut doc = build_response_document(&submission, &recommendations);

        // Mutating the document must not reach back into the inputs
        doc["recommendations"]["jobs"][0] = serde_json::json!("tampered");
        doc["personalProfile"]["firstName"] = serde_json::json!("tampered");

        assert_eq!(recommendations.jobs, vec!["X"]);
        assert_eq!(submission.personal_profile.first_name, "Jane");
    }

    #[test]
    fn test_recommendations_stored_verbatim() {
        let doc = build_response_document(&make_submission(), &make_recommendations());
        let stored: RecommendationResult =
            serde_json::from_value(doc["recommendations"].clone()).unwrap();
        assert_eq!(stored.jobs, vec!["X"]);
        assert_eq!(stored.holland_description, "hands-on");
    }
}
