//! Record flattening — projects the nested survey document into a single
//! tabular row for reporting.
//!
//! Every accessor substitutes a defined default for a missing or mismatched
//! path, so a malformed record degrades to defaults instead of aborting the
//! aggregation. Multi-value fields are joined with ", "; the aggregation
//! side splits them back into atoms.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::models::survey::SurveyResponseRow;

/// Walks an ordered path of field names, returning `None` on the first
/// missing segment.
pub fn get_path<'a>(doc: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = doc;
    for segment in path {
        current = current.get(segment)?;
    }
    Some(current)
}

/// String at path, `""` when absent. Bare numbers are rendered as strings to
/// tolerate numeric-as-string drift in older records.
pub fn str_at(doc: &Value, path: &[&str]) -> String {
    match get_path(doc, path) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// String list at path, empty when absent. A bare string is treated as a
/// one-element list (older records stored `hollandCode` as a plain string).
pub fn list_at(doc: &Value, path: &[&str]) -> Vec<String> {
    match get_path(doc, path) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// One flattened survey response. Multi-value fields are ", "-joined.
#[derive(Debug, Clone, Serialize)]
pub struct FlatResponse {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub first_name: String,
    pub last_name: String,
    pub birth_year: String,
    pub birth_month: String,
    pub construction_experience: String,
    pub mbti_type: String,
    pub holland_code: String,
    pub technical_skills: String,
    pub certification_level: String,
    pub career_interests: String,
    pub tech_interests: String,
    pub environment_preference: String,
    pub travel_willingness: String,
    pub career_goals: String,
    pub salary_target: String,
    pub advancement_preference: String,
    pub mentorship_type: String,
    pub recommended_jobs: String,
}

const LIST_SEPARATOR: &str = ", ";

/// Flattens one stored record. Never fails; anything missing becomes the
/// documented default. The timestamp comes from the store's `created_at`,
/// already normalized to UTC.
pub fn flatten(row: &SurveyResponseRow) -> FlatResponse {
    let d = &row.data;
    FlatResponse {
        id: row.id,
        timestamp: row.created_at,
        first_name: str_at(d, &["personalProfile", "firstName"]),
        last_name: str_at(d, &["personalProfile", "lastName"]),
        birth_year: str_at(d, &["personalProfile", "birthYear"]),
        birth_month: str_at(d, &["personalProfile", "birthMonth"]),
        construction_experience: str_at(d, &["personalProfile", "constructionExperience"]),
        mbti_type: str_at(d, &["personalityProfile", "mbtiType"]),
        holland_code: list_at(d, &["personalityProfile", "hollandCode"]).join(LIST_SEPARATOR),
        technical_skills: list_at(d, &["skillsProfile", "technicalSkills"]).join(LIST_SEPARATOR),
        certification_level: str_at(d, &["skillsProfile", "certificationLevel"]),
        career_interests: list_at(d, &["workPreferences", "careerInterests"]).join(LIST_SEPARATOR),
        tech_interests: list_at(d, &["workPreferences", "techInterests"]).join(LIST_SEPARATOR),
        environment_preference: str_at(d, &["workPreferences", "environmentPreference"]),
        travel_willingness: str_at(d, &["workPreferences", "travelWillingness"]),
        career_goals: list_at(d, &["goalsProfile", "careerGoals"]).join(LIST_SEPARATOR),
        salary_target: str_at(d, &["goalsProfile", "salaryTarget"]),
        advancement_preference: str_at(d, &["goalsProfile", "advancementPreference"]),
        mentorship_type: str_at(d, &["goalsProfile", "mentorshipType"]),
        recommended_jobs: list_at(d, &["recommendations", "jobs"]).join(LIST_SEPARATOR),
    }
}
