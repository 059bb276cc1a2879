use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One stored survey response: an opaque store-assigned id, the submitted
/// document, and the server-assigned creation time. Records are immutable
/// once written; `recommendations` inside `data` is never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SurveyResponseRow {
    pub id: Uuid,
    pub data: Value,
    pub created_at: DateTime<Utc>,
}

// The submission payload mirrors the persisted document shape: camelCase
// field names, five nested profile sections. Every field defaults so a
// partial payload degrades instead of being rejected here — form-level
// validation happens at the client boundary, not in this service.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalProfile {
    pub first_name: String,
    pub last_name: String,
    pub birth_year: String,
    pub birth_month: String,
    pub construction_experience: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalityProfile {
    /// One of the 16 canonical 4-letter codes, e.g. "ISTJ". Not validated.
    pub mbti_type: String,
    /// Ordered list of 1–3 letters from {R,I,A,S,E,C}.
    pub holland_code: Vec<String>,
}

impl PersonalityProfile {
    /// The lookup key for the Holland table: the ordered letters concatenated
    /// (["R","I","A"] → "RIA").
    pub fn holland_key(&self) -> String {
        self.holland_code.join("")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillsProfile {
    pub technical_skills: Vec<String>,
    pub certification_level: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkPreferences {
    pub career_interests: Vec<String>,
    pub tech_interests: Vec<String>,
    pub environment_preference: String,
    pub travel_willingness: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GoalsProfile {
    pub career_goals: Vec<String>,
    pub salary_target: String,
    pub advancement_preference: String,
    pub mentorship_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SurveySubmission {
    pub personal_profile: PersonalProfile,
    pub personality_profile: PersonalityProfile,
    pub skills_profile: SkillsProfile,
    pub work_preferences: WorkPreferences,
    pub goals_profile: GoalsProfile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holland_key_concatenates_letters_in_order() {
        let profile = PersonalityProfile {
            mbti_type: "ISTJ".to_string(),
            holland_code: vec!["R".to_string(), "I".to_string(), "A".to_string()],
        };
        assert_eq!(profile.holland_key(), "RIA");
    }

    #[test]
    fn test_holland_key_empty_list_is_empty_string() {
        assert_eq!(PersonalityProfile::default().holland_key(), "");
    }

    #[test]
    fn test_submission_deserializes_camel_case_with_missing_sections() {
        let submission: SurveySubmission = serde_json::from_str(
            r#"{
                "personalProfile": {"firstName": "Jane", "lastName": "Doe"},
                "personalityProfile": {"mbtiType": "ENFP", "hollandCode": ["R"]}
            }"#,
        )
        .expect("partial payload must deserialize");

        assert_eq!(submission.personal_profile.first_name, "Jane");
        assert_eq!(submission.personality_profile.holland_key(), "R");
        // Missing sections fall back to defaults, not errors
        assert!(submission.skills_profile.technical_skills.is_empty());
        assert_eq!(submission.goals_profile.salary_target, "");
    }

    #[test]
    fn test_submission_serializes_camel_case_keys() {
        let value = serde_json::to_value(SurveySubmission::default()).unwrap();
        assert!(value.get("personalProfile").is_some());
        assert!(value["personalityProfile"].get("hollandCode").is_some());
        assert!(value["skillsProfile"].get("technicalSkills").is_some());
    }
}
