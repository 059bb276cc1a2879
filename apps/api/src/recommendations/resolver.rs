//! Recommendation resolver — combines the Holland and MBTI lookup tables
//! into one career recommendation.
//!
//! Pure read: the resolver never persists anything. The caller (the survey
//! submit path) stores the result verbatim alongside the submission.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::recommendations::tables::RecommendationTables;

/// The combined recommendation stored with every survey response.
/// Field names are the persisted document contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResult {
    pub jobs: Vec<String>,
    pub holland_description: String,
    pub mbti_description: String,
    pub holland_code: String,
    pub mbti_type: String,
}

/// Resolves a Holland code and an MBTI type against the lookup tables.
///
/// The inputs are looked up as literal, case-sensitive keys — no validation,
/// no normalization. A key absent from its table contributes an empty job
/// list and empty description; the call never fails. `jobs` is the union of
/// the Holland list then the MBTI list, deduplicated preserving first-seen
/// order.
pub fn resolve(
    tables: &RecommendationTables,
    holland_code: &str,
    mbti_type: &str,
) -> RecommendationResult {
    let holland = tables.holland(holland_code);
    let mbti = tables.mbti(mbti_type);

    let mut seen = HashSet::new();
    let mut jobs = Vec::new();
    for job in holland
        .iter()
        .flat_map(|e| e.jobs.iter())
        .chain(mbti.iter().flat_map(|e| e.jobs.iter()))
    {
        if seen.insert(job.as_str()) {
            jobs.push(job.clone());
        }
    }

    RecommendationResult {
        jobs,
        holland_description: holland.map(|e| e.description.clone()).unwrap_or_default(),
        mbti_description: mbti.map(|e| e.description.clone()).unwrap_or_default(),
        holland_code: holland_code.to_string(),
        mbti_type: mbti_type.to_string(),
    }
}
