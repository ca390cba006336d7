//! Deterministic rule-based scoring, used when every AI provider is down.
//!
//! Lower quality than the model-scored path, but always available and fully
//! reproducible: identical inputs produce identical scores and ordering.

use crate::models::{
    GuruProfile, MatchCandidate, MatchOptions, MatchStatus, MatchType, Provider, UnderstudyProfile,
};

const FORWARD_SKILL_POINTS: f64 = 30.0;
const REVERSE_SKILL_POINTS: f64 = 25.0;
const LOCATION_POINTS: f64 = 10.0;
const BUDGET_POINTS: f64 = 10.0;
const MAX_SCORE: f64 = 100.0;

/// Raw rule-based score for one guru/understudy pair
#[derive(Debug, Clone)]
pub struct RuleScore {
    pub score: f64,
    pub match_type: MatchType,
    pub reasons: Vec<String>,
}

/// Score a single pair against the four rules
///
/// Skill comparisons are case-insensitive substring containment in either
/// direction, so "javascript" pairs with "JavaScript basics".
pub fn score_pair(guru: &GuruProfile, understudy: &UnderstudyProfile) -> RuleScore {
    let mut score = 0.0;
    let mut match_type = MatchType::BasicMatch;
    let mut reasons = Vec::new();

    // Forward: guru teaches what the understudy wants
    for offered in &guru.offered_skills {
        for wanted in &understudy.wanted_skills {
            if skills_overlap(offered, wanted) {
                score += FORWARD_SKILL_POINTS;
                match_type = MatchType::SkillMatch;
                reasons.push(format!("skill match: {} -> {}", offered, wanted));
            }
        }
    }

    // Reverse: understudy can teach the guru back; takes precedence
    for offered in &understudy.offered_skills {
        for wanted in &guru.wanted_skills {
            if skills_overlap(offered, wanted) {
                score += REVERSE_SKILL_POINTS;
                match_type = MatchType::SkillExchange;
                reasons.push(format!("skill exchange: {} -> {}", offered, wanted));
            }
        }
    }

    if same_area(guru, understudy) {
        score += LOCATION_POINTS;
        reasons.push("location proximity".to_string());
    }

    if budget_compatible(guru, understudy) {
        score += BUDGET_POINTS;
        reasons.push("budget within guru price range".to_string());
    }

    RuleScore {
        score: score.min(MAX_SCORE),
        match_type,
        reasons,
    }
}

/// Score, filter, rank and truncate all candidates for a guru
pub fn rank_candidates(
    guru: &GuruProfile,
    understudies: &[UnderstudyProfile],
    options: &MatchOptions,
) -> Vec<MatchCandidate> {
    let generated_at = chrono::Utc::now();

    let mut candidates: Vec<MatchCandidate> = understudies
        .iter()
        .filter_map(|understudy| {
            let rule_score = score_pair(guru, understudy);
            if rule_score.score < options.min_score {
                return None;
            }

            Some(MatchCandidate {
                understudy_id: understudy.id.clone(),
                match_score: rule_score.score,
                match_type: rule_score.match_type,
                reasoning: rule_score.reasons.join("; "),
                recommendations: None,
                guru_id: guru.id.clone(),
                ai_provider: Provider::RuleBased,
                generated_at,
                status: MatchStatus::RuleBasedSuggested,
            })
        })
        .collect();

    // Highest score first; stable sort keeps input order on ties
    candidates.sort_by(|a, b| {
        b.match_score
            .partial_cmp(&a.match_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    candidates.truncate(options.limit);
    candidates
}

#[inline]
fn skills_overlap(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(&b) || b.contains(&a)
}

fn same_area(guru: &GuruProfile, understudy: &UnderstudyProfile) -> bool {
    let Some(guru_location) = guru.location.as_deref() else {
        return false;
    };
    let Some(city) = understudy.city() else {
        return false;
    };
    guru_location.to_lowercase().contains(&city.to_lowercase())
}

fn budget_compatible(guru: &GuruProfile, understudy: &UnderstudyProfile) -> bool {
    match (&guru.price_range, &understudy.budget) {
        (Some(price), Some(budget)) => price.min <= budget.max,
        _ => false,
    }
}
