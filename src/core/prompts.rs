//! Prompt construction for matching, categorization and recommendations.
//!
//! System prompts pin the output contract (JSON, closed vocabularies); user
//! prompts embed the profiles as readable text.

use crate::models::{GuruProfile, SkillSummary, UnderstudyProfile, ALLOWED_CATEGORIES};
use std::fmt::Write;

/// System prompt for guru/understudy matching: five scoring axes, JSON array output.
pub const SKILL_MATCH_SYSTEM: &str = "You are a matchmaking assistant for a skill-sharing marketplace. \
    Score the compatibility of a guru (teacher) against each understudy (learner) from 0 to 100, \
    weighing: 1) skill complementarity (guru offers what the understudy wants), \
    2) reverse skill exchange (understudy offers what the guru wants), \
    3) location proximity, 4) schedule overlap, 5) experience-level fit. \
    Respond with a JSON array only. Each element must have the fields: \
    \"understudyId\" (string), \"matchScore\" (number 0-100), \
    \"matchType\" (one of \"perfect_match\", \"skill_exchange\", \"complementary\", \"location_match\", \"basic_match\"), \
    \"reasoning\" (string), \"recommendations\" (string). \
    Do not include any text outside the JSON array.";

/// System prompt for learning recommendations: JSON array output.
pub const RECOMMEND_SYSTEM: &str = "You are a learning advisor for a skill-sharing marketplace. \
    Given a user's profile and the skills currently available, recommend which skills they should \
    learn next. Respond with a JSON array only. Each element must have the fields: \
    \"skillTitle\" (string), \"category\" (string), \"reasoning\" (string), \
    \"priority\" (integer 1-5, 1 highest). Do not include any text outside the JSON array.";

/// System prompt for skill categorization, enumerating the allowed set verbatim.
pub fn categorize_system() -> String {
    format!(
        "You are a taxonomist for a skill-sharing marketplace. Assign a skill to exactly one \
         of these categories: {}. Never invent a category outside this list. \
         Respond with a JSON object only, with the fields: \"category\" (string), \
         \"confidence\" (number 0-1), \"reasoning\" (string). \
         Do not include any text outside the JSON object.",
        ALLOWED_CATEGORIES.join(", ")
    )
}

/// User prompt embedding the guru and every understudy candidate.
pub fn build_match_prompt(guru: &GuruProfile, understudies: &[UnderstudyProfile]) -> String {
    let mut prompt = String::new();

    writeln!(prompt, "GURU PROFILE:").ok();
    writeln!(prompt, "- id: {}", guru.id).ok();
    writeln!(prompt, "- name: {}", guru.name).ok();
    writeln!(prompt, "- offers: {}", join_or_none(&guru.offered_skills)).ok();
    writeln!(prompt, "- wants: {}", join_or_none(&guru.wanted_skills)).ok();
    writeln!(
        prompt,
        "- experience: {}",
        guru.experience_level.as_deref().unwrap_or("unspecified")
    )
    .ok();
    writeln!(
        prompt,
        "- location: {}",
        guru.location.as_deref().unwrap_or("unspecified")
    )
    .ok();
    writeln!(prompt, "- availability: {}", join_or_none(&guru.availability)).ok();
    if let Some(rating) = guru.rating {
        writeln!(prompt, "- rating: {:.1}", rating).ok();
    }
    if let Some(price) = &guru.price_range {
        writeln!(prompt, "- price range: {:.0}-{:.0}", price.min, price.max).ok();
    }
    if let Some(bio) = &guru.bio {
        writeln!(prompt, "- bio: {}", bio).ok();
    }

    writeln!(prompt, "\nUNDERSTUDY CANDIDATES:").ok();
    for understudy in understudies {
        writeln!(prompt, "---").ok();
        writeln!(prompt, "- id: {}", understudy.id).ok();
        writeln!(prompt, "- name: {}", understudy.name).ok();
        writeln!(
            prompt,
            "- offers: {}",
            join_or_none(&understudy.offered_skills)
        )
        .ok();
        writeln!(
            prompt,
            "- wants: {}",
            join_or_none(&understudy.wanted_skills)
        )
        .ok();
        writeln!(
            prompt,
            "- experience: {}",
            understudy
                .experience_level
                .as_deref()
                .unwrap_or("unspecified")
        )
        .ok();
        writeln!(
            prompt,
            "- location: {}",
            understudy.location.as_deref().unwrap_or("unspecified")
        )
        .ok();
        writeln!(
            prompt,
            "- availability: {}",
            join_or_none(&understudy.availability)
        )
        .ok();
        if let Some(budget) = &understudy.budget {
            writeln!(
                prompt,
                "- budget: {:.0}-{:.0} {}",
                budget.min,
                budget.max,
                budget.currency.as_deref().unwrap_or("USD")
            )
            .ok();
        }
    }

    writeln!(
        prompt,
        "\nScore every candidate and return the JSON array described in your instructions."
    )
    .ok();

    prompt
}

/// User prompt for categorizing one skill.
pub fn build_categorize_prompt(skill: &SkillSummary) -> String {
    let mut prompt = String::new();
    writeln!(prompt, "SKILL TITLE: {}", skill.title).ok();
    if let Some(summary) = &skill.summary {
        writeln!(prompt, "SKILL SUMMARY: {}", summary).ok();
    }
    writeln!(
        prompt,
        "\nReturn the JSON object described in your instructions."
    )
    .ok();
    prompt
}

/// User prompt for learning recommendations.
pub fn build_recommendation_prompt(
    user: &UnderstudyProfile,
    available_skills: &[SkillSummary],
) -> String {
    let mut prompt = String::new();

    writeln!(prompt, "USER PROFILE:").ok();
    writeln!(prompt, "- name: {}", user.name).ok();
    writeln!(
        prompt,
        "- already offers: {}",
        join_or_none(&user.offered_skills)
    )
    .ok();
    writeln!(
        prompt,
        "- wants to learn: {}",
        join_or_none(&user.wanted_skills)
    )
    .ok();
    writeln!(
        prompt,
        "- experience: {}",
        user.experience_level.as_deref().unwrap_or("unspecified")
    )
    .ok();
    if let Some(bio) = &user.bio {
        writeln!(prompt, "- bio: {}", bio).ok();
    }

    writeln!(prompt, "\nAVAILABLE SKILLS:").ok();
    for skill in available_skills {
        match &skill.summary {
            Some(summary) => writeln!(prompt, "- {}: {}", skill.title, summary).ok(),
            None => writeln!(prompt, "- {}", skill.title).ok(),
        };
    }

    writeln!(
        prompt,
        "\nRecommend up to five skills and return the JSON array described in your instructions."
    )
    .ok();

    prompt
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetRange, PriceRange};

    fn guru() -> GuruProfile {
        GuruProfile {
            id: "g1".to_string(),
            name: "Ada".to_string(),
            offered_skills: vec!["guitar".to_string()],
            wanted_skills: vec!["spanish".to_string()],
            experience_level: Some("expert".to_string()),
            location: Some("Portland, OR".to_string()),
            availability: vec!["weekends".to_string()],
            rating: Some(4.8),
            bio: None,
            price_range: Some(PriceRange { min: 20.0, max: 50.0 }),
        }
    }

    fn understudy() -> UnderstudyProfile {
        UnderstudyProfile {
            id: "u1".to_string(),
            name: "Sam".to_string(),
            offered_skills: vec!["spanish".to_string()],
            wanted_skills: vec!["guitar".to_string()],
            experience_level: Some("beginner".to_string()),
            location: Some("Portland, OR".to_string()),
            availability: vec!["weekends".to_string()],
            rating: None,
            bio: None,
            budget: Some(BudgetRange {
                min: 10.0,
                max: 40.0,
                currency: Some("USD".to_string()),
            }),
        }
    }

    #[test]
    fn test_match_prompt_embeds_both_profiles() {
        let prompt = build_match_prompt(&guru(), &[understudy()]);
        assert!(prompt.contains("GURU PROFILE"));
        assert!(prompt.contains("id: g1"));
        assert!(prompt.contains("id: u1"));
        assert!(prompt.contains("offers: guitar"));
        assert!(prompt.contains("budget: 10-40 USD"));
    }

    #[test]
    fn test_categorize_system_lists_every_category() {
        let system = categorize_system();
        for category in ALLOWED_CATEGORIES {
            assert!(system.contains(category), "missing {}", category);
        }
    }

    #[test]
    fn test_recommendation_prompt_lists_skills() {
        let skills = vec![
            SkillSummary {
                title: "Watercolor".to_string(),
                summary: Some("intro painting".to_string()),
            },
            SkillSummary {
                title: "Sourdough".to_string(),
                summary: None,
            },
        ];
        let prompt = build_recommendation_prompt(&understudy(), &skills);
        assert!(prompt.contains("Watercolor: intro painting"));
        assert!(prompt.contains("- Sourdough"));
    }

    #[test]
    fn test_empty_skill_lists_render_as_none() {
        let mut g = guru();
        g.offered_skills.clear();
        let prompt = build_match_prompt(&g, &[]);
        assert!(prompt.contains("offers: none"));
    }
}
