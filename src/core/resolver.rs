use crate::config::{MatchingSettings, ProviderSettings, Settings};
use crate::core::{fallback, parser, prompts};
use crate::models::{
    canonical_category, ChatMessage, GuruProfile, LearningRecommendation, MatchCandidate,
    MatchOptions, MatchStatus, MatchType, Provider, SkillCategorization, SkillSummary,
    UnderstudyProfile,
};
use crate::services::{CompletionModels, ProviderGateway};
use validator::Validate;

/// Main matching orchestrator
///
/// Every public method degrades instead of failing: AI matching falls back to
/// the rule-based scorer, categorization to `None`, recommendations to an
/// empty list. Callers never see an error from this type.
pub struct MatchResolver {
    gateway: ProviderGateway,
    models: CompletionModels,
    matching: MatchingSettings,
}

impl MatchResolver {
    pub fn new(providers: ProviderSettings, matching: MatchingSettings) -> Self {
        let gateway = ProviderGateway::new(providers);
        let models = gateway.default_models();
        Self {
            gateway,
            models,
            matching,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.providers.clone(), settings.matching.clone())
    }

    /// Rank understudy candidates for a guru
    ///
    /// Returns AI-scored matches in the model's own order, or rule-based
    /// matches when no provider answers usably. Always returns an array,
    /// possibly empty.
    pub async fn generate_skill_matches(
        &self,
        guru: &GuruProfile,
        understudies: &[UnderstudyProfile],
        options: &MatchOptions,
    ) -> Vec<MatchCandidate> {
        let options = self.effective_options(options);

        if understudies.is_empty() {
            return Vec::new();
        }

        let messages = [
            ChatMessage::system(prompts::SKILL_MATCH_SYSTEM),
            ChatMessage::user(prompts::build_match_prompt(guru, understudies)),
        ];

        let completion = match self.gateway.complete(&messages, &self.models).await {
            Ok(completion) => completion,
            Err(error) => {
                tracing::warn!(
                    "AI matching unavailable ({}), falling back to rule-based scoring",
                    error
                );
                return fallback::rank_candidates(guru, understudies, &options);
            }
        };

        match parser::parse_match_response(&completion.text) {
            Ok(raw) => stamp_matches(raw, guru, &options, completion.provider),
            Err(error) => {
                tracing::warn!(
                    "Could not parse {} match response ({}), falling back to rule-based scoring",
                    completion.provider.as_str(),
                    error
                );
                fallback::rank_candidates(guru, understudies, &options)
            }
        }
    }

    /// Map a skill title/summary onto the allowed category set
    ///
    /// Best-effort enhancement: returns `None` on a blank title, missing
    /// provider keys, provider failure, unparseable output, or an out-of-set
    /// category. No network call happens in the first two cases.
    pub async fn categorize_skill(&self, skill: &SkillSummary) -> Option<SkillCategorization> {
        if skill.title.trim().is_empty() {
            return None;
        }
        if !self.gateway.has_any_provider() {
            tracing::debug!("No provider key configured, skipping AI categorization");
            return None;
        }

        let messages = [
            ChatMessage::system(prompts::categorize_system()),
            ChatMessage::user(prompts::build_categorize_prompt(skill)),
        ];

        let completion = match self.gateway.complete(&messages, &self.models).await {
            Ok(completion) => completion,
            Err(error) => {
                tracing::warn!("AI categorization failed for '{}': {}", skill.title, error);
                return None;
            }
        };

        let raw = match parser::parse_categorization(&completion.text) {
            Ok(raw) => raw,
            Err(error) => {
                tracing::warn!(
                    "Unparseable categorization reply for '{}': {}",
                    skill.title,
                    error
                );
                return None;
            }
        };

        match canonical_category(&raw.category) {
            Some(category) => Some(SkillCategorization {
                category: category.to_string(),
                confidence: raw.confidence,
                reasoning: raw.reasoning.unwrap_or_default(),
                provider: completion.provider,
            }),
            None => {
                tracing::warn!(
                    "Model named category '{}' outside the allowed set, discarding",
                    raw.category
                );
                None
            }
        }
    }

    /// Suggest skills for a user to learn next
    ///
    /// Same one-shot prompt/parse convention as matching; `[]` on any failure.
    pub async fn generate_learning_recommendations(
        &self,
        user: &UnderstudyProfile,
        available_skills: &[SkillSummary],
    ) -> Vec<LearningRecommendation> {
        if available_skills.is_empty() {
            return Vec::new();
        }

        let messages = [
            ChatMessage::system(prompts::RECOMMEND_SYSTEM),
            ChatMessage::user(prompts::build_recommendation_prompt(user, available_skills)),
        ];

        let completion = match self.gateway.complete(&messages, &self.models).await {
            Ok(completion) => completion,
            Err(error) => {
                tracing::warn!("Recommendation call failed for '{}': {}", user.id, error);
                return Vec::new();
            }
        };

        match parser::parse_recommendations(&completion.text) {
            Ok(raw) => raw
                .into_iter()
                .map(|r| LearningRecommendation {
                    skill_title: r.skill_title,
                    category: r.category.unwrap_or_default(),
                    reasoning: r.reasoning.unwrap_or_default(),
                    priority: clamp_priority(r.priority),
                })
                .collect(),
            Err(error) => {
                tracing::warn!("Unparseable recommendation reply: {}", error);
                Vec::new()
            }
        }
    }

    /// Clamp caller options against configured bounds
    ///
    /// Invalid options fall back to the configured defaults with a warning
    /// rather than surfacing an error.
    fn effective_options(&self, options: &MatchOptions) -> MatchOptions {
        if options.validate().is_err() {
            tracing::warn!(
                "Invalid match options (limit={}, min_score={}), using defaults",
                options.limit,
                options.min_score
            );
            return MatchOptions {
                limit: self.matching.default_limit,
                min_score: self.matching.min_score,
            };
        }

        MatchOptions {
            limit: options.limit.min(self.matching.max_limit),
            min_score: options.min_score,
        }
    }
}

/// Filter, truncate and stamp model-scored matches
///
/// AI-assigned ordering is trusted; only the score floor and limit apply.
fn stamp_matches(
    raw: Vec<parser::RawMatch>,
    guru: &GuruProfile,
    options: &MatchOptions,
    provider: Provider,
) -> Vec<MatchCandidate> {
    let generated_at = chrono::Utc::now();

    raw.into_iter()
        .filter(|m| m.match_score >= options.min_score)
        .take(options.limit)
        .map(|m| MatchCandidate {
            understudy_id: m.understudy_id,
            match_score: m.match_score.clamp(0.0, 100.0),
            match_type: m.match_type.unwrap_or(MatchType::BasicMatch),
            reasoning: m.reasoning.unwrap_or_default(),
            recommendations: m.recommendations,
            guru_id: guru.id.clone(),
            ai_provider: provider,
            generated_at,
            status: MatchStatus::AiSuggested,
        })
        .collect()
}

fn clamp_priority(priority: Option<f64>) -> u8 {
    match priority {
        Some(p) if p.is_finite() => (p.round() as i64).clamp(1, 5) as u8,
        _ => 3,
    }
}
