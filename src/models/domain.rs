use serde::{Deserialize, Serialize};

/// Closed set of skill categories the marketplace recognizes.
///
/// Categorization results naming anything outside this list are discarded.
pub const ALLOWED_CATEGORIES: [&str; 8] = [
    "Creative",
    "Technical",
    "Practical",
    "Academic",
    "Wellness",
    "Business",
    "Outdoor",
    "Social",
];

/// Resolve a free-form category string to its canonical spelling, if allowed.
pub fn canonical_category(category: &str) -> Option<&'static str> {
    let trimmed = category.trim();
    ALLOWED_CATEGORIES
        .iter()
        .find(|c| c.eq_ignore_ascii_case(trimmed))
        .copied()
}

/// Price range a guru charges for sessions
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

/// Budget range an understudy is willing to spend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetRange {
    pub min: f64,
    pub max: f64,
    #[serde(default)]
    pub currency: Option<String>,
}

/// Teacher profile with skills offered and sought
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuruProfile {
    pub id: String,
    pub name: String,
    #[serde(rename = "offeredSkills", default)]
    pub offered_skills: Vec<String>,
    #[serde(rename = "wantedSkills", default)]
    pub wanted_skills: Vec<String>,
    #[serde(rename = "experienceLevel", default)]
    pub experience_level: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub availability: Vec<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(rename = "priceRange", default)]
    pub price_range: Option<PriceRange>,
}

/// Learner profile, symmetric to [`GuruProfile`] plus a budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnderstudyProfile {
    pub id: String,
    pub name: String,
    #[serde(rename = "offeredSkills", default)]
    pub offered_skills: Vec<String>,
    #[serde(rename = "wantedSkills", default)]
    pub wanted_skills: Vec<String>,
    #[serde(rename = "experienceLevel", default)]
    pub experience_level: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub availability: Vec<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub budget: Option<BudgetRange>,
}

impl UnderstudyProfile {
    /// First comma-segment of the location, used for coarse proximity checks.
    pub fn city(&self) -> Option<&str> {
        self.location
            .as_deref()
            .and_then(|l| l.split(',').next())
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// Which backend produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    Openrouter,
    Openai,
    RuleBased,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Openrouter => "openrouter",
            Provider::Openai => "openai",
            Provider::RuleBased => "rule_based",
        }
    }
}

/// How a match candidate was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    AiSuggested,
    RuleBasedSuggested,
}

/// Qualitative shape of a guru/understudy match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    PerfectMatch,
    SkillExchange,
    SkillMatch,
    Complementary,
    LocationMatch,
    BasicMatch,
}

impl MatchType {
    /// Parse one of the known snake_case tokens.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim() {
            "perfect_match" => Some(MatchType::PerfectMatch),
            "skill_exchange" => Some(MatchType::SkillExchange),
            "skill_match" => Some(MatchType::SkillMatch),
            "complementary" => Some(MatchType::Complementary),
            "location_match" => Some(MatchType::LocationMatch),
            "basic_match" => Some(MatchType::BasicMatch),
            _ => None,
        }
    }
}

/// Scored guru/understudy pairing returned to callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchCandidate {
    #[serde(rename = "understudyId")]
    pub understudy_id: String,
    #[serde(rename = "matchScore")]
    pub match_score: f64,
    #[serde(rename = "matchType")]
    pub match_type: MatchType,
    pub reasoning: String,
    #[serde(default)]
    pub recommendations: Option<String>,
    #[serde(rename = "guruId")]
    pub guru_id: String,
    #[serde(rename = "aiProvider")]
    pub ai_provider: Provider,
    #[serde(rename = "generatedAt")]
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub status: MatchStatus,
}

/// Result of mapping a skill onto the allowed category set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCategorization {
    pub category: String,
    pub confidence: Option<f64>,
    pub reasoning: String,
    pub provider: Provider,
}

/// A skill title plus optional free-text summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillSummary {
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
}

/// Suggested skill for a user to learn next
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningRecommendation {
    #[serde(rename = "skillTitle")]
    pub skill_title: String,
    pub category: String,
    pub reasoning: String,
    /// 1 (highest) through 5 (lowest)
    pub priority: u8,
}

/// Tunables for a single matching call
#[derive(Debug, Clone, Copy, Serialize, Deserialize, validator::Validate)]
pub struct MatchOptions {
    /// Maximum number of candidates to return
    #[validate(range(min = 1))]
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Candidates scoring below this are discarded
    #[validate(range(min = 0.0, max = 100.0))]
    #[serde(rename = "minScore", default = "default_min_score")]
    pub min_score: f64,
}

fn default_limit() -> usize {
    5
}

fn default_min_score() -> f64 {
    70.0
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            min_score: default_min_score(),
        }
    }
}
