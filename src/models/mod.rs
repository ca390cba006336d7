// Model exports
pub mod domain;
pub mod wire;

pub use domain::{
    canonical_category, BudgetRange, GuruProfile, LearningRecommendation, MatchCandidate,
    MatchOptions, MatchStatus, MatchType, PriceRange, Provider, SkillCategorization, SkillSummary,
    UnderstudyProfile, ALLOWED_CATEGORIES,
};
pub use wire::{ChatMessage, ChatRequest, ChatResponse, Choice, ResponseMessage, Role, Usage};
