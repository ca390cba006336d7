//! Guru Match - AI-assisted matchmaking for the YooHoo skill-sharing marketplace
//!
//! This library pairs gurus (teachers) with understudies (learners) and maps
//! skills onto a fixed category set. Scoring goes through an LLM provider
//! gateway with a primary/fallback chain; when no provider answers, a
//! deterministic rule-based scorer keeps the matching feature alive.

pub mod config;
pub mod core;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use crate::config::{MatchingSettings, ProviderSettings, Settings};
pub use crate::core::{rank_candidates, score_pair, MatchResolver};
pub use crate::models::{
    GuruProfile, LearningRecommendation, MatchCandidate, MatchOptions, MatchStatus, MatchType,
    Provider, SkillCategorization, SkillSummary, UnderstudyProfile, ALLOWED_CATEGORIES,
};
pub use crate::services::{Completion, CompletionModels, GatewayError, ProviderGateway};
