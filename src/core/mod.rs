// Core algorithm exports
pub mod fallback;
pub mod parser;
pub mod prompts;
pub mod resolver;

pub use fallback::{rank_candidates, score_pair, RuleScore};
pub use parser::{
    extract_fenced_json, parse_categorization, parse_match_response, parse_recommendations,
    ParseError, RawCategorization, RawMatch, RawRecommendation,
};
pub use resolver::MatchResolver;
