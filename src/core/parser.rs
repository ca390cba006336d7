//! Staged parsing of free-text provider replies.
//!
//! Models are told to answer with bare JSON, but in practice replies arrive
//! as fenced code blocks, raw JSON, or prose with recognizable fragments.
//! Each stage returns `Option`; the pipeline short-circuits on the first
//! success and errors only when every stage comes up empty.

use crate::models::MatchType;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("response did not contain a recognizable payload")]
    Unrecognized,
}

/// Match candidate as emitted by the model, before stamping
#[derive(Debug, Clone, Deserialize)]
pub struct RawMatch {
    #[serde(alias = "understudyId", alias = "id")]
    pub understudy_id: String,
    #[serde(alias = "matchScore", alias = "score")]
    pub match_score: f64,
    #[serde(default, alias = "matchType")]
    pub match_type: Option<MatchType>,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub recommendations: Option<String>,
}

/// Categorization as emitted by the model, before validation
#[derive(Debug, Clone, Deserialize)]
pub struct RawCategorization {
    pub category: String,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

/// Recommendation as emitted by the model, before clamping
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecommendation {
    #[serde(alias = "skillTitle")]
    pub skill_title: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub priority: Option<f64>,
}

/// Extract the contents of a fenced json code block, if present.
pub fn extract_fenced_json(text: &str) -> Option<&str> {
    let start = text.find("```json")? + "```json".len();
    let rest = &text[start..];
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}

fn parse_json_matches(text: &str) -> Option<Vec<RawMatch>> {
    serde_json::from_str(text.trim()).ok()
}

/// Parse a match reply: fenced JSON, then whole-body JSON, then line scan.
pub fn parse_match_response(text: &str) -> Result<Vec<RawMatch>, ParseError> {
    if let Some(block) = extract_fenced_json(text) {
        if let Some(matches) = parse_json_matches(block) {
            return Ok(matches);
        }
    }

    if let Some(matches) = parse_json_matches(text) {
        return Ok(matches);
    }

    scan_match_lines(text).ok_or(ParseError::Unrecognized)
}

/// Last-resort line scan for ids, scores and match-type tokens.
///
/// A candidate is emitted once both an understudy id and a numeric score have
/// been seen; fields the scan never finds stay unset. Prose with neither id
/// nor score yields nothing.
fn scan_match_lines(text: &str) -> Option<Vec<RawMatch>> {
    const TYPE_TOKENS: [&str; 4] = [
        "perfect_match",
        "skill_exchange",
        "complementary",
        "location_match",
    ];

    let mut matches = Vec::new();
    let mut pending_id: Option<String> = None;
    let mut pending_score: Option<f64> = None;
    let mut pending_type: Option<MatchType> = None;

    for line in text.lines() {
        let lower = line.to_lowercase();

        if lower.contains("understudyid") {
            if let Some(id) = value_after_colon(line) {
                // A fresh id starts a new candidate block
                pending_id = Some(id);
                pending_score = None;
                pending_type = None;
            }
        } else if lower.contains("score") {
            if let Some(score) = first_number(line) {
                pending_score = Some(score);
            }
        }

        for token in TYPE_TOKENS {
            if lower.contains(token) {
                pending_type = MatchType::from_token(token);
            }
        }

        if let (Some(id), Some(score)) = (pending_id.as_ref(), pending_score) {
            matches.push(RawMatch {
                understudy_id: id.clone(),
                match_score: score,
                match_type: pending_type,
                reasoning: None,
                recommendations: None,
            });
            pending_id = None;
            pending_score = None;
            pending_type = None;
        }
    }

    if matches.is_empty() {
        None
    } else {
        Some(matches)
    }
}

/// Parse a categorization reply: fenced JSON, raw JSON, then a raw-text scan
/// for any allowed category name.
pub fn parse_categorization(text: &str) -> Result<RawCategorization, ParseError> {
    if let Some(block) = extract_fenced_json(text) {
        if let Ok(parsed) = serde_json::from_str::<RawCategorization>(block.trim()) {
            return Ok(parsed);
        }
    }

    if let Ok(parsed) = serde_json::from_str::<RawCategorization>(text.trim()) {
        return Ok(parsed);
    }

    scan_text_for_category(text).ok_or(ParseError::Unrecognized)
}

fn scan_text_for_category(text: &str) -> Option<RawCategorization> {
    let lower = text.to_lowercase();

    let mut earliest: Option<(usize, &'static str)> = None;
    for category in crate::models::ALLOWED_CATEGORIES {
        if let Some(pos) = lower.find(&category.to_lowercase()) {
            match earliest {
                Some((best, _)) if best <= pos => {}
                _ => earliest = Some((pos, category)),
            }
        }
    }

    earliest.map(|(_, category)| RawCategorization {
        category: category.to_string(),
        confidence: Some(0.4),
        reasoning: Some("Extracted from AI text".to_string()),
    })
}

/// Parse a recommendations reply: fenced JSON, then whole-body JSON.
pub fn parse_recommendations(text: &str) -> Result<Vec<RawRecommendation>, ParseError> {
    if let Some(block) = extract_fenced_json(text) {
        if let Ok(parsed) = serde_json::from_str::<Vec<RawRecommendation>>(block.trim()) {
            return Ok(parsed);
        }
    }

    serde_json::from_str::<Vec<RawRecommendation>>(text.trim()).map_err(|_| ParseError::Unrecognized)
}

fn value_after_colon(line: &str) -> Option<String> {
    let (_, rest) = line.split_once(':')?;
    let value = rest
        .trim()
        .trim_matches(|c| c == '"' || c == '\'' || c == ',' || c == '}' || c == '{')
        .trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn first_number(line: &str) -> Option<f64> {
    line.split(|c: char| !c.is_ascii_digit() && c != '.')
        .filter(|s| !s.is_empty())
        .find_map(|s| s.parse::<f64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_fenced_json() {
        let text = "Here you go:\n```json\n[{\"a\": 1}]\n```\nThanks!";
        assert_eq!(extract_fenced_json(text), Some("[{\"a\": 1}]"));
        assert_eq!(extract_fenced_json("no fence here"), None);
    }

    #[test]
    fn test_parse_fenced_matches() {
        let text = "```json\n[{\"understudyId\": \"u1\", \"matchScore\": 88, \
                    \"matchType\": \"skill_exchange\", \"reasoning\": \"good fit\"}]\n```";
        let matches = parse_match_response(text).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].understudy_id, "u1");
        assert_eq!(matches[0].match_score, 88.0);
        assert_eq!(matches[0].match_type, Some(MatchType::SkillExchange));
    }

    #[test]
    fn test_parse_raw_json_matches() {
        let text = "[{\"understudyId\": \"u2\", \"score\": 72}]";
        let matches = parse_match_response(text).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].understudy_id, "u2");
        assert_eq!(matches[0].match_score, 72.0);
        assert!(matches[0].match_type.is_none());
    }

    #[test]
    fn test_text_scan_pairs_nearby_lines() {
        let text = "Top pick:\n  understudyId: u7\n  their score is 91 out of 100\n  \
                    this is a skill_exchange situation\nAlso consider:\n  understudyId: u9\n  score: 55";
        let matches = parse_match_response(text).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].understudy_id, "u7");
        assert_eq!(matches[0].match_score, 91.0);
        assert_eq!(matches[1].understudy_id, "u9");
        assert_eq!(matches[1].match_score, 55.0);
        assert!(matches[1].match_type.is_none());
    }

    #[test]
    fn test_match_type_token_after_score_is_lost() {
        // The pair closes as soon as id and score are both seen
        let text = "understudyId: u7\nscore: 91\nskill_exchange";
        let matches = parse_match_response(text).unwrap();
        assert_eq!(matches.len(), 1);
        assert!(matches[0].match_type.is_none());
    }

    #[test]
    fn test_garbage_is_unrecognized() {
        assert!(parse_match_response("the weather is nice today").is_err());
    }

    #[test]
    fn test_empty_json_array_is_valid() {
        let matches = parse_match_response("[]").unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_parse_fenced_categorization() {
        let text = "```json\n{\"category\": \"Creative\", \"confidence\": 0.82, \
                    \"reasoning\": \"painting\"}\n```";
        let parsed = parse_categorization(text).unwrap();
        assert_eq!(parsed.category, "Creative");
        assert_eq!(parsed.confidence, Some(0.82));
    }

    #[test]
    fn test_category_text_scan_defaults() {
        let text = "This is clearly a wellness skill, maybe yoga.";
        let parsed = parse_categorization(text).unwrap();
        assert_eq!(parsed.category, "Wellness");
        assert_eq!(parsed.confidence, Some(0.4));
        assert_eq!(parsed.reasoning.as_deref(), Some("Extracted from AI text"));
    }

    #[test]
    fn test_category_text_scan_picks_earliest_mention() {
        let text = "Business first, then Creative.";
        let parsed = parse_categorization(text).unwrap();
        assert_eq!(parsed.category, "Business");
    }

    #[test]
    fn test_categorization_garbage_is_unrecognized() {
        assert!(parse_categorization("no label in here").is_err());
    }

    #[test]
    fn test_parse_recommendations_raw() {
        let text = "[{\"skillTitle\": \"Watercolor\", \"category\": \"Creative\", \
                    \"reasoning\": \"pairs with sketching\", \"priority\": 2}]";
        let parsed = parse_recommendations(text).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].skill_title, "Watercolor");
        assert_eq!(parsed[0].priority, Some(2.0));
    }

    #[test]
    fn test_first_number_skips_words() {
        assert_eq!(first_number("their score is 91 out of 100"), Some(91.0));
        assert_eq!(first_number("no digits"), None);
    }
}
