//! Parse boundary for judgment responses. Everything here is pure and
//! transport-free: raw text in, explicit success/failure out. Fallback
//! behavior on failure belongs to the callers.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

use crate::config::Criterion;

/// Why a judgment response could not be used.
#[derive(Debug, Error)]
pub enum ParseFailure {
    #[error("response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("no array of entries in response")]
    UnexpectedShape,

    /// Transport-level failure, folded into the parse-failure path so it
    /// degrades exactly like malformed output.
    #[error("judgment call failed: {0}")]
    Collaborator(String),
}

// =============================================================================
// Wire shapes requested from the collaborator (schema hints)
// =============================================================================

/// Criteria response as the collaborator is asked to produce it. Schema
/// clients wrap the array in an object, so the parser below accepts both
/// a bare array and an object-wrapped one.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ScoringResponse {
    pub evaluations: Vec<ScoredLead>,
}

/// One per-lead score entry as requested.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ScoredLead {
    /// 1-based position of the lead in the evaluation prompt.
    pub index: i64,
    pub impact: f64,
    pub proximity: f64,
    pub prominence: f64,
    pub relevance: f64,
    pub hook: f64,
    pub novelty: f64,
    pub conflict: f64,
    pub brief_reasoning: Option<String>,
}

// =============================================================================
// Tolerant parse shapes
// =============================================================================

/// One per-lead entry as actually parsed: every field optional, numbers
/// accepted leniently. Reconciliation decides what a missing value means.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CriteriaEntry {
    #[serde(deserialize_with = "lenient_index")]
    pub index: Option<i64>,
    #[serde(deserialize_with = "lenient_score")]
    pub impact: Option<f64>,
    #[serde(deserialize_with = "lenient_score")]
    pub proximity: Option<f64>,
    #[serde(deserialize_with = "lenient_score")]
    pub prominence: Option<f64>,
    #[serde(deserialize_with = "lenient_score")]
    pub relevance: Option<f64>,
    #[serde(deserialize_with = "lenient_score")]
    pub hook: Option<f64>,
    #[serde(deserialize_with = "lenient_score")]
    pub novelty: Option<f64>,
    #[serde(deserialize_with = "lenient_score")]
    pub conflict: Option<f64>,
    #[serde(deserialize_with = "lenient_text")]
    pub brief_reasoning: Option<String>,
}

impl CriteriaEntry {
    pub fn score(&self, criterion: Criterion) -> Option<f64> {
        match criterion {
            Criterion::Impact => self.impact,
            Criterion::Proximity => self.proximity,
            Criterion::Prominence => self.prominence,
            Criterion::Relevance => self.relevance,
            Criterion::Hook => self.hook,
            Criterion::Novelty => self.novelty,
            Criterion::Conflict => self.conflict,
        }
    }
}

/// One pairwise decision as parsed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PairwiseDecision {
    #[serde(deserialize_with = "lenient_text")]
    pub pair: Option<String>,
    #[serde(deserialize_with = "lenient_index")]
    pub winner: Option<i64>,
    #[serde(deserialize_with = "lenient_text")]
    pub confidence: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub reason: Option<String>,
}

// =============================================================================
// Lenient value coercion
// =============================================================================

/// Scores may arrive as JSON numbers or numeric strings; anything else
/// counts as missing.
fn lenient_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Positions (lead index, pair winner) must be integral JSON numbers —
/// a string "2" does not name position 2.
fn lenient_index<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        _ => None,
    })
}

/// Text fields that arrive as something other than a string (a numeric
/// confidence, say) count as absent rather than poisoning the entry.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        _ => None,
    })
}

// =============================================================================
// Response parsing
// =============================================================================

/// Extract the first fenced block if present, else the trimmed response.
pub fn strip_code_fences(response: &str) -> &str {
    let trimmed = response.trim();
    if let Some(start) = trimmed.find("```") {
        let rest = &trimmed[start + 3..];
        let body = rest.strip_prefix("json").unwrap_or(rest);
        if let Some(end) = body.find("```") {
            return body[..end].trim();
        }
    }
    trimmed
}

/// The first JSON array among the value itself or its object values.
fn find_entry_array(value: &Value) -> Option<&Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(map) => map.values().find_map(|v| match v {
            Value::Array(items) => Some(items),
            _ => None,
        }),
        _ => None,
    }
}

/// Parse the criteria response: a JSON array of entries, possibly fenced,
/// possibly wrapped in an object under an arbitrary key. Entries that are
/// not objects are skipped, not errors.
pub fn parse_criteria_response(raw: &str) -> Result<Vec<CriteriaEntry>, ParseFailure> {
    let value: Value = serde_json::from_str(strip_code_fences(raw))?;
    let entries = find_entry_array(&value).ok_or(ParseFailure::UnexpectedShape)?;
    Ok(entries
        .iter()
        .filter_map(|v| serde_json::from_value(v.clone()).ok())
        .collect())
}

/// Parse a pairwise comparison response under the same tolerance rules.
pub fn parse_pairwise_response(raw: &str) -> Result<Vec<PairwiseDecision>, ParseFailure> {
    let value: Value = serde_json::from_str(strip_code_fences(raw))?;
    let entries = find_entry_array(&value).ok_or(ParseFailure::UnexpectedShape)?;
    Ok(entries
        .iter()
        .filter_map(|v| serde_json::from_value(v.clone()).ok())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n[]\n```"), "[]");
        assert_eq!(strip_code_fences("```\n[]\n```"), "[]");
        assert_eq!(strip_code_fences("[]"), "[]");
        assert_eq!(
            strip_code_fences("Here are my scores:\n```json\n[1, 2]\n```\nDone."),
            "[1, 2]"
        );
    }

    #[test]
    fn test_parse_bare_array() {
        let raw = r#"[{"index": 1, "impact": 8, "proximity": 7}]"#;
        let entries = parse_criteria_response(raw).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].index, Some(1));
        assert_eq!(entries[0].impact, Some(8.0));
        assert_eq!(entries[0].novelty, None);
    }

    #[test]
    fn test_parse_object_wrapped_array() {
        let raw = r#"{"evaluations": [{"index": 2, "hook": 9}]}"#;
        let entries = parse_criteria_response(raw).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].index, Some(2));
        assert_eq!(entries[0].hook, Some(9.0));
    }

    #[test]
    fn test_parse_numeric_string_scores() {
        let raw = r#"[{"index": 1, "impact": "8.5"}]"#;
        let entries = parse_criteria_response(raw).unwrap();
        assert_eq!(entries[0].impact, Some(8.5));
    }

    #[test]
    fn test_string_index_does_not_match() {
        let raw = r#"[{"index": "1", "impact": 8}]"#;
        let entries = parse_criteria_response(raw).unwrap();
        assert_eq!(entries[0].index, None);
    }

    #[test]
    fn test_garbage_entries_skipped() {
        let raw = r#"[{"index": 1, "impact": 8}, "not an entry", 42]"#;
        let entries = parse_criteria_response(raw).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_garbage_score_counts_as_missing() {
        let raw = r#"[{"index": 1, "impact": {"oops": true}}]"#;
        let entries = parse_criteria_response(raw).unwrap();
        assert_eq!(entries[0].impact, None);
    }

    #[test]
    fn test_non_json_is_invalid() {
        assert!(matches!(
            parse_criteria_response("the leads all look great"),
            Err(ParseFailure::InvalidJson(_))
        ));
    }

    #[test]
    fn test_non_array_shape_rejected() {
        assert!(matches!(
            parse_criteria_response(r#"{"status": "ok"}"#),
            Err(ParseFailure::UnexpectedShape)
        ));
        assert!(matches!(
            parse_criteria_response("\"just a string\""),
            Err(ParseFailure::UnexpectedShape)
        ));
    }

    #[test]
    fn test_parse_pairwise_decisions() {
        let raw = r#"```json
[{"pair": "1vs2", "winner": 1, "confidence": "high", "reason": "broader impact"},
 {"pair": "1vs3", "winner": 3}]
```"#;
        let decisions = parse_pairwise_response(raw).unwrap();
        assert_eq!(decisions.len(), 2);
        assert_eq!(decisions[0].pair.as_deref(), Some("1vs2"));
        assert_eq!(decisions[0].winner, Some(1));
        assert_eq!(decisions[1].winner, Some(3));
    }

    #[test]
    fn test_integral_float_winner_accepted() {
        let raw = r#"[{"pair": "1vs2", "winner": 2.0}]"#;
        let decisions = parse_pairwise_response(raw).unwrap();
        assert_eq!(decisions[0].winner, Some(2));
    }

    #[test]
    fn test_numeric_confidence_does_not_poison_decision() {
        let raw = r#"[{"pair": "1vs2", "winner": 1, "confidence": 0.9}]"#;
        let decisions = parse_pairwise_response(raw).unwrap();
        assert_eq!(decisions[0].pair.as_deref(), Some("1vs2"));
        assert_eq!(decisions[0].winner, Some(1));
        assert_eq!(decisions[0].confidence, None);
    }
}
