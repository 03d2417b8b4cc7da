//! Multi-criteria evaluation: one batched judgment call scores every lead,
//! and a pure reconciliation step maps response entries back onto leads
//! under the documented default-fill policy.

use tracing::{debug, warn};

use ai_client::StructuredOutput;
use leadwire_common::Lead;

use crate::config::{
    CriteriaScores, CriteriaWeights, Criterion, CurationConfig, DEFAULT_CRITERION_SCORE,
};
use crate::judge::Judge;
use crate::prompts;
use crate::response::{self, CriteriaEntry, ParseFailure, ScoringResponse};

/// Scoring state for one lead during a single curation run. Borrows the
/// lead — only the selected `Lead` values outlive the run.
#[derive(Debug, Clone)]
pub struct LeadEvaluation<'a> {
    pub lead: &'a Lead,
    pub criteria_scores: CriteriaScores,
    pub weighted_score: f64,
    pub pairwise_wins: u32,
    pub final_rank: f64,
}

impl<'a> LeadEvaluation<'a> {
    pub fn new(lead: &'a Lead, criteria_scores: CriteriaScores, weights: &CriteriaWeights) -> Self {
        let weighted_score = criteria_scores.weighted(weights);
        Self {
            lead,
            criteria_scores,
            weighted_score,
            pairwise_wins: 0,
            final_rank: 0.0,
        }
    }
}

/// Score every lead with one batched judgment call. Transport and parse
/// failures both degrade to the uniform default fill — this stage never
/// aborts the run.
pub async fn evaluate_all_criteria<'a>(
    judge: &dyn Judge,
    config: &CurationConfig,
    leads: &'a [Lead],
) -> Vec<LeadEvaluation<'a>> {
    if leads.is_empty() {
        return Vec::new();
    }

    let prompt = prompts::criteria_evaluation(leads);
    let schema = ScoringResponse::response_schema();

    let parsed = match judge.submit(&prompt, Some(schema)).await {
        Ok(raw) => response::parse_criteria_response(&raw),
        Err(e) => Err(ParseFailure::Collaborator(e.to_string())),
    };

    let entries = match parsed {
        Ok(entries) => entries,
        Err(e) => {
            warn!(
                error = %e,
                "FALLBACK: using default scores ({DEFAULT_CRITERION_SCORE}) for all criteria"
            );
            return leads
                .iter()
                .map(|lead| {
                    LeadEvaluation::new(
                        lead,
                        CriteriaScores::uniform(DEFAULT_CRITERION_SCORE),
                        &config.weights,
                    )
                })
                .collect();
        }
    };

    reconcile(leads, &entries, &config.weights)
}

/// Match parsed entries to leads by 1-based index. A lead with no matching
/// entry is dropped from the evaluation set; a present entry with missing
/// criterion keys gets the default score per missing key.
pub fn reconcile<'a>(
    leads: &'a [Lead],
    entries: &[CriteriaEntry],
    weights: &CriteriaWeights,
) -> Vec<LeadEvaluation<'a>> {
    let mut evaluations = Vec::with_capacity(leads.len());

    for (i, lead) in leads.iter().enumerate() {
        let expected = (i + 1) as i64;
        let Some(entry) = entries.iter().find(|e| e.index == Some(expected)) else {
            warn!(lead = i + 1, "No evaluation entry for lead, dropping it");
            continue;
        };

        let mut scores = CriteriaScores::default();
        let mut missing: Vec<&str> = Vec::new();
        for criterion in Criterion::ALL {
            match entry.score(criterion) {
                Some(score) => scores.set(criterion, score),
                None => {
                    scores.set(criterion, DEFAULT_CRITERION_SCORE);
                    missing.push(criterion.key());
                }
            }
        }
        if !missing.is_empty() {
            warn!(
                lead = i + 1,
                missing = ?missing,
                "FALLBACK: missing criteria scores, using default ({DEFAULT_CRITERION_SCORE})"
            );
        }

        let evaluation = LeadEvaluation::new(lead, scores, weights);
        debug!(
            lead = i + 1,
            weighted = format!("{:.2}", evaluation.weighted_score),
            reasoning = entry.brief_reasoning.as_deref().unwrap_or(""),
            "Lead scored"
        );
        evaluations.push(evaluation);
    }

    evaluations
}
