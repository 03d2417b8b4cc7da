//! Final ranking and selection. Pure functions over the qualified
//! evaluation set — no judgment calls from here on.

use std::cmp::Ordering;

use tracing::debug;

use crate::config::{CurationConfig, PAIRWISE_SCORE_WEIGHT, WEIGHTED_SCORE_WEIGHT};
use crate::evaluate::LeadEvaluation;

/// Blend the weighted score with normalized pairwise performance and sort
/// descending. Pairwise wins are normalized to a 0-10 scale against the
/// best performer; with no comparisons run anywhere, the blend reduces to
/// weighted-score order. The sort is stable, so ties keep first-seen
/// order — rerunning on identical input yields identical ordering.
pub fn compute_final_ranking(mut evaluations: Vec<LeadEvaluation<'_>>) -> Vec<LeadEvaluation<'_>> {
    let max_wins = evaluations
        .iter()
        .map(|e| e.pairwise_wins)
        .max()
        .unwrap_or(0);

    for evaluation in &mut evaluations {
        let pairwise_score = if max_wins > 0 {
            evaluation.pairwise_wins as f64 / max_wins as f64 * 10.0
        } else {
            0.0
        };
        evaluation.final_rank =
            WEIGHTED_SCORE_WEIGHT * evaluation.weighted_score + PAIRWISE_SCORE_WEIGHT * pairwise_score;

        debug!(
            weighted = format!("{:.2}", evaluation.weighted_score),
            pairwise = format!("{:.2}", pairwise_score),
            final_rank = format!("{:.2}", evaluation.final_rank),
            "Lead final ranking"
        );
    }

    evaluations.sort_by(|a, b| {
        b.final_rank
            .partial_cmp(&a.final_rank)
            .unwrap_or(Ordering::Equal)
    });

    evaluations
}

/// Top `max_leads_to_select` of the ranked set, widened to
/// `min_leads_to_select` when the cut comes up short and enough ranked
/// evaluations exist.
pub fn select_top<'a>(
    ranked: Vec<LeadEvaluation<'a>>,
    config: &CurationConfig,
) -> Vec<LeadEvaluation<'a>> {
    let mut cut = config.max_leads_to_select.min(ranked.len());
    if cut < config.min_leads_to_select && ranked.len() >= config.min_leads_to_select {
        cut = config.min_leads_to_select;
    }

    let mut selected = ranked;
    selected.truncate(cut);
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CriteriaScores, CriteriaWeights};
    use leadwire_common::Lead;

    fn evaluation<'a>(lead: &'a Lead, weighted: f64, wins: u32) -> LeadEvaluation<'a> {
        let mut e = LeadEvaluation::new(
            lead,
            CriteriaScores::uniform(weighted),
            &CriteriaWeights::default(),
        );
        e.pairwise_wins = wins;
        e
    }

    #[test]
    fn test_blended_ranking() {
        let leads: Vec<Lead> = ["lead a", "lead b", "lead c"]
            .iter()
            .map(|t| Lead::new(*t))
            .collect();
        let evaluations = vec![
            evaluation(&leads[0], 8.0, 2),
            evaluation(&leads[1], 7.5, 1),
            evaluation(&leads[2], 7.8, 0),
        ];

        let ranked = compute_final_ranking(evaluations);

        // a: 0.7*8.0 + 0.3*10 = 8.6
        // b: 0.7*7.5 + 0.3*5  = 6.75
        // c: 0.7*7.8 + 0.3*0  = 5.46
        assert_eq!(ranked[0].lead.text, "lead a");
        assert_eq!(ranked[1].lead.text, "lead b");
        assert_eq!(ranked[2].lead.text, "lead c");
        assert!((ranked[0].final_rank - 8.6).abs() < 1e-9);
        assert!((ranked[1].final_rank - 6.75).abs() < 1e-9);
        assert!((ranked[2].final_rank - 5.46).abs() < 1e-9);
    }

    #[test]
    fn test_no_wins_reduces_to_weighted_order() {
        let leads: Vec<Lead> = (0..3).map(|i| Lead::new(format!("lead {i}"))).collect();
        let evaluations = vec![
            evaluation(&leads[0], 6.5, 0),
            evaluation(&leads[1], 9.0, 0),
            evaluation(&leads[2], 7.5, 0),
        ];

        let ranked = compute_final_ranking(evaluations);

        assert_eq!(ranked[0].lead.text, "lead 1");
        assert_eq!(ranked[1].lead.text, "lead 2");
        assert_eq!(ranked[2].lead.text, "lead 0");
        // With max_wins == 0 the pairwise term is zero, not NaN.
        assert!((ranked[0].final_rank - 0.7 * 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let leads: Vec<Lead> = (0..4).map(|i| Lead::new(format!("lead {i}"))).collect();
        let evaluations: Vec<_> = leads.iter().map(|l| evaluation(l, 7.0, 0)).collect();

        let ranked = compute_final_ranking(evaluations);
        let order: Vec<&str> = ranked.iter().map(|e| e.lead.text.as_str()).collect();
        assert_eq!(order, vec!["lead 0", "lead 1", "lead 2", "lead 3"]);
    }

    #[test]
    fn test_ranking_is_deterministic() {
        let leads: Vec<Lead> = (0..5).map(|i| Lead::new(format!("lead {i}"))).collect();
        let evaluations: Vec<_> = leads
            .iter()
            .zip([7.0, 7.0, 8.0, 7.0, 8.0])
            .map(|(l, s)| evaluation(l, s, 0))
            .collect();

        let first: Vec<String> = compute_final_ranking(evaluations.clone())
            .iter()
            .map(|e| e.lead.text.clone())
            .collect();
        let second: Vec<String> = compute_final_ranking(evaluations)
            .iter()
            .map(|e| e.lead.text.clone())
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_select_top_caps_at_max() {
        let leads: Vec<Lead> = (0..8).map(|i| Lead::new(format!("lead {i}"))).collect();
        let ranked: Vec<_> = leads
            .iter()
            .enumerate()
            .map(|(i, l)| evaluation(l, 10.0 - i as f64, 0))
            .collect();

        let config = CurationConfig::default();
        let selected = select_top(ranked, &config);
        assert_eq!(selected.len(), config.max_leads_to_select);
        assert_eq!(selected[0].lead.text, "lead 0");
    }

    #[test]
    fn test_select_top_widens_to_min() {
        let leads: Vec<Lead> = (0..3).map(|i| Lead::new(format!("lead {i}"))).collect();
        let ranked: Vec<_> = leads
            .iter()
            .map(|l| evaluation(l, 8.0, 0))
            .collect();

        let config = CurationConfig {
            max_leads_to_select: 1,
            min_leads_to_select: 2,
            ..CurationConfig::default()
        };
        let selected = select_top(ranked, &config);
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn test_select_top_short_input() {
        let leads: Vec<Lead> = (0..2).map(|i| Lead::new(format!("lead {i}"))).collect();
        let ranked: Vec<_> = leads.iter().map(|l| evaluation(l, 8.0, 0)).collect();

        let selected = select_top(ranked, &CurationConfig::default());
        assert_eq!(selected.len(), 2);
    }
}
