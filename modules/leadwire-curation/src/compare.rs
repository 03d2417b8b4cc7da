//! Pairwise disambiguation: cluster qualified leads whose weighted scores
//! are too close to order confidently, then run one comparison tournament
//! per cluster and tally wins.

use std::cmp::Ordering;

use futures::future;
use tracing::{debug, warn};

use crate::config::CurationConfig;
use crate::evaluate::LeadEvaluation;
use crate::judge::Judge;
use crate::prompts;
use crate::response::{self, PairwiseDecision, ParseFailure};

/// Cluster evaluations whose weighted scores sit within `threshold` of a
/// group anchor. Anchors are taken in descending-score order and absorb
/// every later ungrouped evaluation in range. Returns groups of indices
/// into `evaluations`; singletons carry no disambiguation information and
/// are dropped.
pub fn group_by_score_similarity(
    evaluations: &[LeadEvaluation<'_>],
    threshold: f64,
) -> Vec<Vec<usize>> {
    let mut order: Vec<usize> = (0..evaluations.len()).collect();
    order.sort_by(|&a, &b| {
        evaluations[b]
            .weighted_score
            .partial_cmp(&evaluations[a].weighted_score)
            .unwrap_or(Ordering::Equal)
    });

    let mut groups = Vec::new();
    let mut used = vec![false; evaluations.len()];

    for (pos, &anchor) in order.iter().enumerate() {
        if used[anchor] {
            continue;
        }
        used[anchor] = true;

        let mut group = vec![anchor];
        for &candidate in &order[pos + 1..] {
            if used[candidate] {
                continue;
            }
            let diff =
                (evaluations[anchor].weighted_score - evaluations[candidate].weighted_score).abs();
            if diff <= threshold {
                group.push(candidate);
                used[candidate] = true;
            }
        }

        if group.len() > 1 {
            debug!(
                leads = group.len(),
                scores = ?group
                    .iter()
                    .map(|&i| format!("{:.2}", evaluations[i].weighted_score))
                    .collect::<Vec<_>>(),
                "Created score group"
            );
            groups.push(group);
        }
    }

    groups
}

/// Run pairwise tournaments over all similarity groups, updating win
/// tallies in place. One judgment call per group; groups share no
/// evaluations, so their calls run concurrently and the tallies are
/// applied once all responses are in. Parse or transport failure leaves a
/// group's tallies unchanged — that group falls back to weighted-score
/// ordering.
pub async fn perform_pairwise_comparisons(
    judge: &dyn Judge,
    config: &CurationConfig,
    evaluations: &mut [LeadEvaluation<'_>],
) {
    let groups: Vec<Vec<usize>> =
        group_by_score_similarity(evaluations, config.score_similarity_threshold)
            .into_iter()
            .filter(|g| g.len() >= config.min_group_size_for_pairwise)
            .collect();

    if groups.is_empty() {
        return;
    }

    let group_prompts: Vec<String> = groups
        .iter()
        .map(|group| {
            let texts: Vec<&str> = group
                .iter()
                .map(|&i| evaluations[i].lead.text.as_str())
                .collect();
            prompts::pairwise_comparison(&texts)
        })
        .collect();

    let responses =
        future::join_all(group_prompts.iter().map(|prompt| judge.submit(prompt, None))).await;

    for (group, response_result) in groups.iter().zip(responses) {
        let parsed = match response_result {
            Ok(raw) => response::parse_pairwise_response(&raw),
            Err(e) => Err(ParseFailure::Collaborator(e.to_string())),
        };
        match parsed {
            Ok(decisions) => apply_decisions(evaluations, group, &decisions),
            Err(e) => warn!(
                error = %e,
                "FALLBACK: skipping pairwise comparisons for group, using weighted scores only"
            ),
        }
    }
}

/// Credit wins for decisions that name a known pair and a winner equal to
/// one of the pair's two 1-based positions; anything else is ignored.
pub fn apply_decisions(
    evaluations: &mut [LeadEvaluation<'_>],
    group: &[usize],
    decisions: &[PairwiseDecision],
) {
    for decision in decisions {
        let Some(pair) = decision.pair.as_deref() else {
            continue;
        };
        let Some((i, j)) = resolve_pair(pair, group.len()) else {
            debug!(pair, "Decision for unknown pair, discarding");
            continue;
        };

        match decision.winner {
            Some(w) if w == (i + 1) as i64 => evaluations[group[i]].pairwise_wins += 1,
            Some(w) if w == (j + 1) as i64 => evaluations[group[j]].pairwise_wins += 1,
            _ => continue,
        }

        debug!(
            pair,
            winner = ?decision.winner,
            reason = decision.reason.as_deref().unwrap_or(""),
            "Pairwise decision"
        );
    }
}

/// Parse an "{i}vs{j}" key into 0-based group positions. Only keys that
/// could have been generated for this group resolve: 1-based, in bounds,
/// first position strictly before the second.
fn resolve_pair(pair: &str, group_len: usize) -> Option<(usize, usize)> {
    let (a, b) = pair.split_once("vs")?;
    let i: usize = a.trim().parse().ok()?;
    let j: usize = b.trim().parse().ok()?;
    if i == 0 || j == 0 || i >= j || j > group_len {
        return None;
    }
    Some((i - 1, j - 1))
}
