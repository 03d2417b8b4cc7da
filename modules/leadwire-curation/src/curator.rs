use std::cmp::Ordering;

use tracing::{info, warn};

use leadwire_common::Lead;

use crate::compare;
use crate::config::CurationConfig;
use crate::evaluate;
use crate::judge::Judge;
use crate::rank;

/// Lead curation engine: multi-criteria scoring refined by pairwise
/// tournaments, with bounded selection and graceful degradation.
pub struct LeadCurator<J: Judge> {
    judge: J,
    config: CurationConfig,
}

impl<J: Judge> LeadCurator<J> {
    pub fn new(judge: J) -> Self {
        Self::with_config(judge, CurationConfig::default())
    }

    pub fn with_config(judge: J, config: CurationConfig) -> Self {
        Self { judge, config }
    }

    pub fn config(&self) -> &CurationConfig {
        &self.config
    }

    /// Select the most newsworthy leads from the batch.
    ///
    /// Empty input returns empty with no judgment calls. Otherwise the
    /// result holds between `min_leads_to_select` and
    /// `max_leads_to_select` leads (bounded by the input size), ordered
    /// best-first. Judgment failures never abort the run; they degrade to
    /// default scores or weighted-score ordering.
    pub async fn curate(&self, leads: &[Lead]) -> Vec<Lead> {
        if leads.is_empty() {
            return Vec::new();
        }

        info!(leads = leads.len(), "Starting curation");

        // One batched judgment call scores every lead.
        let evaluations =
            evaluate::evaluate_all_criteria(&self.judge, &self.config, leads).await;

        // Threshold gate. Partition keeps first-seen order on both sides.
        let (mut qualified, below): (Vec<_>, Vec<_>) = evaluations
            .into_iter()
            .partition(|e| e.weighted_score >= self.config.min_weighted_score);

        info!(
            passed = qualified.len(),
            total = leads.len(),
            threshold = self.config.min_weighted_score,
            "Threshold analysis"
        );
        if !below.is_empty() {
            let low = below
                .iter()
                .map(|e| e.weighted_score)
                .fold(f64::INFINITY, f64::min);
            let high = below
                .iter()
                .map(|e| e.weighted_score)
                .fold(f64::NEG_INFINITY, f64::max);
            info!(
                count = below.len(),
                scores = format!("{low:.1}-{high:.1}"),
                "Leads below threshold"
            );
        }

        if qualified.is_empty() {
            // Availability over precision: never return an empty batch
            // just because scores ran low.
            warn!(
                threshold = self.config.min_weighted_score,
                take = self.config.min_leads_to_select,
                "FALLBACK: no leads passed minimum threshold, selecting top leads by weighted score"
            );
            let mut all = below;
            all.sort_by(|a, b| {
                b.weighted_score
                    .partial_cmp(&a.weighted_score)
                    .unwrap_or(Ordering::Equal)
            });
            all.truncate(self.config.min_leads_to_select);
            return all.into_iter().map(|e| e.lead.clone()).collect();
        }

        // Weighted score alone orders a field that fits the cap; only a
        // larger field needs pairwise disambiguation.
        if qualified.len() > self.config.max_leads_to_select {
            compare::perform_pairwise_comparisons(&self.judge, &self.config, &mut qualified)
                .await;
        }

        let ranked = rank::compute_final_ranking(qualified);
        let selected = rank::select_top(ranked, &self.config);

        info!(selected = selected.len(), "Curation complete");
        for (i, evaluation) in selected.iter().enumerate() {
            info!(
                rank = i + 1,
                score = format!("{:.1}", evaluation.weighted_score),
                lead = headline(&evaluation.lead.text),
                "Selected lead"
            );
        }

        selected.into_iter().map(|e| e.lead.clone()).collect()
    }
}

/// First few words of a lead for log lines.
fn headline(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().take(5).collect();
    format!("{}...", words.join(" "))
}
