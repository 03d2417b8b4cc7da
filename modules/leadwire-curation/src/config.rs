use leadwire_common::LeadwireError;

/// Blend weight for the criteria-based score in the final rank.
pub const WEIGHTED_SCORE_WEIGHT: f64 = 0.7;
/// Blend weight for normalized pairwise performance in the final rank.
pub const PAIRWISE_SCORE_WEIGHT: f64 = 0.3;

/// Score assigned to a criterion the judgment response left out.
pub const DEFAULT_CRITERION_SCORE: f64 = 7.0;

// =============================================================================
// Criteria
// =============================================================================

/// The seven newsworthiness criteria every lead is scored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Criterion {
    Impact,
    Proximity,
    Prominence,
    Relevance,
    Hook,
    Novelty,
    Conflict,
}

impl Criterion {
    pub const ALL: [Criterion; 7] = [
        Criterion::Impact,
        Criterion::Proximity,
        Criterion::Prominence,
        Criterion::Relevance,
        Criterion::Hook,
        Criterion::Novelty,
        Criterion::Conflict,
    ];

    /// Wire key used in prompts and judgment responses.
    pub fn key(self) -> &'static str {
        match self {
            Criterion::Impact => "impact",
            Criterion::Proximity => "proximity",
            Criterion::Prominence => "prominence",
            Criterion::Relevance => "relevance",
            Criterion::Hook => "hook",
            Criterion::Novelty => "novelty",
            Criterion::Conflict => "conflict",
        }
    }
}

/// Per-criterion weights. Must sum to 1.0 — validated when a
/// [`CurationConfig`] is constructed, not at scoring time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriteriaWeights {
    pub impact: f64,
    pub proximity: f64,
    pub prominence: f64,
    pub relevance: f64,
    pub hook: f64,
    pub novelty: f64,
    pub conflict: f64,
}

impl CriteriaWeights {
    pub fn get(&self, criterion: Criterion) -> f64 {
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

    pub fn sum(&self) -> f64 {
        Criterion::ALL.iter().map(|&c| self.get(c)).sum()
    }
}

impl Default for CriteriaWeights {
    fn default() -> Self {
        Self {
            impact: 0.20,
            proximity: 0.15,
            prominence: 0.15,
            relevance: 0.15,
            hook: 0.15,
            novelty: 0.10,
            conflict: 0.10,
        }
    }
}

/// Per-criterion scores on the 1-10 judgment scale.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CriteriaScores {
    pub impact: f64,
    pub proximity: f64,
    pub prominence: f64,
    pub relevance: f64,
    pub hook: f64,
    pub novelty: f64,
    pub conflict: f64,
}

impl CriteriaScores {
    /// The same score on every criterion (whole-response fallback).
    pub fn uniform(score: f64) -> Self {
        Self {
            impact: score,
            proximity: score,
            prominence: score,
            relevance: score,
            hook: score,
            novelty: score,
            conflict: score,
        }
    }

    pub fn get(&self, criterion: Criterion) -> f64 {
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

    pub fn set(&mut self, criterion: Criterion, score: f64) {
        match criterion {
            Criterion::Impact => self.impact = score,
            Criterion::Proximity => self.proximity = score,
            Criterion::Prominence => self.prominence = score,
            Criterion::Relevance => self.relevance = score,
            Criterion::Hook => self.hook = score,
            Criterion::Novelty => self.novelty = score,
            Criterion::Conflict => self.conflict = score,
        }
    }

    /// Weighted sum over all criteria. Full precision — any 2-decimal
    /// rounding is for display only.
    pub fn weighted(&self, weights: &CriteriaWeights) -> f64 {
        Criterion::ALL
            .iter()
            .map(|&c| self.get(c) * weights.get(c))
            .sum()
    }
}

// =============================================================================
// Engine configuration
// =============================================================================

/// Immutable engine configuration, injected at construction.
#[derive(Debug, Clone)]
pub struct CurationConfig {
    pub weights: CriteriaWeights,
    /// Minimum weighted score for a lead to qualify.
    pub min_weighted_score: f64,
    /// Maximum number of leads to select.
    pub max_leads_to_select: usize,
    /// Minimum number of leads to select.
    pub min_leads_to_select: usize,
    /// Weighted-score distance within which leads are considered too close
    /// to order without a pairwise tournament.
    pub score_similarity_threshold: f64,
    /// Minimum group size worth a pairwise comparison call.
    pub min_group_size_for_pairwise: usize,
}

impl CurationConfig {
    /// Build a config with custom weights, enforcing the sum invariant at
    /// construction rather than at use.
    pub fn new(weights: CriteriaWeights) -> Result<Self, LeadwireError> {
        let sum = weights.sum();
        if (sum - 1.0).abs() > 1e-9 {
            return Err(LeadwireError::Validation(format!(
                "criteria weights must sum to 1.0, got {sum}"
            )));
        }
        Ok(Self {
            weights,
            ..Self::default()
        })
    }
}

impl Default for CurationConfig {
    fn default() -> Self {
        Self {
            weights: CriteriaWeights::default(),
            min_weighted_score: 6.0,
            max_leads_to_select: 5,
            min_leads_to_select: 3,
            score_similarity_threshold: 0.5,
            min_group_size_for_pairwise: 2,
        }
    }
}
