// =============================================================================
// Weighted Scorer — fixed-weight aggregation of normalised terms
// =============================================================================
//
// base = clamp(global + local, -1, 1)
//
// where `global` and `local` are the weighted sums of the terms in each
// group. An optional hybrid blend reweights the two groups before the clamp.

use serde::{Deserialize, Serialize};

use super::terms::ScoreTerms;

/// The model's scoring terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Term {
    Momentum,
    Roc,
    Volume,
    Usd,
    Rate,
    Inr,
    Nifty,
}

/// Global terms come from world markets; local terms from the Indian side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TermGroup {
    Global,
    Local,
}

impl Term {
    pub const ALL: [Term; 7] = [
        Self::Momentum,
        Self::Roc,
        Self::Volume,
        Self::Usd,
        Self::Rate,
        Self::Inr,
        Self::Nifty,
    ];

    pub fn group(self) -> TermGroup {
        match self {
            Self::Inr | Self::Nifty => TermGroup::Local,
            _ => TermGroup::Global,
        }
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Momentum => write!(f, "momentum"),
            Self::Roc => write!(f, "roc"),
            Self::Volume => write!(f, "volume"),
            Self::Usd => write!(f, "usd"),
            Self::Rate => write!(f, "rate"),
            Self::Inr => write!(f, "inr"),
            Self::Nifty => write!(f, "nifty"),
        }
    }
}

fn default_w_momentum() -> f64 {
    0.30
}

fn default_w_roc() -> f64 {
    0.20
}

fn default_w_volume() -> f64 {
    0.10
}

fn default_w_usd() -> f64 {
    0.15
}

fn default_w_rate() -> f64 {
    0.10
}

fn default_w_inr() -> f64 {
    0.10
}

fn default_w_nifty() -> f64 {
    0.05
}

/// Per-term weights. Defaults sum to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermWeights {
    #[serde(default = "default_w_momentum")]
    pub momentum: f64,
    #[serde(default = "default_w_roc")]
    pub roc: f64,
    #[serde(default = "default_w_volume")]
    pub volume: f64,
    #[serde(default = "default_w_usd")]
    pub usd: f64,
    #[serde(default = "default_w_rate")]
    pub rate: f64,
    #[serde(default = "default_w_inr")]
    pub inr: f64,
    #[serde(default = "default_w_nifty")]
    pub nifty: f64,
}

impl Default for TermWeights {
    fn default() -> Self {
        Self {
            momentum: default_w_momentum(),
            roc: default_w_roc(),
            volume: default_w_volume(),
            usd: default_w_usd(),
            rate: default_w_rate(),
            inr: default_w_inr(),
            nifty: default_w_nifty(),
        }
    }
}

impl TermWeights {
    pub fn get(&self, term: Term) -> f64 {
        match term {
            Term::Momentum => self.momentum,
            Term::Roc => self.roc,
            Term::Volume => self.volume,
            Term::Usd => self.usd,
            Term::Rate => self.rate,
            Term::Inr => self.inr,
            Term::Nifty => self.nifty,
        }
    }

    pub fn total(&self) -> f64 {
        Term::ALL.iter().map(|&t| self.get(t)).sum()
    }
}

/// Secondary weighted average of the global and local groups.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HybridBlend {
    pub global: f64,
    pub local: f64,
}

/// The contribution of a single term to the base score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermContribution {
    pub term: Term,
    pub weight: f64,
    pub value: f64,
    pub contribution: f64,
}

/// Result of the weighted composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub base_score: f64,
    pub global_component: f64,
    pub local_component: f64,
    pub contributions: Vec<TermContribution>,
}

/// Fixed-weight linear scorer.
#[derive(Debug, Clone)]
pub struct WeightedScorer {
    weights: TermWeights,
    hybrid_blend: Option<HybridBlend>,
    renormalize_missing: bool,
}

impl WeightedScorer {
    pub fn new(
        weights: TermWeights,
        hybrid_blend: Option<HybridBlend>,
        renormalize_missing: bool,
    ) -> Self {
        Self {
            weights,
            hybrid_blend,
            renormalize_missing,
        }
    }

    /// Weight actually applied to `term`, given the terms declared missing.
    fn effective_weight(&self, term: Term, missing: &[Term]) -> f64 {
        if missing.contains(&term) {
            return if self.renormalize_missing {
                0.0
            } else {
                self.weights.get(term)
            };
        }
        if !self.renormalize_missing || missing.is_empty() {
            return self.weights.get(term);
        }
        let total = self.weights.total();
        let present: f64 = Term::ALL
            .iter()
            .filter(|t| !missing.contains(t))
            .map(|&t| self.weights.get(t))
            .sum();
        if present <= 0.0 {
            return self.weights.get(term);
        }
        self.weights.get(term) * total / present
    }

    /// Combine finite, unit-range terms into a clamped base score.
    pub fn score(&self, terms: &ScoreTerms, missing: &[Term]) -> ScoringResult {
        let mut contributions = Vec::with_capacity(Term::ALL.len());
        let mut global_component = 0.0;
        let mut local_component = 0.0;

        for term in Term::ALL {
            let weight = self.effective_weight(term, missing);
            let value = terms.get(term);
            let contribution = weight * value;

            match term.group() {
                TermGroup::Global => global_component += contribution,
                TermGroup::Local => local_component += contribution,
            }

            contributions.push(TermContribution {
                term,
                weight,
                value,
                contribution,
            });
        }

        let combined = match self.hybrid_blend {
            Some(blend) => blend.global * global_component + blend.local * local_component,
            None => global_component + local_component,
        };
        let base_score = if combined.is_finite() {
            combined.clamp(-1.0, 1.0)
        } else {
            0.0
        };

        ScoringResult {
            base_score,
            global_component,
            local_component,
            contributions,
        }
    }
}

impl Default for WeightedScorer {
    fn default() -> Self {
        Self::new(TermWeights::default(), None, false)
    }
}
