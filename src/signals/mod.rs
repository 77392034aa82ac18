// =============================================================================
// Signals Module
// =============================================================================
//
// Scoring pipeline for the copper outlook:
// - Normalised terms from indicators and macro series
// - Fixed-weight composition into a clamped base score
// - Horizon decay over four days
// - Bias classification and confidence

pub mod bias;
pub mod signal_decay;
pub mod terms;
pub mod weighted_score;

pub use bias::{confidence, BiasLabel};
pub use signal_decay::{project, ScoreVector};
pub use terms::{IndicatorSet, ScoreTerms};
pub use weighted_score::{Term, TermContribution, WeightedScorer};
