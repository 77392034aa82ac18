// =============================================================================
// Scoring Engine — price series in, four-day bias outlook out
// =============================================================================
//
// Pure and synchronous. The only fatal outcome is a copper series shorter
// than the effective minimum; everything else degrades a single term to
// neutral and is reported in `Outlook::degradations`.
//
// Pipeline:
//   1. sufficiency check on the primary series
//   2. indicator set + raw terms (optional series gated by their minimum)
//   3. sanitize (non-finite → 0.0)
//   4. weighted composition → base score in [-1, 1]
//   5. horizon decay → ScoreVector
//   6. classification per horizon
// =============================================================================

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{Degradation, ScoreError};
use crate::runtime_config::ModelConfig;
use crate::signals::terms::{
    currency_term, local_currency_term, local_demand_term, rate_term,
};
use crate::signals::{
    confidence, project, BiasLabel, IndicatorSet, ScoreTerms, ScoreVector, Term,
    TermContribution, WeightedScorer,
};
use crate::types::{Horizon, Instrument, PriceSeries};

/// Series handed to the engine. Optional inputs are declared by presence.
#[derive(Debug, Clone)]
pub struct MarketInputs {
    pub copper: PriceSeries,
    pub dollar_index: Option<PriceSeries>,
    pub us10y: Option<PriceSeries>,
    pub usd_inr: Option<PriceSeries>,
    pub nifty: Option<PriceSeries>,
}

impl MarketInputs {
    /// Copper only; every optional term neutral.
    pub fn copper_only(copper: PriceSeries) -> Self {
        Self {
            copper,
            dollar_index: None,
            us10y: None,
            usd_inr: None,
            nifty: None,
        }
    }

    fn optional(&self, instrument: Instrument) -> Option<&PriceSeries> {
        match instrument {
            Instrument::Copper => None,
            Instrument::DollarIndex => self.dollar_index.as_ref(),
            Instrument::Us10y => self.us10y.as_ref(),
            Instrument::UsdInr => self.usd_inr.as_ref(),
            Instrument::Nifty => self.nifty.as_ref(),
        }
    }
}

/// One horizon slot of the outlook.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HorizonCall {
    pub horizon: Horizon,
    pub label: &'static str,
    pub score: f64,
    pub bias: BiasLabel,
    pub confidence: u8,
}

/// Full engine output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outlook {
    pub base_score: f64,
    pub scores: ScoreVector,
    pub calls: [HorizonCall; 4],
    pub indicators: IndicatorSet,
    pub terms: ScoreTerms,
    pub global_component: f64,
    pub local_component: f64,
    pub contributions: Vec<TermContribution>,
    pub degradations: Vec<Degradation>,
}

/// Optional instruments and the term each one drives.
const OPTIONAL_TERMS: [(Instrument, Term); 4] = [
    (Instrument::DollarIndex, Term::Usd),
    (Instrument::Us10y, Term::Rate),
    (Instrument::UsdInr, Term::Inr),
    (Instrument::Nifty, Term::Nifty),
];

pub struct ScoringEngine {
    config: ModelConfig,
    scorer: WeightedScorer,
}

impl ScoringEngine {
    pub fn new(config: ModelConfig) -> Self {
        let scorer = WeightedScorer::new(
            config.weights.clone(),
            config.hybrid_blend,
            config.renormalize_missing,
        );
        Self { config, scorer }
    }

    /// Score `inputs`. Fails only with `ScoreError::InsufficientData`.
    pub fn score(&self, inputs: &MarketInputs) -> Result<Outlook, ScoreError> {
        let cfg = &self.config;

        // ── 1. Primary sufficiency ──────────────────────────────────────
        let required = cfg.required_primary_samples();
        if inputs.copper.len() < required {
            return Err(ScoreError::InsufficientData {
                symbol: inputs.copper.symbol.clone(),
                required,
                available: inputs.copper.len(),
            });
        }

        // ── 2. Raw terms ────────────────────────────────────────────────
        let indicators = IndicatorSet::compute(&inputs.copper, cfg);
        let mut raw = ScoreTerms {
            momentum: indicators.momentum_term(cfg),
            roc: indicators.roc_term(cfg),
            volume: indicators.volume_term(),
            ..ScoreTerms::default()
        };

        let mut degradations = Vec::new();
        let mut missing = Vec::new();
        let required_optional = cfg.required_optional_samples();

        for (instrument, term) in OPTIONAL_TERMS {
            match inputs.optional(instrument) {
                Some(series) if series.len() >= required_optional => {
                    let value = match term {
                        Term::Usd => currency_term(series, cfg),
                        Term::Rate => rate_term(series, cfg),
                        Term::Inr => local_currency_term(series, cfg),
                        _ => local_demand_term(series, cfg),
                    };
                    raw.set(term, value);
                }
                other => {
                    let available = other.map_or(0, PriceSeries::len);
                    debug!(
                        %instrument,
                        available,
                        required = required_optional,
                        "optional series missing, term neutral"
                    );
                    missing.push(term);
                    degradations.push(Degradation::MissingOptionalSeries {
                        instrument,
                        available,
                        required: required_optional,
                    });
                }
            }
        }

        // ── 3. Sanitize ─────────────────────────────────────────────────
        let (terms, replaced) = raw.sanitize();
        for term in replaced {
            warn!(%term, "non-finite term replaced with 0.0");
            degradations.push(Degradation::NonFiniteValue { term });
        }

        // ── 4. Compose ──────────────────────────────────────────────────
        let result = self.scorer.score(&terms, &missing);

        // ── 5. Decay ────────────────────────────────────────────────────
        let scores = project(result.base_score, cfg.decay);

        // ── 6. Classify ─────────────────────────────────────────────────
        let calls = Horizon::ALL.map(|horizon| {
            let score = scores.0[horizon as usize];
            HorizonCall {
                horizon,
                label: horizon.label(),
                score,
                bias: cfg.thresholds.classify(score),
                confidence: confidence(score),
            }
        });

        debug!(
            base_score = format!("{:.4}", result.base_score),
            momentum = terms.momentum,
            roc = terms.roc,
            volume = terms.volume,
            usd = terms.usd,
            rate = terms.rate,
            inr = terms.inr,
            nifty = terms.nifty,
            today = %calls[0].bias,
            "outlook scored"
        );

        Ok(Outlook {
            base_score: result.base_score,
            scores,
            calls,
            indicators,
            terms,
            global_component: result.global_component,
            local_component: result.local_component,
            contributions: result.contributions,
            degradations,
        })
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(ModelConfig::default())
    }
}
