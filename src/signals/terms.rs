// =============================================================================
// Score Terms — indicator set and normalised per-term values
// =============================================================================
//
// Each term is `clamp(raw / scale, -1, 1)` except the rate term, which is a
// fixed ±step by the sign of the yield change. Raw values may be NaN when a
// window touches a missing sample; `ScoreTerms::sanitize` is the one place
// that turns those into neutral zeros.

use serde::{Deserialize, Serialize};

use super::weighted_score::Term;
use crate::indicators::roc::{current_change, current_roc};
use crate::indicators::sma::last_sma;
use crate::indicators::volume::volume_ratio;
use crate::runtime_config::ModelConfig;
use crate::types::PriceSeries;

/// Clamp into [-1, 1]. NaN passes through untouched.
fn unit_clip(x: f64) -> f64 {
    x.clamp(-1.0, 1.0)
}

/// Scalars derived from the copper series at evaluation time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub latest_price: f64,
    pub ma_short: f64,
    pub ma_long: f64,
    pub roc: f64,
    pub latest_volume: f64,
    pub avg_volume: f64,
    pub volume_ratio: Option<f64>,
}

impl IndicatorSet {
    /// Compute from a series already checked against
    /// `ModelConfig::required_primary_samples`. Unfit windows become NaN.
    pub fn compute(series: &PriceSeries, cfg: &ModelConfig) -> Self {
        let closes = series.closes();
        let volumes = series.volumes();
        Self {
            latest_price: closes.last().copied().unwrap_or(f64::NAN),
            ma_short: last_sma(&closes, cfg.ma_short).unwrap_or(f64::NAN),
            ma_long: last_sma(&closes, cfg.ma_long).unwrap_or(f64::NAN),
            roc: current_roc(&closes, cfg.roc_lookback).unwrap_or(f64::NAN),
            latest_volume: volumes.last().copied().unwrap_or(f64::NAN),
            avg_volume: last_sma(&volumes, cfg.volume_window).unwrap_or(f64::NAN),
            volume_ratio: volume_ratio(&volumes, cfg.volume_window),
        }
    }

    /// `(MA_short - MA_long) / latest`, normalised.
    pub fn momentum_term(&self, cfg: &ModelConfig) -> f64 {
        let momentum = (self.ma_short - self.ma_long) / self.latest_price;
        unit_clip(momentum / cfg.momentum_scale)
    }

    pub fn roc_term(&self, cfg: &ModelConfig) -> f64 {
        unit_clip(self.roc / cfg.roc_scale)
    }

    /// `ratio - 1`, so average volume is neutral. A non-positive average
    /// carries no information and scores 0.0; a gap stays NaN.
    pub fn volume_term(&self) -> f64 {
        match self.volume_ratio {
            Some(ratio) => unit_clip(ratio - 1.0),
            None => 0.0,
        }
    }
}

/// Stronger dollar is bearish for copper.
pub fn currency_term(dxy: &PriceSeries, cfg: &ModelConfig) -> f64 {
    match current_roc(&dxy.closes(), cfg.dxy_lookback) {
        Some(roc) => unit_clip(-roc / cfg.usd_scale),
        None => f64::NAN,
    }
}

/// Rising yields are bearish; an unchanged yield is neutral.
pub fn rate_term(us10y: &PriceSeries, cfg: &ModelConfig) -> f64 {
    match current_change(&us10y.closes(), cfg.yield_lookback) {
        Some(change) if change.is_nan() => f64::NAN,
        Some(change) if change > 0.0 => -cfg.rate_step,
        Some(change) if change < 0.0 => cfg.rate_step,
        Some(_) => 0.0,
        None => f64::NAN,
    }
}

/// A weaker rupee (USD/INR up) lifts the rupee-denominated copper price.
pub fn local_currency_term(usd_inr: &PriceSeries, cfg: &ModelConfig) -> f64 {
    match current_roc(&usd_inr.closes(), cfg.local_lookback) {
        Some(roc) => unit_clip(roc / cfg.inr_scale),
        None => f64::NAN,
    }
}

/// Local equity strength as a demand proxy.
pub fn local_demand_term(nifty: &PriceSeries, cfg: &ModelConfig) -> f64 {
    match current_roc(&nifty.closes(), cfg.local_lookback) {
        Some(roc) => unit_clip(roc / cfg.nifty_scale),
        None => f64::NAN,
    }
}

/// Normalised term values. After `sanitize` every field is finite and in
/// [-1, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreTerms {
    pub momentum: f64,
    pub roc: f64,
    pub volume: f64,
    pub usd: f64,
    pub rate: f64,
    pub inr: f64,
    pub nifty: f64,
}

impl ScoreTerms {
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

    pub fn set(&mut self, term: Term, value: f64) {
        let slot = match term {
            Term::Momentum => &mut self.momentum,
            Term::Roc => &mut self.roc,
            Term::Volume => &mut self.volume,
            Term::Usd => &mut self.usd,
            Term::Rate => &mut self.rate,
            Term::Inr => &mut self.inr,
            Term::Nifty => &mut self.nifty,
        };
        *slot = value;
    }

    /// Replace every non-finite term with 0.0 and clamp the rest into
    /// [-1, 1]. Returns the terms that were replaced.
    pub fn sanitize(mut self) -> (Self, Vec<Term>) {
        let mut replaced = Vec::new();
        for term in Term::ALL {
            let value = self.get(term);
            if value.is_finite() {
                self.set(term, unit_clip(value));
            } else {
                self.set(term, 0.0);
                replaced.push(term);
            }
        }
        (self, replaced)
    }
}
