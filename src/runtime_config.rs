// =============================================================================
// Runtime Configuration — service settings and model constants
// =============================================================================
//
// Every tunable of the outlook model lives in `ModelConfig` so that weights,
// windows, scales, decay and thresholds can be changed without a rebuild.
// All fields carry `#[serde(default)]` so a partial JSON file still loads.
//
// =============================================================================

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::signals::bias::BiasThresholds;
use crate::signals::signal_decay::DecayConvention;
use crate::signals::weighted_score::{HybridBlend, TermWeights};
use crate::types::Instrument;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_lookback_days() -> u32 {
    60
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_yahoo_base_url() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

fn default_reference_price_min() -> f64 {
    500.0
}

fn default_reference_price_max() -> f64 {
    2000.0
}

fn default_full_conviction_move_pct() -> f64 {
    2.0
}

fn default_ma_short() -> usize {
    5
}

fn default_ma_long() -> usize {
    20
}

fn default_roc_lookback() -> usize {
    5
}

fn default_volume_window() -> usize {
    20
}

fn default_dxy_lookback() -> usize {
    5
}

fn default_yield_lookback() -> usize {
    4
}

fn default_local_lookback() -> usize {
    5
}

fn default_momentum_scale() -> f64 {
    0.01
}

fn default_roc_scale() -> f64 {
    0.03
}

fn default_usd_scale() -> f64 {
    0.01
}

fn default_inr_scale() -> f64 {
    0.01
}

fn default_nifty_scale() -> f64 {
    0.02
}

fn default_rate_step() -> f64 {
    0.3
}

fn default_min_primary_samples() -> usize {
    30
}

fn default_min_optional_samples() -> usize {
    10
}

// =============================================================================
// ModelConfig
// =============================================================================

/// Windows, scales, weights and cut points of the scoring model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    // --- Windows (in daily samples) -----------------------------------------
    #[serde(default = "default_ma_short")]
    pub ma_short: usize,
    #[serde(default = "default_ma_long")]
    pub ma_long: usize,
    /// Steps back for the copper ROC (5 ⇒ the sample at `len - 6`).
    #[serde(default = "default_roc_lookback")]
    pub roc_lookback: usize,
    #[serde(default = "default_volume_window")]
    pub volume_window: usize,
    #[serde(default = "default_dxy_lookback")]
    pub dxy_lookback: usize,
    #[serde(default = "default_yield_lookback")]
    pub yield_lookback: usize,
    /// Steps back for both USD/INR and Nifty.
    #[serde(default = "default_local_lookback")]
    pub local_lookback: usize,

    // --- Normalisation scales -----------------------------------------------
    #[serde(default = "default_momentum_scale")]
    pub momentum_scale: f64,
    #[serde(default = "default_roc_scale")]
    pub roc_scale: f64,
    #[serde(default = "default_usd_scale")]
    pub usd_scale: f64,
    #[serde(default = "default_inr_scale")]
    pub inr_scale: f64,
    #[serde(default = "default_nifty_scale")]
    pub nifty_scale: f64,
    /// Fixed magnitude of the yield-direction term.
    #[serde(default = "default_rate_step")]
    pub rate_step: f64,

    // --- Composition ----------------------------------------------------------
    #[serde(default)]
    pub weights: TermWeights,
    #[serde(default)]
    pub hybrid_blend: Option<HybridBlend>,
    /// Drop missing optional terms and rescale the rest instead of scoring
    /// them as 0.0.
    #[serde(default)]
    pub renormalize_missing: bool,
    #[serde(default)]
    pub decay: DecayConvention,
    #[serde(default)]
    pub thresholds: BiasThresholds,

    // --- Data sufficiency -----------------------------------------------------
    #[serde(default = "default_min_primary_samples")]
    pub min_primary_samples: usize,
    #[serde(default = "default_min_optional_samples")]
    pub min_optional_samples: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            ma_short: default_ma_short(),
            ma_long: default_ma_long(),
            roc_lookback: default_roc_lookback(),
            volume_window: default_volume_window(),
            dxy_lookback: default_dxy_lookback(),
            yield_lookback: default_yield_lookback(),
            local_lookback: default_local_lookback(),
            momentum_scale: default_momentum_scale(),
            roc_scale: default_roc_scale(),
            usd_scale: default_usd_scale(),
            inr_scale: default_inr_scale(),
            nifty_scale: default_nifty_scale(),
            rate_step: default_rate_step(),
            weights: TermWeights::default(),
            hybrid_blend: None,
            renormalize_missing: false,
            decay: DecayConvention::default(),
            thresholds: BiasThresholds::default(),
            min_primary_samples: default_min_primary_samples(),
            min_optional_samples: default_min_optional_samples(),
        }
    }
}

impl ModelConfig {
    /// Samples the copper indicators need, whatever the configured minimum.
    pub fn primary_window(&self) -> usize {
        self.ma_short
            .max(self.ma_long)
            .max(self.roc_lookback + 1)
            .max(self.volume_window)
    }

    /// Effective copper minimum: the configured floor or the indicator
    /// window, whichever is larger.
    pub fn required_primary_samples(&self) -> usize {
        self.min_primary_samples.max(self.primary_window())
    }

    /// Effective minimum for any optional series.
    pub fn required_optional_samples(&self) -> usize {
        let window = (self.dxy_lookback + 1)
            .max(self.yield_lookback + 1)
            .max(self.local_lookback + 1);
        self.min_optional_samples.max(window)
    }

    pub fn validate(&self) -> Result<()> {
        let windows = [
            ("ma_short", self.ma_short),
            ("ma_long", self.ma_long),
            ("roc_lookback", self.roc_lookback),
            ("volume_window", self.volume_window),
            ("dxy_lookback", self.dxy_lookback),
            ("yield_lookback", self.yield_lookback),
            ("local_lookback", self.local_lookback),
        ];
        for (name, value) in windows {
            if value == 0 {
                bail!("{name} must be at least 1");
            }
        }

        let scales = [
            ("momentum_scale", self.momentum_scale),
            ("roc_scale", self.roc_scale),
            ("usd_scale", self.usd_scale),
            ("inr_scale", self.inr_scale),
            ("nifty_scale", self.nifty_scale),
        ];
        for (name, value) in scales {
            if !(value.is_finite() && value > 0.0) {
                bail!("{name} must be a positive number, got {value}");
            }
        }
        if !(0.0..=1.0).contains(&self.rate_step) {
            bail!("rate_step must lie in [0, 1], got {}", self.rate_step);
        }

        let t = &self.thresholds;
        if !(0.0 <= t.mild && t.mild < t.strong && t.strong <= 1.0) {
            bail!(
                "thresholds must satisfy 0 <= mild < strong <= 1, got mild={} strong={}",
                t.mild,
                t.strong
            );
        }

        let factors = self.decay.factors();
        if factors.iter().any(|f| !(0.0..=1.0).contains(f))
            || factors.windows(2).any(|w| w[1] > w[0])
        {
            bail!("decay factors must be non-increasing within [0, 1]");
        }

        if !self.weights.total().is_finite() {
            bail!("weights must be finite");
        }
        Ok(())
    }
}

// =============================================================================
// InstrumentSymbols
// =============================================================================

fn default_copper_symbol() -> String {
    Instrument::Copper.default_symbol().to_string()
}

fn default_dxy_symbol() -> String {
    Instrument::DollarIndex.default_symbol().to_string()
}

fn default_us10y_symbol() -> String {
    Instrument::Us10y.default_symbol().to_string()
}

fn default_usdinr_symbol() -> String {
    Instrument::UsdInr.default_symbol().to_string()
}

fn default_nifty_symbol() -> String {
    Instrument::Nifty.default_symbol().to_string()
}

/// Provider tickers per instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentSymbols {
    #[serde(default = "default_copper_symbol")]
    pub copper: String,
    #[serde(default = "default_dxy_symbol")]
    pub dollar_index: String,
    #[serde(default = "default_us10y_symbol")]
    pub us10y: String,
    #[serde(default = "default_usdinr_symbol")]
    pub usd_inr: String,
    #[serde(default = "default_nifty_symbol")]
    pub nifty: String,
}

impl Default for InstrumentSymbols {
    fn default() -> Self {
        Self {
            copper: default_copper_symbol(),
            dollar_index: default_dxy_symbol(),
            us10y: default_us10y_symbol(),
            usd_inr: default_usdinr_symbol(),
            nifty: default_nifty_symbol(),
        }
    }
}

impl InstrumentSymbols {
    pub fn symbol(&self, instrument: Instrument) -> &str {
        match instrument {
            Instrument::Copper => &self.copper,
            Instrument::DollarIndex => &self.dollar_index,
            Instrument::Us10y => &self.us10y,
            Instrument::UsdInr => &self.usd_inr,
            Instrument::Nifty => &self.nifty,
        }
    }
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level configuration for the outlook service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    // --- Server -----------------------------------------------------------------
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    // --- Market data ------------------------------------------------------------
    /// Trailing calendar window requested from the provider, in days.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,

    /// How long a fetched series is reused before refetching.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_yahoo_base_url")]
    pub yahoo_base_url: String,

    #[serde(default)]
    pub symbols: InstrumentSymbols,

    // --- Reference price (MCX, ₹/kg) ------------------------------------------
    #[serde(default = "default_reference_price_min")]
    pub reference_price_min: f64,

    #[serde(default = "default_reference_price_max")]
    pub reference_price_max: f64,

    /// Percentage move implied by a score of ±1.0.
    #[serde(default = "default_full_conviction_move_pct")]
    pub full_conviction_move_pct: f64,

    // --- Model ------------------------------------------------------------------
    #[serde(default)]
    pub model: ModelConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            lookback_days: default_lookback_days(),
            cache_ttl_secs: default_cache_ttl_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            yahoo_base_url: default_yahoo_base_url(),
            symbols: InstrumentSymbols::default(),
            reference_price_min: default_reference_price_min(),
            reference_price_max: default_reference_price_max(),
            full_conviction_move_pct: default_full_conviction_move_pct(),
            model: ModelConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// A missing file is an error so the caller can fall back to defaults
    /// with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("invalid runtime config in {}", path.display()))?;

        info!(
            path = %path.display(),
            lookback_days = config.lookback_days,
            cache_ttl_secs = config.cache_ttl_secs,
            "runtime config loaded"
        );

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.lookback_days == 0 {
            bail!("lookback_days must be at least 1");
        }
        if !(self.reference_price_min > 0.0 && self.reference_price_min < self.reference_price_max)
        {
            bail!(
                "reference price bounds must satisfy 0 < min < max, got {}..{}",
                self.reference_price_min,
                self.reference_price_max
            );
        }
        self.model.validate()
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.bind_addr, "0.0.0.0:8080");
        assert_eq!(cfg.lookback_days, 60);
        assert_eq!(cfg.cache_ttl_secs, 3600);
        assert_eq!(cfg.symbols.copper, "HG=F");
        assert_eq!(cfg.symbols.symbol(Instrument::Nifty), "^NSEI");
        assert_eq!(cfg.model.min_primary_samples, 30);
        assert_eq!(cfg.model.decay, DecayConvention::Fixed);
        assert!((cfg.model.thresholds.strong - 0.35).abs() < f64::EPSILON);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: RuntimeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, RuntimeConfig::default());
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{
            "cache_ttl_secs": 60,
            "symbols": { "copper": "COPPER.TEST" },
            "model": { "weights": { "momentum": 0.4 }, "decay": "Compounding" }
        }"#;
        let cfg: RuntimeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.cache_ttl_secs, 60);
        assert_eq!(cfg.symbols.copper, "COPPER.TEST");
        assert_eq!(cfg.symbols.us10y, "^TNX");
        assert!((cfg.model.weights.momentum - 0.4).abs() < f64::EPSILON);
        assert!((cfg.model.weights.roc - 0.2).abs() < f64::EPSILON);
        assert_eq!(cfg.model.decay, DecayConvention::Compounding);
        assert_eq!(cfg.model.ma_long, 20);
    }

    #[test]
    fn required_samples_respect_windows() {
        let mut model = ModelConfig::default();
        assert_eq!(model.required_primary_samples(), 30);
        assert_eq!(model.required_optional_samples(), 10);

        model.min_primary_samples = 8;
        assert_eq!(model.required_primary_samples(), 20);

        model.min_optional_samples = 2;
        assert_eq!(model.required_optional_samples(), 6);
    }

    #[test]
    fn validate_rejects_bad_thresholds() {
        let mut model = ModelConfig::default();
        model.thresholds = BiasThresholds {
            strong: 0.1,
            mild: 0.2,
        };
        assert!(model.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_scale_and_window() {
        let mut model = ModelConfig::default();
        model.roc_scale = 0.0;
        assert!(model.validate().is_err());

        let mut model = ModelConfig::default();
        model.ma_short = 0;
        assert!(model.validate().is_err());
    }

    #[test]
    fn validate_rejects_inverted_reference_bounds() {
        let cfg = RuntimeConfig {
            reference_price_min: 2000.0,
            reference_price_max: 500.0,
            ..RuntimeConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn load_missing_file_is_error() {
        assert!(RuntimeConfig::load("/nonexistent/outlook_config.json").is_err());
    }
}
